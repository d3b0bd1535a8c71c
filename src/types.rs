use std::str::FromStr;
use serde::Deserialize;

/// Where the lookup dialog resolves a query.
///
/// - `Table`: the `[lookup.table]` section of the config (a local mapping).
/// - `Http`: a GET request against `[lookup].url` with `{query}` substituted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LookupSourceKind {
    Table,
    Http,
}

impl Default for LookupSourceKind {
    fn default() -> Self {
        LookupSourceKind::Table
    }
}

impl FromStr for LookupSourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "table" => Ok(LookupSourceKind::Table),
            "http" => Ok(LookupSourceKind::Http),
            other => Err(format!(
                "invalid lookup source: {other} (expected \"table\" or \"http\")"
            )),
        }
    }
}

/// Severity of a message shown to the user.
///
/// `Info` covers successful summaries and lookup misses; `Error` covers launch
/// failures and non-zero helper exits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Error,
}

/// A message the UI displays in a dialog's status area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserMessage {
    pub kind: MessageKind,
    pub text: String,
}

impl UserMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Info,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Error,
            text: text.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == MessageKind::Error
    }
}

impl std::fmt::Display for UserMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}
