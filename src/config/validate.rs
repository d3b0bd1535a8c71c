// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{FeedbridgeError, Result};
use crate::types::LookupSourceKind;

/// Upper bound for the debounce window; anything longer reads as a hang.
const MAX_DEBOUNCE_MS: u64 = 10_000;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::FeedbridgeError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_app(cfg)?;
    validate_helper(cfg)?;
    validate_debounce(cfg)?;
    validate_lookup(cfg)?;
    Ok(())
}

fn validate_app(cfg: &RawConfigFile) -> Result<()> {
    ensure_bare_name("[app].name", &cfg.app.name)
}

fn validate_helper(cfg: &RawConfigFile) -> Result<()> {
    ensure_bare_name("[helper].name", &cfg.helper.name)?;

    if cfg.helper.query_flag.trim().is_empty() {
        return Err(FeedbridgeError::ConfigError(
            "[helper].query_flag must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_debounce(cfg: &RawConfigFile) -> Result<()> {
    if cfg.debounce.delay_ms > MAX_DEBOUNCE_MS {
        return Err(FeedbridgeError::ConfigError(format!(
            "[debounce].delay_ms must be <= {} (got {})",
            MAX_DEBOUNCE_MS, cfg.debounce.delay_ms
        )));
    }
    Ok(())
}

fn validate_lookup(cfg: &RawConfigFile) -> Result<()> {
    if cfg.lookup.timeout_ms == 0 {
        return Err(FeedbridgeError::ConfigError(
            "[lookup].timeout_ms must be >= 1 (got 0)".to_string(),
        ));
    }

    if cfg.lookup.source == LookupSourceKind::Http {
        match cfg.lookup.url.as_deref() {
            None => {
                return Err(FeedbridgeError::ConfigError(
                    "[lookup].url is required when source = \"http\"".to_string(),
                ));
            }
            Some(url) if !url.contains("{query}") => {
                return Err(FeedbridgeError::ConfigError(format!(
                    "[lookup].url must contain a {{query}} placeholder (got '{}')",
                    url
                )));
            }
            Some(_) => {}
        }
    }
    Ok(())
}

fn ensure_bare_name(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(FeedbridgeError::ConfigError(format!(
            "{} must not be empty",
            field
        )));
    }
    if value.contains('/') || value.contains('\\') {
        return Err(FeedbridgeError::ConfigError(format!(
            "{} must be a bare name without path separators (got '{}')",
            field, value
        )));
    }
    Ok(())
}
