// src/config/model.rs

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::types::LookupSourceKind;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [app]
/// name = "feedbridge"
///
/// [helper]
/// name = "html2rss"
///
/// [locator]
/// dev_tree = ["tools/{name}/target/release/{name}"]
/// system_dirs = ["/usr/local/bin", "/usr/bin"]
///
/// [debounce]
/// delay_ms = 250
///
/// [lookup]
/// source = "table"
///
/// [lookup.table]
/// "10115" = "Berlin Mitte"
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawConfigFile {
    #[serde(default)]
    pub app: AppSection,

    #[serde(default)]
    pub helper: HelperSection,

    #[serde(default)]
    pub locator: LocatorSection,

    #[serde(default)]
    pub debounce: DebounceSection,

    #[serde(default)]
    pub lookup: LookupSection,
}

/// Validated configuration. Only constructed through
/// `ConfigFile::try_from(RawConfigFile)` or `Default`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub app: AppSection,
    pub helper: HelperSection,
    pub locator: LocatorSection,
    pub debounce: DebounceSection,
    pub lookup: LookupSection,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(raw: RawConfigFile) -> Self {
        Self {
            app: raw.app,
            helper: raw.helper,
            locator: raw.locator,
            debounce: raw.debounce,
            lookup: raw.lookup,
        }
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self::new_unchecked(RawConfigFile::default())
    }
}

/// `[app]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct AppSection {
    /// Directory name under the user config dir (`<config>/<name>/local_feeds`).
    #[serde(default = "default_app_name")]
    pub name: String,
}

fn default_app_name() -> String {
    "feedbridge".to_string()
}

impl Default for AppSection {
    fn default() -> Self {
        Self {
            name: default_app_name(),
        }
    }
}

/// `[helper]` section: the external feed-discovery executable.
#[derive(Debug, Clone, Deserialize)]
pub struct HelperSection {
    /// Logical executable name, without directory or platform suffix.
    #[serde(default = "default_helper_name")]
    pub name: String,

    /// Flag preceding the query argument.
    #[serde(default = "default_query_flag")]
    pub query_flag: String,

    /// Override for the discovered-feed file. When `None` the file lives at
    /// `<user-config-dir>/<app.name>/local_feeds`.
    #[serde(default)]
    pub feeds_file: Option<PathBuf>,
}

fn default_helper_name() -> String {
    "html2rss".to_string()
}

fn default_query_flag() -> String {
    "--query".to_string()
}

impl Default for HelperSection {
    fn default() -> Self {
        Self {
            name: default_helper_name(),
            query_flag: default_query_flag(),
            feeds_file: None,
        }
    }
}

/// `[locator]` section.
///
/// `dev_tree` and `build_output` are path templates in which `{name}` is
/// replaced by the helper name. `install_bindir` and `system_dirs` are
/// directories probed for both case variants of the name.
#[derive(Debug, Clone, Deserialize)]
pub struct LocatorSection {
    #[serde(default = "default_dev_tree")]
    pub dev_tree: Vec<String>,

    #[serde(default = "default_build_output")]
    pub build_output: Option<String>,

    #[serde(default = "default_install_bindir")]
    pub install_bindir: Option<PathBuf>,

    #[serde(default = "default_system_dirs")]
    pub system_dirs: Vec<PathBuf>,
}

fn default_dev_tree() -> Vec<String> {
    vec![
        "tools/{name}/target/release/{name}".to_string(),
        "tools/{name}/target/debug/{name}".to_string(),
        "../tools/{name}/target/release/{name}".to_string(),
    ]
}

fn default_build_output() -> Option<String> {
    Some("target/release/{name}".to_string())
}

fn default_install_bindir() -> Option<PathBuf> {
    option_env!("FEEDBRIDGE_INSTALL_BINDIR").map(PathBuf::from)
}

fn default_system_dirs() -> Vec<PathBuf> {
    vec![PathBuf::from("/usr/local/bin"), PathBuf::from("/usr/bin")]
}

impl Default for LocatorSection {
    fn default() -> Self {
        Self {
            dev_tree: default_dev_tree(),
            build_output: default_build_output(),
            install_bindir: default_install_bindir(),
            system_dirs: default_system_dirs(),
        }
    }
}

/// `[debounce]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct DebounceSection {
    /// Quiet period before a typed query is acted on.
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

fn default_delay_ms() -> u64 {
    250
}

impl DebounceSection {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl Default for DebounceSection {
    fn default() -> Self {
        Self {
            delay_ms: default_delay_ms(),
        }
    }
}

/// `[lookup]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct LookupSection {
    #[serde(default)]
    pub source: LookupSourceKind,

    /// URL template for `source = "http"`; must contain `{query}`.
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Local code → mapping table for `source = "table"`.
    #[serde(default)]
    pub table: BTreeMap<String, String>,
}

fn default_timeout_ms() -> u64 {
    10_000
}

impl LookupSection {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for LookupSection {
    fn default() -> Self {
        Self {
            source: LookupSourceKind::default(),
            url: None,
            timeout_ms: default_timeout_ms(),
            table: BTreeMap::new(),
        }
    }
}
