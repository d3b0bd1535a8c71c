#![allow(dead_code)]

use std::path::PathBuf;

use feedbridge::config::{ConfigFile, LocatorSection, RawConfigFile};
use feedbridge::types::LookupSourceKind;

/// Where builder configs put the feed file unless told otherwise.
pub const TEST_FEEDS_FILE: &str = "/test-config/feedbridge/local_feeds";

/// Builder for `ConfigFile` to simplify test setup.
///
/// Starts from the defaults with an empty locator (every candidate must be
/// added explicitly) and a fixed feed-file path, so tests never look at the
/// real user config dir.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        let mut config = RawConfigFile::default();
        config.locator = LocatorSection {
            dev_tree: vec![],
            build_output: None,
            install_bindir: None,
            system_dirs: vec![],
        };
        config.helper.feeds_file = Some(PathBuf::from(TEST_FEEDS_FILE));
        Self { config }
    }

    pub fn helper_name(mut self, name: &str) -> Self {
        self.config.helper.name = name.to_string();
        self
    }

    pub fn query_flag(mut self, flag: &str) -> Self {
        self.config.helper.query_flag = flag.to_string();
        self
    }

    pub fn feeds_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.helper.feeds_file = Some(path.into());
        self
    }

    pub fn dev_tree(mut self, template: &str) -> Self {
        self.config.locator.dev_tree.push(template.to_string());
        self
    }

    pub fn build_output(mut self, template: &str) -> Self {
        self.config.locator.build_output = Some(template.to_string());
        self
    }

    pub fn install_bindir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.locator.install_bindir = Some(dir.into());
        self
    }

    pub fn system_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.locator.system_dirs.push(dir.into());
        self
    }

    pub fn debounce_ms(mut self, ms: u64) -> Self {
        self.config.debounce.delay_ms = ms;
        self
    }

    pub fn table_entry(mut self, code: &str, mapping: &str) -> Self {
        self.config
            .lookup
            .table
            .insert(code.to_string(), mapping.to_string());
        self
    }

    pub fn http_lookup(mut self, url_template: &str) -> Self {
        self.config.lookup.source = LookupSourceKind::Http;
        self.config.lookup.url = Some(url_template.to_string());
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}
