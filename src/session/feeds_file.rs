// src/session/feeds_file.rs

//! The helper's side-channel output: `<user-config-dir>/<app>/local_feeds`.
//!
//! One URL per non-blank line. The caller clears it before each helper run
//! and reads it once afterwards, so the content always reflects the latest
//! run only.

use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::debug;

use crate::config::ConfigFile;
use crate::fs::FileSystem;

pub const FEEDS_FILE_NAME: &str = "local_feeds";

/// Ordered feed URLs discovered by one helper run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoveredFeedSet {
    urls: Vec<String>,
}

impl DiscoveredFeedSet {
    /// Keep every non-blank line, trimmed, in order.
    pub fn parse(text: &str) -> Self {
        let urls = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        Self { urls }
    }

    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    pub fn first(&self) -> Option<&str> {
        self.urls.first().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.urls
    }
}

impl From<Vec<String>> for DiscoveredFeedSet {
    fn from(urls: Vec<String>) -> Self {
        Self { urls }
    }
}

pub fn default_feeds_path(app_name: &str) -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(app_name).join(FEEDS_FILE_NAME))
}

/// `[helper].feeds_file` if set, otherwise the per-user default.
pub fn resolve_feeds_path(cfg: &ConfigFile) -> Option<PathBuf> {
    cfg.helper
        .feeds_file
        .clone()
        .or_else(|| default_feeds_path(&cfg.app.name))
}

pub fn clear_feeds_file(fs: &dyn FileSystem, path: &Path) -> Result<()> {
    debug!(path = %path.display(), "clearing discovered-feed file");
    fs.remove_file(path)
}

/// Read and parse the file; a missing file is an empty set.
pub fn read_feeds_file(fs: &dyn FileSystem, path: &Path) -> Result<DiscoveredFeedSet> {
    if !fs.exists(path) {
        debug!(path = %path.display(), "no discovered-feed file written");
        return Ok(DiscoveredFeedSet::default());
    }
    let text = fs.read_to_string(path)?;
    Ok(DiscoveredFeedSet::parse(&text))
}

pub fn write_feeds_file(fs: &dyn FileSystem, path: &Path, urls: &[String]) -> Result<()> {
    let mut text = urls.join("\n");
    text.push('\n');
    fs.write(path, text.as_bytes())
}
