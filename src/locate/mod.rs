// src/locate/mod.rs

//! Resolution of external helper executables.
//!
//! [`Locator::locate`] walks an ordered candidate list (see [`candidates`])
//! and returns the first path that exists and is a regular file. If nothing
//! matches it returns [`Located::SearchPath`], meaning "spawn by bare name and
//! let the OS search `PATH`". A missing helper is an ordinary outcome here;
//! only the later launch step can fail.

pub mod candidates;

use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use crate::config::{ConfigFile, LocatorSection};
use crate::fs::FileSystem;

pub use candidates::{build_candidates, case_variants, expand_template};

/// Result of a helper lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Located {
    /// A concrete executable found on disk.
    Path(PathBuf),
    /// No candidate matched; invoke by bare name through `PATH`.
    SearchPath(String),
}

impl Located {
    /// What to hand to `Command::new`.
    pub fn program(&self) -> &OsStr {
        match self {
            Located::Path(path) => path.as_os_str(),
            Located::SearchPath(name) => OsStr::new(name),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            Located::Path(path) => Some(path),
            Located::SearchPath(_) => None,
        }
    }

    pub fn is_search_path(&self) -> bool {
        matches!(self, Located::SearchPath(_))
    }
}

impl fmt::Display for Located {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Located::Path(path) => write!(f, "{}", path.display()),
            Located::SearchPath(name) => write!(f, "{} (via PATH)", name),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Locator {
    fs: Arc<dyn FileSystem>,
    settings: LocatorSection,
}

impl Locator {
    pub fn new(fs: Arc<dyn FileSystem>, settings: LocatorSection) -> Self {
        Self { fs, settings }
    }

    pub fn from_config(cfg: &ConfigFile, fs: Arc<dyn FileSystem>) -> Self {
        Self::new(fs, cfg.locator.clone())
    }

    /// The ordered candidate list for `name`.
    pub fn candidates(&self, name: &str) -> Vec<PathBuf> {
        build_candidates(&self.settings, name)
    }

    /// Find `name`, stopping at the first regular file.
    pub fn locate(&self, name: &str) -> Located {
        for candidate in self.candidates(name) {
            if self.fs.exists(&candidate) && self.fs.is_file(&candidate) {
                info!(helper = name, path = %candidate.display(), "helper located");
                return Located::Path(candidate);
            }
            debug!(helper = name, candidate = %candidate.display(), "candidate rejected");
        }

        info!(helper = name, "no helper candidate found; falling back to PATH search");
        Located::SearchPath(name.to_string())
    }
}
