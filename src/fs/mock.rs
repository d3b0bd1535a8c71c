// src/fs/mock.rs

use super::FileSystem;
use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone)]
pub enum MockEntry {
    File(Vec<u8>),
    Dir,
}

/// Which query a caller made against the mock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeKind {
    Exists,
    IsFile,
}

/// In-memory filesystem that records every existence probe.
///
/// The probe log lets tests assert not only *what* the locator returned but
/// also which candidates it looked at, and in which order.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    entries: Arc<Mutex<HashMap<PathBuf, MockEntry>>>,
    probes: Arc<Mutex<Vec<(ProbeKind, PathBuf)>>>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        lock(&self.entries).insert(path.as_ref().to_path_buf(), MockEntry::File(content.into()));
    }

    /// Add a directory entry: it `exists` but is not a regular file.
    pub fn add_dir(&self, path: impl AsRef<Path>) {
        lock(&self.entries).insert(path.as_ref().to_path_buf(), MockEntry::Dir);
    }

    pub fn contains_file(&self, path: impl AsRef<Path>) -> bool {
        matches!(lock(&self.entries).get(path.as_ref()), Some(MockEntry::File(_)))
    }

    /// All probes made so far, in call order.
    pub fn probes(&self) -> Vec<(ProbeKind, PathBuf)> {
        lock(&self.probes).clone()
    }

    /// Distinct paths probed, in first-probe order.
    pub fn probed_paths(&self) -> Vec<PathBuf> {
        let mut seen: Vec<PathBuf> = Vec::new();
        for (_, path) in lock(&self.probes).iter() {
            if !seen.contains(path) {
                seen.push(path.clone());
            }
        }
        seen
    }

    pub fn clear_probes(&self) {
        lock(&self.probes).clear();
    }

    fn record(&self, kind: ProbeKind, path: &Path) {
        lock(&self.probes).push((kind, path.to_path_buf()));
    }
}

impl FileSystem for MockFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        let entries = lock(&self.entries);
        match entries.get(path) {
            Some(MockEntry::File(content)) => {
                String::from_utf8(content.clone()).map_err(|e| anyhow!("Invalid UTF-8: {}", e))
            }
            Some(MockEntry::Dir) => Err(anyhow!("Is a directory: {:?}", path)),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        self.add_file(path, contents);
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        let mut entries = lock(&self.entries);
        match entries.get(path) {
            Some(MockEntry::Dir) => Err(anyhow!("Is a directory: {:?}", path)),
            _ => {
                entries.remove(path);
                Ok(())
            }
        }
    }

    fn exists(&self, path: &Path) -> bool {
        self.record(ProbeKind::Exists, path);
        lock(&self.entries).contains_key(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        self.record(ProbeKind::IsFile, path);
        matches!(lock(&self.entries).get(path), Some(MockEntry::File(_)))
    }
}
