//! Filesystem-backed and in-memory port implementations.

use crate::ports::{ArchiveSource, WritePort};
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use std::collections::BTreeMap;
use std::sync::Mutex;
use tracing::debug;

/// Reads archives straight from disk.
#[derive(Debug, Clone, Default)]
pub struct FsArchiveSource;

impl ArchiveSource for FsArchiveSource {
    fn read_archive(&self, path: &Utf8Path) -> anyhow::Result<Vec<u8>> {
        let bytes = fs::read(path).with_context(|| format!("read {path}"))?;
        debug!(path = %path, bytes = bytes.len(), "read archive");
        Ok(bytes)
    }
}

/// In-memory archive source for embedding and testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryArchiveSource {
    archives: BTreeMap<Utf8PathBuf, Vec<u8>>,
}

impl InMemoryArchiveSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_archive(mut self, path: impl Into<Utf8PathBuf>, bytes: Vec<u8>) -> Self {
        self.archives.insert(path.into(), bytes);
        self
    }
}

impl ArchiveSource for InMemoryArchiveSource {
    fn read_archive(&self, path: &Utf8Path) -> anyhow::Result<Vec<u8>> {
        self.archives
            .get(path)
            .cloned()
            .with_context(|| format!("no archive registered at {path}"))
    }
}

/// Filesystem write operations.
#[derive(Debug, Clone, Default)]
pub struct FsWritePort;

impl WritePort for FsWritePort {
    fn write_file(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("create parent dir for {path}"))?;
        }
        fs::write(path, contents).with_context(|| format!("write {path}"))
    }
}

/// Collects writes in memory; optionally refuses every write.
#[derive(Debug, Default)]
pub struct InMemoryWritePort {
    files: Mutex<BTreeMap<Utf8PathBuf, Vec<u8>>>,
    refuse: bool,
}

impl InMemoryWritePort {
    pub fn new() -> Self {
        Self::default()
    }

    /// A port whose writes all fail, for exercising the output-failure path.
    pub fn refusing() -> Self {
        Self {
            files: Mutex::default(),
            refuse: true,
        }
    }

    pub fn get(&self, path: &Utf8Path) -> Option<Vec<u8>> {
        self.files
            .lock()
            .ok()
            .and_then(|files| files.get(path).cloned())
    }

    pub fn written(&self) -> Vec<Utf8PathBuf> {
        self.files
            .lock()
            .map(|files| files.keys().cloned().collect())
            .unwrap_or_default()
    }
}

impl WritePort for InMemoryWritePort {
    fn write_file(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()> {
        if self.refuse {
            anyhow::bail!("write refused for {path}");
        }
        let mut files = self
            .files
            .lock()
            .map_err(|_| anyhow::anyhow!("in-memory write port poisoned"))?;
        files.insert(path.to_owned(), contents.to_vec());
        Ok(())
    }
}
