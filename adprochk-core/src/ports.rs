//! Port traits abstracting all I/O away from the pipeline.

use camino::Utf8Path;

/// Source of project archive bytes.
pub trait ArchiveSource {
    fn read_archive(&self, path: &Utf8Path) -> anyhow::Result<Vec<u8>>;
}

/// File-system write operations.
pub trait WritePort {
    fn write_file(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()>;
}
