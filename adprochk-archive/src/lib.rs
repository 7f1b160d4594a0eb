//! Reading and rebuilding `.adpro` project archives.
//!
//! An archive is a zip container, optionally preceded by the 4-byte signature.
//! Everything is held in memory; the rebuilder never touches the filesystem.

pub mod load;
pub mod rebuild;

pub use load::{LoadOptions, LoadedProject, ProjectArchive, load_project};
pub use rebuild::rebuild;
