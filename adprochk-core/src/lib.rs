//! Embeddable core library for adprochk.
//!
//! Provides a clap-free, I/O-abstracted entry point for checking and repairing
//! `.adpro` project archives.
//!
//! # Port traits
//!
//! All I/O is abstracted behind port traits in [`ports`]:
//! - [`ArchiveSource`](ports::ArchiveSource): read the input archive
//! - [`WritePort`](ports::WritePort): write the repaired archive
//!
//! The [`adapters`] module provides filesystem and in-memory implementations.
//!
//! # Entry points
//!
//! - [`run_check`](pipeline::run_check): check, and optionally repair, one archive
//! - [`build_report`](pipeline::build_report): turn an outcome into the JSON report

pub mod adapters;
pub mod pipeline;
pub mod ports;
pub mod settings;

// Re-export option types so embedders don't need the lower crates directly.
pub use adprochk_archive::LoadOptions;
pub use adprochk_edit::RepairOptions;
