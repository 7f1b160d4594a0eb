//! Shared DTOs for the adprochk workspace.
//!
//! # Design constraints
//! - Findings and reports are serialized to stdout as JSON; be conservative with breaking changes.
//! - Prefer adding optional fields over changing semantics.

pub mod error;
pub mod findings;
pub mod fix;
pub mod report;
pub mod status;

pub use error::FatalError;
pub use findings::{ProgramRef, ProgramRename, ProjectErrors, ProjectIds, Rename};
pub use fix::FixFile;
pub use status::CheckStatus;

/// Schema identifiers.
pub mod schema {
    pub const ADPROCHK_REPORT_V1: &str = "adprochk.report.v1";
}

/// Fixed 4-byte marker written in front of every repaired archive.
pub const SIGNATURE: [u8; 4] = [0xAD, 0xC0, 0x30, 0x00];
