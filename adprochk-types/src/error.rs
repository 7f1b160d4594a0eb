//! Fatal errors that stop a check run.
//!
//! Findings (duplicates, missing cross-references) are not errors; they are
//! reported through [`ProjectErrors`](crate::ProjectErrors). Everything here
//! aborts the run and never produces an output archive.

use crate::status::CheckStatus;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FatalError {
    /// The project archive could not be read or is not a zip container.
    #[error("cannot read project archive {path}: {message}")]
    ArchiveUnreadable { path: String, message: String },

    /// The manifest entry is absent or does not parse.
    #[error("corrupt manifest {entry}: {message}")]
    CorruptManifest { entry: String, message: String },

    /// A program document is unreadable or does not parse.
    #[error("corrupt program document {entry}: {message}")]
    CorruptProgram { entry: String, message: String },

    /// A document lacks a field that has no sane default.
    #[error("missing required field <{field}> in {document}")]
    MissingField { document: String, field: String },

    /// A structural precondition failed while repairing.
    #[error("repair aborted: {message}")]
    RepairAborted { message: String },

    /// The repaired archive could not be assembled or written.
    #[error("cannot write repaired archive {path}: {message}")]
    OutputFailed { path: String, message: String },

    /// Bad arguments or configuration.
    #[error("invalid invocation: {message}")]
    InvalidInvocation { message: String },
}

impl FatalError {
    pub fn status(&self) -> CheckStatus {
        match self {
            FatalError::ArchiveUnreadable { .. } => CheckStatus::ARCHIVE_UNREADABLE,
            FatalError::CorruptManifest { .. } => CheckStatus::CORRUPT_MANIFEST,
            FatalError::CorruptProgram { .. } => CheckStatus::CORRUPT_PROGRAM,
            FatalError::MissingField { .. } => CheckStatus::MISSING_FIELD,
            FatalError::RepairAborted { .. } => CheckStatus::REPAIR_ABORTED,
            FatalError::OutputFailed { .. } => CheckStatus::OUTPUT_FAILED,
            FatalError::InvalidInvocation { .. } => CheckStatus::INVALID_INVOCATION,
        }
    }

    /// Recommended process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        self.status().exit_code()
    }

    pub fn repair_aborted(message: impl Into<String>) -> Self {
        FatalError::RepairAborted {
            message: message.into(),
        }
    }
}
