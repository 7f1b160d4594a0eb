//! Edit engine for adprochk.
//!
//! Responsibilities:
//! - Model the manifest and program documents as typed walks over an XML tree.
//! - Apply a [`RepairPlan`](adprochk_domain::RepairPlan): rename in place, synthesize
//!   missing task and scheduler-path fragments, renumber task sequence fields.
//! - Serialize every mutated document into a [`FixFile`](adprochk_types::FixFile).

pub mod manifest;
pub mod program;
pub mod repair;
mod xml;

pub use manifest::{Manifest, tags};
pub use program::ProgramDocument;
pub use repair::{RepairOptions, RepairOutcome, repair_project};
