//! Domain logic: turn the three identifier spaces of a project into findings and a repair plan.
//!
//! This crate owns *what* is inconsistent and *which* names fix it. It does not touch
//! documents; that's the `adprochk-edit` crate.

mod check;
mod names;
mod plan;
mod reconcile;
mod resolve;

pub use check::check_project;
pub use names::NameGenerator;
pub use plan::{RepairPlan, plan_repair};
pub use reconcile::{Reconciliation, reconcile};
pub use resolve::{Resolution, ResolvedRename, find_duplicates, resolve_duplicates};
