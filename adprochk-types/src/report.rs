use crate::findings::{ProjectErrors, ProjectIds, Rename};
use crate::status::CheckStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunInfo {
    pub started_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
}

/// What one repair pass changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepairSummary {
    pub renamed_tasks: Vec<Rename>,
    pub renamed_nodes: Vec<Rename>,
    pub renamed_programs: Vec<Rename>,
    pub synthesized_tasks: Vec<String>,
    pub synthesized_nodes: Vec<String>,
    /// Key of the container that received synthesized nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_container_key: Option<String>,
    /// True when the configured container key was absent and another was used.
    #[serde(default)]
    pub node_container_fallback: bool,
    /// Missing programs that a single pass cannot create.
    pub unresolved_programs: Vec<String>,
    pub patched_entries: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepairReport {
    pub output: String,
    pub output_bytes: u64,
    pub output_sha256: String,
    pub summary: RepairSummary,
    /// Findings left in the rebuilt archive, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub residual: Option<ProjectErrors>,
}

/// JSON report printed by `--format json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckReport {
    pub schema: String,
    pub tool: ToolInfo,
    pub run: RunInfo,
    pub input: String,
    pub status: CheckStatus,
    pub status_labels: Vec<String>,
    pub exit_code: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ids: Option<ProjectIds>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub findings: Option<ProjectErrors>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repair: Option<RepairReport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fatal: Option<String>,
}
