use crate::status::CheckStatus;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A program identifier together with the archive entry that declares it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramRef {
    pub name: String,
    pub entry: String,
}

/// The three identifier spaces of a project, in document/archive order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectIds {
    /// Task names declared in the manifest task list.
    pub tasks: Vec<String>,
    /// Task names referenced by scheduler-path entries (non-folder only).
    pub nodes: Vec<String>,
    /// Program names declared by program documents.
    pub programs: Vec<ProgramRef>,
}

impl ProjectIds {
    pub fn program_names(&self) -> Vec<String> {
        self.programs.iter().map(|p| p.name.clone()).collect()
    }

    /// Archive entries declaring `name`, in archive order.
    pub fn program_entries(&self, name: &str) -> Vec<&str> {
        self.programs
            .iter()
            .filter(|p| p.name == name)
            .map(|p| p.entry.as_str())
            .collect()
    }
}

/// Replacement name for one duplicate occurrence.
///
/// `index` is the position of the occurrence within its identifier space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rename {
    pub index: usize,
    pub original: String,
    pub replacement: String,
}

/// Replacement name for a duplicate program, paired with the entry to patch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramRename {
    pub index: usize,
    pub original: String,
    pub replacement: String,
    pub entry: String,
}

/// Classification of every identifier problem found in a project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectErrors {
    pub missing_tasks: BTreeSet<String>,
    pub missing_nodes: BTreeSet<String>,
    pub missing_programs: BTreeSet<String>,

    /// Every second-or-later occurrence, in order.
    pub duplicate_tasks: Vec<String>,
    pub duplicate_nodes: Vec<String>,
    pub duplicate_programs: Vec<String>,

    pub task_renames: Vec<Rename>,
    pub node_renames: Vec<Rename>,
    pub program_renames: Vec<ProgramRename>,
}

impl ProjectErrors {
    pub fn status(&self) -> CheckStatus {
        let mut status = CheckStatus::CLEAN;
        if !self.duplicate_nodes.is_empty() {
            status |= CheckStatus::DUPLICATE_NODE;
        }
        if !self.duplicate_tasks.is_empty() {
            status |= CheckStatus::DUPLICATE_TASK;
        }
        if !self.duplicate_programs.is_empty() {
            status |= CheckStatus::DUPLICATE_PROGRAM;
        }
        if !self.missing_nodes.is_empty() {
            status |= CheckStatus::MISSING_NODE;
        }
        if !self.missing_tasks.is_empty() {
            status |= CheckStatus::MISSING_TASK;
        }
        if !self.missing_programs.is_empty() {
            status |= CheckStatus::MISSING_PROGRAM;
        }
        status
    }

    pub fn is_clean(&self) -> bool {
        self.status().is_clean()
    }

    pub fn renamed_tasks(&self) -> BTreeSet<String> {
        self.task_renames
            .iter()
            .map(|r| r.replacement.clone())
            .collect()
    }

    pub fn renamed_nodes(&self) -> BTreeSet<String> {
        self.node_renames
            .iter()
            .map(|r| r.replacement.clone())
            .collect()
    }

    pub fn renamed_programs(&self) -> BTreeSet<String> {
        self.program_renames
            .iter()
            .map(|r| r.replacement.clone())
            .collect()
    }
}
