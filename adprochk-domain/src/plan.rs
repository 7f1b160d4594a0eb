use adprochk_types::{ProgramRename, ProjectErrors, ProjectIds, Rename};
use std::collections::BTreeSet;
use tracing::debug;

/// Everything one repair pass will do, in the order it will do it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepairPlan {
    pub task_renames: Vec<Rename>,
    pub node_renames: Vec<Rename>,
    pub program_renames: Vec<ProgramRename>,
    /// Task fragments to synthesize.
    pub missing_tasks: BTreeSet<String>,
    /// Scheduler-path fragments to synthesize.
    pub missing_nodes: BTreeSet<String>,
    /// Programs that stay missing; program documents are never synthesized.
    pub missing_programs: BTreeSet<String>,
}

impl RepairPlan {
    pub fn is_empty(&self) -> bool {
        self.task_renames.is_empty()
            && self.node_renames.is_empty()
            && self.program_renames.is_empty()
            && self.missing_tasks.is_empty()
            && self.missing_nodes.is_empty()
    }
}

/// Extend the missing sets with every renamed identifier the other spaces lack.
///
/// A name produced by renaming in one space is new to the project; unless the same
/// rename happened in another space, that space needs a fragment for it too.
pub fn plan_repair(ids: &ProjectIds, errors: &ProjectErrors) -> RepairPlan {
    let tasks_after: BTreeSet<String> = ids
        .tasks
        .iter()
        .cloned()
        .chain(errors.renamed_tasks())
        .collect();
    let nodes_after: BTreeSet<String> = ids
        .nodes
        .iter()
        .cloned()
        .chain(errors.renamed_nodes())
        .collect();
    let programs_after: BTreeSet<String> = ids
        .program_names()
        .into_iter()
        .chain(errors.renamed_programs())
        .collect();

    let mut missing_tasks = errors.missing_tasks.clone();
    let mut missing_nodes = errors.missing_nodes.clone();
    let mut missing_programs = errors.missing_programs.clone();

    for name in errors.task_renames.iter().map(|r| &r.replacement) {
        if !nodes_after.contains(name) {
            missing_nodes.insert(name.clone());
        }
        if !programs_after.contains(name) {
            missing_programs.insert(name.clone());
        }
    }

    for name in errors.node_renames.iter().map(|r| &r.replacement) {
        if !tasks_after.contains(name) {
            missing_tasks.insert(name.clone());
        }
        if !programs_after.contains(name) {
            missing_programs.insert(name.clone());
        }
    }

    for name in errors.program_renames.iter().map(|r| &r.replacement) {
        if !tasks_after.contains(name) {
            missing_tasks.insert(name.clone());
        }
        if !nodes_after.contains(name) {
            missing_nodes.insert(name.clone());
        }
    }

    let plan = RepairPlan {
        task_renames: errors.task_renames.clone(),
        node_renames: errors.node_renames.clone(),
        program_renames: errors.program_renames.clone(),
        missing_tasks,
        missing_nodes,
        missing_programs,
    };

    debug!(
        task_renames = plan.task_renames.len(),
        node_renames = plan.node_renames.len(),
        program_renames = plan.program_renames.len(),
        synthesize_tasks = ?plan.missing_tasks,
        synthesize_nodes = ?plan.missing_nodes,
        unresolved_programs = ?plan.missing_programs,
        "planned repair"
    );
    plan
}
