use std::collections::{BTreeSet, HashSet};
use tracing::debug;

/// Three-way set difference between the task, node and program spaces.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    pub superset: BTreeSet<String>,
    pub missing_tasks: BTreeSet<String>,
    pub missing_nodes: BTreeSet<String>,
    pub missing_programs: BTreeSet<String>,
}

impl Reconciliation {
    pub fn is_consistent(&self) -> bool {
        self.missing_tasks.is_empty()
            && self.missing_nodes.is_empty()
            && self.missing_programs.is_empty()
    }
}

/// Report, for each space, the identifiers seen elsewhere but absent from it.
///
/// Duplicates are irrelevant here; they are classified by
/// [`find_duplicates`](crate::find_duplicates).
pub fn reconcile<S: AsRef<str>>(tasks: &[S], nodes: &[S], programs: &[S]) -> Reconciliation {
    let task_set: HashSet<&str> = tasks.iter().map(AsRef::as_ref).collect();
    let node_set: HashSet<&str> = nodes.iter().map(AsRef::as_ref).collect();
    let program_set: HashSet<&str> = programs.iter().map(AsRef::as_ref).collect();

    let superset: BTreeSet<String> = task_set
        .iter()
        .chain(node_set.iter())
        .chain(program_set.iter())
        .map(|s| s.to_string())
        .collect();

    let missing_from = |space: &HashSet<&str>| -> BTreeSet<String> {
        superset
            .iter()
            .filter(|name| !space.contains(name.as_str()))
            .cloned()
            .collect()
    };

    let out = Reconciliation {
        missing_tasks: missing_from(&task_set),
        missing_nodes: missing_from(&node_set),
        missing_programs: missing_from(&program_set),
        superset,
    };

    debug!(
        consistent = out.is_consistent(),
        superset = out.superset.len(),
        missing_tasks = out.missing_tasks.len(),
        missing_nodes = out.missing_nodes.len(),
        missing_programs = out.missing_programs.len(),
        "reconciled identifier spaces"
    );
    out
}
