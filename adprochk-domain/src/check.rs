use crate::reconcile::reconcile;
use crate::resolve::resolve_duplicates;
use adprochk_types::{ProgramRename, ProjectErrors, ProjectIds, Rename};
use tracing::debug;

/// Classify every identifier of a project as consistent, duplicated or missing.
///
/// Replacement names for duplicates are computed here as well, reserving every
/// identifier seen in any space, so the same duplicate in two spaces resolves to
/// the same new name.
pub fn check_project(ids: &ProjectIds) -> ProjectErrors {
    let program_names = ids.program_names();
    let rec = reconcile(&ids.tasks[..], &ids.nodes[..], &program_names[..]);

    let tasks: Vec<(String, ())> = ids.tasks.iter().map(|t| (t.clone(), ())).collect();
    let nodes: Vec<(String, ())> = ids.nodes.iter().map(|n| (n.clone(), ())).collect();
    let programs: Vec<(String, String)> = ids
        .programs
        .iter()
        .map(|p| (p.name.clone(), p.entry.clone()))
        .collect();

    let task_res = resolve_duplicates(&tasks, &rec.superset);
    let node_res = resolve_duplicates(&nodes, &rec.superset);
    let program_res = resolve_duplicates(&programs, &rec.superset);

    debug!(duplicates = ?task_res.duplicates, "task duplicates");
    debug!(duplicates = ?node_res.duplicates, "node duplicates");
    debug!(duplicates = ?program_res.duplicates, "program duplicates");

    let plain = |r: &crate::resolve::ResolvedRename<()>| Rename {
        index: r.index,
        original: r.original.clone(),
        replacement: r.replacement.clone(),
    };

    ProjectErrors {
        missing_tasks: rec.missing_tasks,
        missing_nodes: rec.missing_nodes,
        missing_programs: rec.missing_programs,
        task_renames: task_res.renames.iter().map(plain).collect(),
        node_renames: node_res.renames.iter().map(plain).collect(),
        program_renames: program_res
            .renames
            .into_iter()
            .map(|r| ProgramRename {
                index: r.index,
                original: r.original,
                replacement: r.replacement,
                entry: r.owner,
            })
            .collect(),
        duplicate_tasks: task_res.duplicates,
        duplicate_nodes: node_res.duplicates,
        duplicate_programs: program_res.duplicates,
    }
}

#[cfg(test)]
mod tests {
    use super::check_project;
    use adprochk_types::{CheckStatus, ProgramRef, ProjectIds};

    fn ids(tasks: &[&str], nodes: &[&str], programs: &[&str]) -> ProjectIds {
        ProjectIds {
            tasks: tasks.iter().map(|s| s.to_string()).collect(),
            nodes: nodes.iter().map(|s| s.to_string()).collect(),
            programs: programs
                .iter()
                .enumerate()
                .map(|(i, p)| ProgramRef {
                    name: p.to_string(),
                    entry: format!("task{}.rll", i + 1),
                })
                .collect(),
        }
    }

    #[test]
    fn clean_project_has_no_findings() {
        let errors = check_project(&ids(&["A", "B"], &["A", "B"], &["B", "A"]));
        assert!(errors.is_clean());
    }

    #[test]
    fn duplicate_program_carries_owning_entry() {
        let errors = check_project(&ids(&["A", "B"], &["A", "B"], &["A", "B", "A"]));
        assert_eq!(errors.status(), CheckStatus::DUPLICATE_PROGRAM);
        assert_eq!(errors.duplicate_programs, vec!["A"]);
        assert_eq!(errors.program_renames.len(), 1);
        assert_eq!(errors.program_renames[0].entry, "task3.rll");
        assert_eq!(errors.program_renames[0].replacement, "A_1");
    }

    #[test]
    fn replacement_avoids_names_from_other_spaces() {
        // "A_1" only exists as a node; a task duplicate of "A" must not take it.
        let errors = check_project(&ids(&["A", "A"], &["A", "A_1"], &["A", "A_1"]));
        assert_eq!(errors.task_renames[0].replacement, "A_2");
        assert!(errors.missing_tasks.contains("A_1"));
    }
}
