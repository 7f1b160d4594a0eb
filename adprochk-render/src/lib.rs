//! Rendering helpers (plain text) for human-readable output.

use adprochk_types::report::{CheckReport, RepairReport, RepairSummary};
use adprochk_types::{ProjectErrors, ProjectIds, Rename};

/// Findings grouped by kind: duplicates first (nodes, tasks, programs), then
/// missing entries (nodes, tasks, programs). Clean projects render nothing.
pub fn render_findings(ids: &ProjectIds, errors: &ProjectErrors) -> String {
    let mut out = String::new();

    column(&mut out, "Duplicated Node Entries:", &errors.duplicate_nodes);
    column(&mut out, "Duplicated Task Entries:", &errors.duplicate_tasks);
    if !errors.duplicate_programs.is_empty() {
        out.push_str("Duplicated Pgm Entries:\n");
        for dup in &errors.duplicate_programs {
            let entries: Vec<String> = ids
                .program_entries(dup)
                .into_iter()
                .map(|e| format!("'{e}'"))
                .collect();
            out.push_str(&format!("{dup} : {}\n", entries.join(", ")));
        }
    }

    column(&mut out, "Missing Task Manager Entry:", &errors.missing_nodes);
    column(&mut out, "Missing Task Definition:", &errors.missing_tasks);
    column(&mut out, "Missing Task Program:", &errors.missing_programs);

    out
}

fn column<'a>(out: &mut String, heading: &str, names: impl IntoIterator<Item = &'a String>) {
    let mut names = names.into_iter().peekable();
    if names.peek().is_none() {
        return;
    }
    out.push_str(heading);
    out.push('\n');
    for name in names {
        out.push_str(&format!("{name}\n\n"));
    }
}

pub fn render_repair(repair: &RepairReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("Repaired archive written to {}\n", repair.output));
    out.push_str(&format!(
        "- Size: {} bytes (sha256 {})\n",
        repair.output_bytes, repair.output_sha256
    ));
    render_summary(&mut out, &repair.summary);

    match &repair.residual {
        Some(residual) if !residual.is_clean() => {
            out.push_str(&format!(
                "\nResidual findings after repair: {}\n",
                residual.status()
            ));
            for name in &residual.missing_programs {
                out.push_str(&format!("- missing program: {name}\n"));
            }
            for name in &residual.missing_tasks {
                out.push_str(&format!("- missing task: {name}\n"));
            }
            for name in &residual.missing_nodes {
                out.push_str(&format!("- missing scheduler entry: {name}\n"));
            }
            for name in residual
                .duplicate_tasks
                .iter()
                .chain(&residual.duplicate_nodes)
                .chain(&residual.duplicate_programs)
            {
                out.push_str(&format!("- duplicate: {name}\n"));
            }
        }
        Some(_) => out.push_str("\nRebuilt archive verified clean.\n"),
        None => {}
    }
    out
}

fn render_summary(out: &mut String, summary: &RepairSummary) {
    renames(out, "Renamed tasks", &summary.renamed_tasks);
    renames(out, "Renamed scheduler entries", &summary.renamed_nodes);
    renames(out, "Renamed programs", &summary.renamed_programs);
    if !summary.synthesized_tasks.is_empty() {
        out.push_str(&format!(
            "- Synthesized tasks: {}\n",
            summary.synthesized_tasks.join(", ")
        ));
    }
    if !summary.synthesized_nodes.is_empty() {
        let key = summary.node_container_key.as_deref().unwrap_or("-");
        let fallback = if summary.node_container_fallback {
            " (fallback)"
        } else {
            ""
        };
        out.push_str(&format!(
            "- Synthesized scheduler entries in container '{key}'{fallback}: {}\n",
            summary.synthesized_nodes.join(", ")
        ));
    }
    if !summary.unresolved_programs.is_empty() {
        out.push_str(&format!(
            "- Unresolved missing programs: {}\n",
            summary.unresolved_programs.join(", ")
        ));
    }
    if summary.patched_entries.is_empty() {
        out.push_str("- Patched entries: none\n");
    } else {
        out.push_str(&format!(
            "- Patched entries: {}\n",
            summary.patched_entries.join(", ")
        ));
    }
}

fn renames(out: &mut String, label: &str, renames: &[Rename]) {
    if renames.is_empty() {
        return;
    }
    let pairs: Vec<String> = renames
        .iter()
        .map(|r| format!("{} -> {}", r.original, r.replacement))
        .collect();
    out.push_str(&format!("- {label}: {}\n", pairs.join(", ")));
}

/// Full text report: findings, optional repair section, then the status line.
pub fn render_report_text(report: &CheckReport) -> String {
    let mut out = String::new();
    if let (Some(ids), Some(findings)) = (&report.ids, &report.findings) {
        out.push_str(&render_findings(ids, findings));
    }
    if let Some(repair) = &report.repair {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&render_repair(repair));
    }
    if let Some(fatal) = &report.fatal {
        out.push_str(&format!("error: {fatal}\n"));
    }
    out.push_str(&format!(
        "status: {} (exit {})\n",
        report.status, report.exit_code
    ));
    out
}
