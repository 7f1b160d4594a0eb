use adprochk_render::{render_findings, render_repair, render_report_text};
use adprochk_types::report::{CheckReport, RepairReport, RepairSummary, RunInfo, ToolInfo};
use adprochk_types::{CheckStatus, ProgramRef, ProjectErrors, ProjectIds, Rename};
use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;

fn ids() -> ProjectIds {
    ProjectIds {
        tasks: vec!["A".into(), "B".into(), "A".into()],
        nodes: vec!["A".into(), "B".into()],
        programs: vec![
            ProgramRef {
                name: "A".into(),
                entry: "task1.rll".into(),
            },
            ProgramRef {
                name: "A".into(),
                entry: "task3.rll".into(),
            },
        ],
    }
}

fn errors() -> ProjectErrors {
    ProjectErrors {
        missing_programs: ["B".to_string()].into_iter().collect(),
        duplicate_tasks: vec!["A".into()],
        duplicate_programs: vec!["A".into()],
        ..ProjectErrors::default()
    }
}

#[test]
fn findings_follow_fixed_group_order() {
    let text = render_findings(&ids(), &errors());
    assert_eq!(
        text,
        "Duplicated Task Entries:\n\
         A\n\n\
         Duplicated Pgm Entries:\n\
         A : 'task1.rll', 'task3.rll'\n\
         Missing Task Program:\n\
         B\n\n"
    );
}

#[test]
fn clean_project_renders_nothing() {
    assert_eq!(render_findings(&ids(), &ProjectErrors::default()), "");
}

#[test]
fn repair_section_lists_changes_and_residue() {
    let repair = RepairReport {
        output: "fixed.adpro".into(),
        output_bytes: 1234,
        output_sha256: "ab".repeat(32),
        summary: RepairSummary {
            renamed_tasks: vec![Rename {
                index: 2,
                original: "A".into(),
                replacement: "A_1".into(),
            }],
            synthesized_nodes: vec!["A_1".into()],
            node_container_key: Some("0".into()),
            unresolved_programs: vec!["A_1".into()],
            patched_entries: vec!["program.prj".into()],
            ..RepairSummary::default()
        },
        residual: Some(ProjectErrors {
            missing_programs: ["A_1".to_string()].into_iter().collect(),
            ..ProjectErrors::default()
        }),
    };

    let text = render_repair(&repair);
    assert!(text.starts_with("Repaired archive written to fixed.adpro\n"));
    assert!(text.contains("- Renamed tasks: A -> A_1\n"));
    assert!(text.contains("- Synthesized scheduler entries in container '0': A_1\n"));
    assert!(text.contains("- Unresolved missing programs: A_1\n"));
    assert!(text.contains("- Patched entries: program.prj\n"));
    assert!(text.contains("Residual findings after repair: 0x20 (missing_program)\n"));
    assert!(text.contains("- missing program: A_1\n"));
}

#[test]
fn fallback_container_is_flagged() {
    let repair = RepairReport {
        output: "out.adpro".into(),
        output_bytes: 1,
        output_sha256: String::new(),
        summary: RepairSummary {
            synthesized_nodes: vec!["B".into()],
            node_container_key: Some("3".into()),
            node_container_fallback: true,
            ..RepairSummary::default()
        },
        residual: Some(ProjectErrors::default()),
    };
    let text = render_repair(&repair);
    assert!(text.contains("container '3' (fallback): B"));
    assert!(text.ends_with("Rebuilt archive verified clean.\n"));
}

#[test]
fn report_ends_with_status_line() {
    let status = CheckStatus::DUPLICATE_TASK | CheckStatus::DUPLICATE_PROGRAM | CheckStatus::MISSING_PROGRAM;
    let report = CheckReport {
        schema: adprochk_types::schema::ADPROCHK_REPORT_V1.into(),
        tool: ToolInfo {
            name: "adprochk".into(),
            version: "0.1.0".into(),
        },
        run: RunInfo {
            started_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            ended_at: None,
        },
        input: "in.adpro".into(),
        status,
        status_labels: status.labels().iter().map(|s| s.to_string()).collect(),
        exit_code: status.exit_code(),
        ids: Some(ids()),
        findings: Some(errors()),
        repair: None,
        fatal: None,
    };
    let text = render_report_text(&report);
    assert!(text.starts_with("Duplicated Task Entries:\n"));
    assert!(text.ends_with(
        "status: 0x26 (duplicate_task, duplicate_program, missing_program) (exit 38)\n"
    ));
}

#[test]
fn fatal_report_carries_error_line() {
    let status = CheckStatus::CORRUPT_MANIFEST;
    let report = CheckReport {
        schema: adprochk_types::schema::ADPROCHK_REPORT_V1.into(),
        tool: ToolInfo {
            name: "adprochk".into(),
            version: "0.1.0".into(),
        },
        run: RunInfo {
            started_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            ended_at: None,
        },
        input: "in.adpro".into(),
        status,
        status_labels: vec!["corrupt_manifest".into()],
        exit_code: status.exit_code(),
        ids: None,
        findings: None,
        repair: None,
        fatal: Some("corrupt manifest program.prj: entry not found".into()),
    };
    assert_eq!(
        render_report_text(&report),
        "error: corrupt manifest program.prj: entry not found\n\
         status: 0x2000000 (corrupt_manifest) (exit 130)\n"
    );
}
