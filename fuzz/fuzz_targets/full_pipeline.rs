#![no_main]

//! Structured fuzzing of check -> plan -> repair -> rebuild -> re-check.
//!
//! Names come from a small alphabet so duplicates and `X_N` collisions are common.

use adprochk_archive::{LoadOptions, ProjectArchive, load_project, rebuild};
use adprochk_domain::{check_project, plan_repair};
use adprochk_edit::{RepairOptions, repair_project};
use libfuzzer_sys::fuzz_target;
use std::io::{Cursor, Write};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

#[derive(Debug, arbitrary::Arbitrary)]
struct ProjectInput {
    tasks: Vec<Name>,
    nodes: Vec<Name>,
    programs: Vec<Name>,
}

#[derive(Debug, arbitrary::Arbitrary)]
enum Name {
    A,
    B,
    C,
    A1,
    A2,
    B1,
}

impl Name {
    fn as_str(&self) -> &'static str {
        match self {
            Name::A => "A",
            Name::B => "B",
            Name::C => "C",
            Name::A1 => "A_1",
            Name::A2 => "A_2",
            Name::B1 => "B_1",
        }
    }
}

fn build(input: &ProjectInput) -> Vec<u8> {
    let mut manifest = String::from("<project>");
    for (i, t) in input.tasks.iter().take(16).enumerate() {
        manifest.push_str(&format!(
            "<tasks><taskName>{}</taskName><sequence>{i}</sequence><taskId>{}</taskId></tasks>",
            t.as_str(),
            i + 1
        ));
    }
    manifest.push_str("<entry><key>0</key><value>");
    for n in input.nodes.iter().take(16) {
        manifest.push_str(&format!(
            "<paths><folder>false</folder><nodeName>{}</nodeName><path>p</path></paths>",
            n.as_str()
        ));
    }
    manifest.push_str("</value></entry></project>");

    let mut w = ZipWriter::new(Cursor::new(Vec::new()));
    w.start_file("program.prj", SimpleFileOptions::default()).unwrap();
    w.write_all(manifest.as_bytes()).unwrap();
    for (i, p) in input.programs.iter().take(16).enumerate() {
        w.start_file(format!("task{}.rll", i + 1), SimpleFileOptions::default())
            .unwrap();
        w.write_all(format!("<rll><pgmName>{}</pgmName></rll>", p.as_str()).as_bytes())
            .unwrap();
    }
    w.finish().unwrap().into_inner()
}

fuzz_target!(|input: ProjectInput| {
    let mut archive = ProjectArchive::from_bytes("fuzz.adpro", build(&input)).unwrap();
    let project = load_project(&mut archive, &LoadOptions::default()).unwrap();
    let ids = project.ids();
    let errors = check_project(&ids);
    let plan = plan_repair(&ids, &errors);

    let mut manifest = project.manifest;
    let mut programs = project.programs;
    let outcome = repair_project(&mut manifest, &mut programs, &plan, &RepairOptions::default())
        .expect("well-formed project repairs");
    let bytes = rebuild(&mut archive, outcome.patches).unwrap();

    // Only programs can remain missing after one pass; nothing is duplicated.
    let mut fixed = ProjectArchive::from_bytes("fixed.adpro", bytes).unwrap();
    let residual = check_project(&load_project(&mut fixed, &LoadOptions::default()).unwrap().ids());
    assert!(residual.duplicate_tasks.is_empty());
    assert!(residual.duplicate_nodes.is_empty());
    assert!(residual.duplicate_programs.is_empty());
    assert!(residual.missing_tasks.is_empty());
    assert!(residual.missing_nodes.is_empty());
});
