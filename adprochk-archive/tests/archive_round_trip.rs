use adprochk_archive::{LoadOptions, ProjectArchive, load_project, rebuild};
use adprochk_types::{FatalError, FixFile, SIGNATURE};
use pretty_assertions::assert_eq;
use std::io::{Cursor, Read, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

const MANIFEST: &str = "<project>\
    <tasks><taskName>Main</taskName><sequence>0</sequence><taskId>1</taskId></tasks>\
    <entry><key>0</key><value>\
    <paths><folder>false</folder><nodeName>Main</nodeName><path>Run Every Scan</path></paths>\
    </value></entry></project>";

fn build_zip(entries: &[(&str, &str, CompressionMethod)]) -> Vec<u8> {
    let mut w = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, contents, method) in entries {
        if name.ends_with('/') {
            w.add_directory(*name, SimpleFileOptions::default()).unwrap();
            continue;
        }
        w.start_file(*name, SimpleFileOptions::default().compression_method(*method))
            .unwrap();
        w.write_all(contents.as_bytes()).unwrap();
    }
    w.finish().unwrap().into_inner()
}

fn sample() -> Vec<u8> {
    build_zip(&[
        ("program.prj", MANIFEST, CompressionMethod::Deflated),
        ("task1.rll", "<rll><pgmName>Main</pgmName></rll>", CompressionMethod::Stored),
        ("images/logo.bin", "\u{0}\u{1}\u{2}", CompressionMethod::Stored),
        ("notes.txt", "keep me", CompressionMethod::Deflated),
    ])
}

fn contents(bytes: &[u8]) -> Vec<(String, Vec<u8>)> {
    let body = bytes.strip_prefix(&SIGNATURE[..]).unwrap_or(bytes);
    let mut zip = ZipArchive::new(Cursor::new(body.to_vec())).unwrap();
    (0..zip.len())
        .map(|i| {
            let mut f = zip.by_index(i).unwrap();
            let mut buf = Vec::new();
            f.read_to_end(&mut buf).unwrap();
            (f.name().to_string(), buf)
        })
        .collect()
}

#[test]
fn empty_patch_set_reproduces_entries_behind_signature() {
    let input = sample();
    let mut archive = ProjectArchive::from_bytes("in.adpro", input.clone()).unwrap();
    let out = rebuild(&mut archive, Vec::new()).unwrap();

    assert_eq!(&out[..4], &SIGNATURE[..]);
    assert_eq!(contents(&out), contents(&input));
}

#[test]
fn patched_entry_keeps_position_and_compression() {
    let mut archive = ProjectArchive::from_bytes("in.adpro", sample()).unwrap();
    let patch = FixFile::new("task1.rll", b"<rll><pgmName>Other</pgmName></rll>".to_vec());
    let out = rebuild(&mut archive, vec![patch]).unwrap();

    let entries = contents(&out);
    let names: Vec<&str> = entries.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["program.prj", "task1.rll", "images/logo.bin", "notes.txt"]);
    assert_eq!(entries[1].1, b"<rll><pgmName>Other</pgmName></rll>".to_vec());
    assert_eq!(entries[3].1, b"keep me".to_vec());

    let mut zip = ZipArchive::new(Cursor::new(out[4..].to_vec())).unwrap();
    assert_eq!(
        zip.by_name("task1.rll").unwrap().compression(),
        CompressionMethod::Stored
    );
}

#[test]
fn unmatched_patch_is_appended_and_repeats_are_dropped() {
    let mut archive = ProjectArchive::from_bytes("in.adpro", sample()).unwrap();
    let patches = vec![
        FixFile::new("notes.txt", b"first".to_vec()),
        FixFile::new("notes.txt", b"second".to_vec()),
        FixFile::new("extra.txt", b"new".to_vec()),
    ];
    let out = rebuild(&mut archive, patches).unwrap();

    let entries = contents(&out);
    let tail: Vec<(&str, &[u8])> = entries[3..]
        .iter()
        .map(|(n, c)| (n.as_str(), c.as_slice()))
        .collect();
    assert_eq!(
        tail,
        vec![("notes.txt", &b"first"[..]), ("extra.txt", &b"new"[..])]
    );
}

#[test]
fn signed_input_is_accepted() {
    let mut signed = SIGNATURE.to_vec();
    signed.extend(sample());
    let mut archive = ProjectArchive::from_bytes("out.adpro", signed).unwrap();
    assert!(archive.is_signed());

    let project = load_project(&mut archive, &LoadOptions::default()).unwrap();
    assert_eq!(project.ids().tasks, vec!["Main"]);
}

#[test]
fn program_entries_are_top_level_files_with_marker() {
    let bytes = build_zip(&[
        ("program.prj", MANIFEST, CompressionMethod::Deflated),
        ("task2.rll", "<rll><pgmName>B</pgmName></rll>", CompressionMethod::Deflated),
        ("taskdir/", "", CompressionMethod::Stored),
        ("taskdir/task9.rll", "<rll/>", CompressionMethod::Deflated),
        ("task1.rll", "<rll><pgmName>A</pgmName></rll>", CompressionMethod::Deflated),
        ("readme.txt", "", CompressionMethod::Deflated),
    ]);
    let mut archive = ProjectArchive::from_bytes("in.adpro", bytes).unwrap();
    assert_eq!(
        archive.program_entries("task", "program.prj"),
        vec!["task2.rll", "task1.rll"]
    );

    let project = load_project(&mut archive, &LoadOptions::default()).unwrap();
    let ids = project.ids();
    assert_eq!(ids.program_names(), vec!["B", "A"]);
    assert_eq!(ids.programs[1].entry, "task1.rll");
}

#[test]
fn garbage_is_unreadable() {
    let err = ProjectArchive::from_bytes("junk.adpro", b"not a zip".to_vec()).unwrap_err();
    assert!(matches!(err, FatalError::ArchiveUnreadable { .. }));
}

#[test]
fn missing_manifest_is_corrupt_manifest() {
    let bytes = build_zip(&[("task1.rll", "<rll><pgmName>A</pgmName></rll>", CompressionMethod::Stored)]);
    let mut archive = ProjectArchive::from_bytes("in.adpro", bytes).unwrap();
    let err = load_project(&mut archive, &LoadOptions::default()).unwrap_err();
    assert!(matches!(err, FatalError::CorruptManifest { .. }));
}

#[test]
fn program_without_name_is_missing_field() {
    let bytes = build_zip(&[
        ("program.prj", MANIFEST, CompressionMethod::Deflated),
        ("task1.rll", "<rll><rungs/></rll>", CompressionMethod::Deflated),
    ]);
    let mut archive = ProjectArchive::from_bytes("in.adpro", bytes).unwrap();
    let err = load_project(&mut archive, &LoadOptions::default()).unwrap_err();
    assert_eq!(
        err,
        FatalError::MissingField {
            document: "task1.rll".to_string(),
            field: "pgmName".to_string(),
        }
    );
}
