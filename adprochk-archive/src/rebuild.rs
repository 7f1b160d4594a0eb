use crate::load::ProjectArchive;
use adprochk_types::{FixFile, SIGNATURE};
use anyhow::Context;
use std::collections::BTreeSet;
use std::io::{Cursor, Write};
use tracing::{debug, info, warn};
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Rebuild `archive` with `patches` applied and return signature + archive bytes.
///
/// Entries keep their order. A patched entry inherits the original compression
/// method, modification time and permissions; every other entry is copied raw.
/// Each patch is consumed at most once; patches naming no existing entry are
/// appended in the order given, and repeats of an already written name are dropped.
pub fn rebuild(archive: &mut ProjectArchive, patches: Vec<FixFile>) -> anyhow::Result<Vec<u8>> {
    let mut pending: Vec<Option<FixFile>> = patches.into_iter().map(Some).collect();
    let mut out = ZipWriter::new(Cursor::new(Vec::new()));
    let mut written = BTreeSet::new();

    let zip = archive.zip_mut();
    for index in 0..zip.len() {
        let file = zip
            .by_index_raw(index)
            .with_context(|| format!("read archive entry #{index}"))?;
        let name = file.name().to_string();
        written.insert(name.clone());

        let patch = pending
            .iter_mut()
            .find(|p| p.as_ref().is_some_and(|p| p.entry == name))
            .and_then(Option::take);

        match patch {
            None => {
                out.raw_copy_file(file)
                    .with_context(|| format!("copy entry {name}"))?;
            }
            Some(patch) => {
                let method = match file.compression() {
                    CompressionMethod::Stored => CompressionMethod::Stored,
                    _ => CompressionMethod::Deflated,
                };
                let mut options = SimpleFileOptions::default().compression_method(method);
                if let Some(modified) = file.last_modified() {
                    options = options.last_modified_time(modified);
                }
                if let Some(mode) = file.unix_mode() {
                    options = options.unix_permissions(mode);
                }
                drop(file);

                out.start_file(name.as_str(), options)
                    .with_context(|| format!("start patched entry {name}"))?;
                out.write_all(&patch.contents)
                    .with_context(|| format!("write patched entry {name}"))?;
                debug!(entry = %name, bytes = patch.contents.len(), "replaced entry");
            }
        }
    }

    for patch in pending.into_iter().flatten() {
        if !written.insert(patch.entry.clone()) {
            warn!(entry = %patch.entry, "dropping repeated patch for an entry already written");
            continue;
        }
        out.start_file(patch.entry.as_str(), SimpleFileOptions::default())
            .with_context(|| format!("start appended entry {}", patch.entry))?;
        out.write_all(&patch.contents)
            .with_context(|| format!("write appended entry {}", patch.entry))?;
        debug!(entry = %patch.entry, "appended entry with no original");
    }

    let body = out.finish().context("finish archive")?.into_inner();
    let mut bytes = Vec::with_capacity(SIGNATURE.len() + body.len());
    bytes.extend_from_slice(&SIGNATURE);
    bytes.extend_from_slice(&body);

    info!(archive = %archive.label(), bytes = bytes.len(), "rebuilt archive");
    Ok(bytes)
}
