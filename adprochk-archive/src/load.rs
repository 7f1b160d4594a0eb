use adprochk_edit::{Manifest, ProgramDocument};
use adprochk_types::{FatalError, ProgramRef, ProjectIds, SIGNATURE};
use std::io::{Cursor, Read};
use tracing::debug;
use zip::ZipArchive;

/// Entry naming conventions of a project archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    pub manifest_entry: String,
    /// Substring that marks a top-level entry as a program document.
    pub task_marker: String,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            manifest_entry: "program.prj".to_string(),
            task_marker: "task".to_string(),
        }
    }
}

/// An opened project archive held entirely in memory.
pub struct ProjectArchive {
    label: String,
    signed: bool,
    zip: ZipArchive<Cursor<Vec<u8>>>,
}

impl std::fmt::Debug for ProjectArchive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectArchive")
            .field("label", &self.label)
            .field("signed", &self.signed)
            .field("entries", &self.zip.len())
            .finish()
    }
}

impl ProjectArchive {
    /// Open archive bytes; a leading signature is skipped.
    pub fn from_bytes(label: &str, mut bytes: Vec<u8>) -> Result<Self, FatalError> {
        let signed = bytes.starts_with(&SIGNATURE);
        if signed {
            bytes.drain(..SIGNATURE.len());
            debug!(archive = %label, "skipping archive signature");
        }
        let zip = ZipArchive::new(Cursor::new(bytes)).map_err(|e| {
            FatalError::ArchiveUnreadable {
                path: label.to_string(),
                message: e.to_string(),
            }
        })?;
        debug!(archive = %label, entries = zip.len(), signed, "opened archive");
        Ok(Self {
            label: label.to_string(),
            signed,
            zip,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Whether the input already carried the signature.
    pub fn is_signed(&self) -> bool {
        self.signed
    }

    pub fn len(&self) -> usize {
        self.zip.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zip.is_empty()
    }

    /// Entry names in central-directory order.
    pub fn entry_names(&self) -> Vec<String> {
        (0..self.zip.len())
            .filter_map(|i| self.zip.name_for_index(i).map(str::to_string))
            .collect()
    }

    /// Top-level, non-directory entries whose name contains `marker`.
    pub fn program_entries(&self, marker: &str, manifest_entry: &str) -> Vec<String> {
        self.entry_names()
            .into_iter()
            .filter(|name| {
                !name.ends_with('/')
                    && !name.contains('/')
                    && name != manifest_entry
                    && name.contains(marker)
            })
            .collect()
    }

    /// Decompressed contents of `name`, or `None` when the archive has no such entry.
    pub fn read_entry(&mut self, name: &str) -> Result<Option<Vec<u8>>, String> {
        if self.zip.index_for_name(name).is_none() {
            return Ok(None);
        }
        let mut file = self.zip.by_name(name).map_err(|e| e.to_string())?;
        let mut buf = Vec::with_capacity(usize::try_from(file.size()).unwrap_or(0));
        file.read_to_end(&mut buf).map_err(|e| e.to_string())?;
        Ok(Some(buf))
    }

    pub(crate) fn zip_mut(&mut self) -> &mut ZipArchive<Cursor<Vec<u8>>> {
        &mut self.zip
    }
}

/// Parsed manifest and program documents of one archive.
#[derive(Debug, Clone)]
pub struct LoadedProject {
    pub manifest: Manifest,
    pub programs: Vec<ProgramDocument>,
}

impl LoadedProject {
    /// Identifier spaces in document order.
    pub fn ids(&self) -> ProjectIds {
        ProjectIds {
            tasks: self.manifest.task_names(),
            nodes: self.manifest.node_names(),
            programs: self
                .programs
                .iter()
                .map(|p| ProgramRef {
                    name: p.name(),
                    entry: p.entry().to_string(),
                })
                .collect(),
        }
    }
}

/// Parse the manifest and every program document of an opened archive.
///
/// A missing or unparsable manifest, or any program document that cannot be read
/// or lacks its name, is fatal.
pub fn load_project(
    archive: &mut ProjectArchive,
    opts: &LoadOptions,
) -> Result<LoadedProject, FatalError> {
    let manifest_bytes = archive
        .read_entry(&opts.manifest_entry)
        .map_err(|message| FatalError::CorruptManifest {
            entry: opts.manifest_entry.clone(),
            message,
        })?
        .ok_or_else(|| FatalError::CorruptManifest {
            entry: opts.manifest_entry.clone(),
            message: format!("entry not found in {}", archive.label()),
        })?;
    let manifest = Manifest::parse(&opts.manifest_entry, &manifest_bytes)?;

    let mut programs = Vec::new();
    for entry in archive.program_entries(&opts.task_marker, &opts.manifest_entry) {
        let bytes = archive
            .read_entry(&entry)
            .map_err(|message| FatalError::CorruptProgram {
                entry: entry.clone(),
                message,
            })?
            .ok_or_else(|| FatalError::CorruptProgram {
                entry: entry.clone(),
                message: "entry vanished while loading".to_string(),
            })?;
        let doc = ProgramDocument::parse(&entry, &bytes)?;
        debug!(entry = %entry, program = %doc.name(), "loaded program document");
        programs.push(doc);
    }

    debug!(
        archive = %archive.label(),
        programs = programs.len(),
        "loaded project"
    );
    Ok(LoadedProject { manifest, programs })
}
