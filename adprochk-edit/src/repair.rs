//! Structural repair engine.
//!
//! One pass, no retries: rename duplicates in place, synthesize missing task and
//! scheduler-path fragments, then serialize every mutated document. Any structural
//! violation aborts the pass and discards all patches computed so far.

use crate::manifest::{Manifest, tags};
use crate::program::ProgramDocument;
use crate::xml;
use adprochk_domain::RepairPlan;
use adprochk_types::report::RepairSummary;
use adprochk_types::{FatalError, FixFile, Rename};
use tracing::{debug, info, warn};
use xmltree::{Element, XMLNode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepairOptions {
    /// `<path>` written into synthesized scheduler-path entries.
    pub default_node_path: String,
    /// Key of the container that receives synthesized scheduler-path entries.
    pub container_key: String,
}

impl Default for RepairOptions {
    fn default() -> Self {
        Self {
            default_node_path: "Run Every Scan".to_string(),
            container_key: "0".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RepairOutcome {
    pub patches: Vec<FixFile>,
    pub summary: RepairSummary,
}

pub fn repair_project(
    manifest: &mut Manifest,
    programs: &mut [ProgramDocument],
    plan: &RepairPlan,
    opts: &RepairOptions,
) -> Result<RepairOutcome, FatalError> {
    let mut summary = RepairSummary::default();
    let mut manifest_modified = false;

    // 1. duplicate tasks
    {
        let mut tasks = manifest.tasks_mut();
        for rename in &plan.task_renames {
            rename_fragment(&mut tasks, rename, tags::TASK_NAME, "task")?;
            summary.renamed_tasks.push(rename.clone());
            manifest_modified = true;
        }
    }

    // 2. duplicate nodes
    {
        let mut nodes = manifest.nodes_mut();
        for rename in &plan.node_renames {
            rename_fragment(&mut nodes, rename, tags::NODE_NAME, "scheduler-path entry")?;
            summary.renamed_nodes.push(rename.clone());
            manifest_modified = true;
        }
    }

    // 3. duplicate programs
    for rename in &plan.program_renames {
        let doc = programs
            .iter_mut()
            .find(|p| p.entry() == rename.entry)
            .ok_or_else(|| {
                FatalError::repair_aborted(format!(
                    "program document {} is not loaded",
                    rename.entry
                ))
            })?;
        if doc.name() != rename.original {
            return Err(FatalError::repair_aborted(format!(
                "program document {} declares '{}', expected '{}'",
                rename.entry,
                doc.name(),
                rename.original
            )));
        }
        doc.set_name(&rename.replacement)?;
        debug!(entry = %rename.entry, from = %rename.original, to = %rename.replacement, "renamed program");
        summary.renamed_programs.push(Rename {
            index: rename.index,
            original: rename.original.clone(),
            replacement: rename.replacement.clone(),
        });
    }

    // 4. missing tasks
    for name in &plan.missing_tasks {
        synthesize_task(manifest, name)?;
        summary.synthesized_tasks.push(name.clone());
        manifest_modified = true;
    }

    // 5. missing nodes
    if !plan.missing_nodes.is_empty() {
        let key = choose_container(manifest, &opts.container_key)?;
        summary.node_container_fallback = key != opts.container_key;

        let value = manifest.container_value_mut(&key).ok_or_else(|| {
            FatalError::repair_aborted(format!("container keyed '{key}' disappeared"))
        })?;
        for (index, name) in plan.missing_nodes.iter().enumerate() {
            value
                .children
                .insert(index, XMLNode::Element(node_fragment(name, &opts.default_node_path)));
            debug!(node = %name, key = %key, "synthesized scheduler-path entry");
            summary.synthesized_nodes.push(name.clone());
        }
        summary.node_container_key = Some(key);
        manifest_modified = true;
    }

    summary.unresolved_programs = plan.missing_programs.iter().cloned().collect();
    for name in &summary.unresolved_programs {
        warn!(program = %name, "missing program cannot be synthesized; left unresolved");
    }

    // 6. serialize
    let mut patches = Vec::new();
    if manifest_modified {
        patches.push(FixFile::new(manifest.entry(), manifest.to_bytes()?));
    }
    for doc in programs.iter().filter(|p| p.is_modified()) {
        patches.push(FixFile::new(doc.entry(), doc.to_bytes()?));
    }
    summary.patched_entries = patches.iter().map(|p| p.entry.clone()).collect();

    info!(
        patches = patches.len(),
        tasks_renamed = summary.renamed_tasks.len(),
        nodes_renamed = summary.renamed_nodes.len(),
        programs_renamed = summary.renamed_programs.len(),
        tasks_synthesized = summary.synthesized_tasks.len(),
        nodes_synthesized = summary.synthesized_nodes.len(),
        "repair pass complete"
    );

    Ok(RepairOutcome { patches, summary })
}

fn rename_fragment(
    fragments: &mut [&mut Element],
    rename: &Rename,
    name_tag: &str,
    what: &str,
) -> Result<(), FatalError> {
    let fragment = fragments.get_mut(rename.index).ok_or_else(|| {
        FatalError::repair_aborted(format!(
            "{what} #{} for '{}' not found",
            rename.index, rename.original
        ))
    })?;

    let current = xml::child_text(fragment, name_tag);
    if current.as_deref() != Some(rename.original.as_str()) {
        return Err(FatalError::repair_aborted(format!(
            "{what} #{} is '{}', expected '{}'",
            rename.index,
            current.unwrap_or_default(),
            rename.original
        )));
    }

    let field = fragment.get_mut_child(name_tag).ok_or_else(|| {
        FatalError::repair_aborted(format!("{what} #{} lost its <{name_tag}>", rename.index))
    })?;
    xml::set_text(field, &rename.replacement);
    debug!(index = rename.index, from = %rename.original, to = %rename.replacement, "renamed {what}");
    Ok(())
}

fn integer_field(manifest_entry: &str, el: &Element, tag: &str) -> Result<i64, FatalError> {
    let text = xml::child_text(el, tag).ok_or_else(|| FatalError::MissingField {
        document: manifest_entry.to_string(),
        field: tag.to_string(),
    })?;
    text.trim()
        .parse::<i64>()
        .map_err(|e| FatalError::CorruptManifest {
            entry: manifest_entry.to_string(),
            message: format!("<{tag}> '{text}' is not an integer: {e}"),
        })
}

/// Prepend a task with sequence 0 and the next free id, shifting every other sequence by one.
///
/// Unnamed task fragments still hold a sequence and an id, so they take part
/// in the renumbering.
fn synthesize_task(manifest: &mut Manifest, name: &str) -> Result<(), FatalError> {
    let entry = manifest.entry().to_string();

    let mut max_id = 0i64;
    let mut tasks = manifest.all_task_fragments_mut();
    let mut sequences = Vec::with_capacity(tasks.len());
    for task in tasks.iter() {
        max_id = max_id.max(integer_field(&entry, task, tags::TASK_ID)?);
        sequences.push(integer_field(&entry, task, tags::TASK_SEQUENCE)?);
    }
    for (task, sequence) in tasks.iter_mut().zip(sequences) {
        let next = incremented(&entry, tags::TASK_SEQUENCE, sequence)?;
        let field = task.get_mut_child(tags::TASK_SEQUENCE).ok_or_else(|| {
            FatalError::MissingField {
                document: entry.clone(),
                field: tags::TASK_SEQUENCE.to_string(),
            }
        })?;
        xml::set_text(field, &next.to_string());
    }

    let id = incremented(&entry, tags::TASK_ID, max_id)?;
    manifest.insert_task_first(task_fragment(name, 0, id));
    debug!(task = %name, task_id = id, "synthesized task");
    Ok(())
}

fn incremented(manifest_entry: &str, tag: &str, value: i64) -> Result<i64, FatalError> {
    value
        .checked_add(1)
        .ok_or_else(|| FatalError::CorruptManifest {
            entry: manifest_entry.to_string(),
            message: format!("<{tag}> {value} overflows when incremented"),
        })
}

fn task_fragment(name: &str, sequence: i64, id: i64) -> Element {
    let mut el = Element::new(tags::TASK);
    el.children = vec![
        XMLNode::Element(xml::text_element(tags::TASK_NAME, name)),
        XMLNode::Element(xml::text_element(tags::TASK_SEQUENCE, &sequence.to_string())),
        XMLNode::Element(xml::text_element(tags::TASK_ID, &id.to_string())),
    ];
    el
}

fn node_fragment(name: &str, path: &str) -> Element {
    let mut el = Element::new(tags::NODE);
    el.children = vec![
        XMLNode::Element(xml::text_element(tags::NODE_FOLDER, "false")),
        XMLNode::Element(xml::text_element(tags::NODE_NAME, name)),
        XMLNode::Element(xml::text_element(tags::NODE_PATH, path)),
    ];
    el
}

/// The configured container key when present, else the first keyed container.
fn choose_container(manifest: &Manifest, wanted: &str) -> Result<String, FatalError> {
    let keys = manifest.container_keys();
    if keys.iter().any(|k| k == wanted) {
        return Ok(wanted.to_string());
    }
    match keys.into_iter().next() {
        Some(key) => {
            warn!(
                wanted = %wanted,
                used = %key,
                "no scheduler container keyed '{wanted}'; inserting into container keyed '{key}'"
            );
            Ok(key)
        }
        None => Err(FatalError::repair_aborted(format!(
            "manifest {} has no keyed value container for scheduler-path entries",
            manifest.entry()
        ))),
    }
}
