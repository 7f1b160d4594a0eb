use crate::names::NameGenerator;
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::debug;

/// A fresh name for one duplicate occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRename<O> {
    /// Position of the occurrence in the input sequence.
    pub index: usize,
    pub original: String,
    pub replacement: String,
    pub owner: O,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution<O> {
    /// Every second-or-later occurrence, in input order.
    pub duplicates: Vec<String>,
    pub renames: Vec<ResolvedRename<O>>,
}

impl<O> Default for Resolution<O> {
    fn default() -> Self {
        Self {
            duplicates: Vec::new(),
            renames: Vec::new(),
        }
    }
}

/// Identifiers that occur more than once, listed once per extra occurrence.
pub fn find_duplicates<S: AsRef<str>>(ids: &[S]) -> Vec<String> {
    let mut seen = HashSet::new();
    ids.iter()
        .map(AsRef::as_ref)
        .filter(|id| !seen.insert(*id))
        .map(str::to_string)
        .collect()
}

/// Assign collision-free names to every duplicate occurrence after the first.
///
/// Candidates come from one [`NameGenerator`] per original name and are tried
/// against a single pool holding `reserved`, every input identifier and every
/// name assigned so far, so two different duplicate values can never be given
/// the same replacement.
pub fn resolve_duplicates<O: Clone>(
    items: &[(String, O)],
    reserved: &BTreeSet<String>,
) -> Resolution<O> {
    let mut pool: HashSet<String> = reserved.iter().cloned().collect();
    pool.extend(items.iter().map(|(id, _)| id.clone()));

    let mut seen: HashSet<&str> = HashSet::new();
    let mut generators: HashMap<&str, NameGenerator> = HashMap::new();
    let mut out = Resolution::default();

    for (index, (id, owner)) in items.iter().enumerate() {
        if seen.insert(id.as_str()) {
            continue;
        }
        out.duplicates.push(id.clone());

        let names = generators
            .entry(id.as_str())
            .or_insert_with(|| NameGenerator::new(id.as_str()));
        let mut candidate = names.current();
        while pool.contains(&candidate) {
            candidate = names.advance();
        }
        pool.insert(candidate.clone());

        debug!(index, original = %id, replacement = %candidate, "resolved duplicate");
        out.renames.push(ResolvedRename {
            index,
            original: id.clone(),
            replacement: candidate,
            owner: owner.clone(),
        });
    }

    out
}
