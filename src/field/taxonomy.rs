//! Taxonomy term reference formatting.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};

/// A taxonomy term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    pub tid: u64,
    /// Vocabulary id.
    pub vid: String,
    pub name: String,
}

impl Term {
    pub fn new(tid: u64, vid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            tid,
            vid: vid.into(),
            name: name.into(),
        }
    }
}

/// One item of a term reference field.
///
/// `target_id == 0` with an attached `entity` is a term that will be created
/// on save (autocreate).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermReference {
    pub target_id: u64,
    #[serde(default)]
    pub entity: Option<Term>,
}

impl TermReference {
    pub fn new(target_id: u64) -> Self {
        Self {
            target_id,
            entity: None,
        }
    }

    /// A reference to a term not saved yet.
    pub fn autocreate(term: Term) -> Self {
        Self {
            target_id: 0,
            entity: Some(term),
        }
    }
}

/// Loads terms by id.
pub trait TermStorage: Send + Sync {
    /// Load every existing term of `tids`; missing ids are absent.
    fn load_multiple(&self, tids: &[u64]) -> HashMap<u64, Term>;
}

/// Term storage backed by a map, counting batch loads.
#[derive(Debug, Default)]
pub struct MemoryTermStorage {
    terms: HashMap<u64, Term>,
    loads: AtomicUsize,
}

impl MemoryTermStorage {
    pub fn new(terms: impl IntoIterator<Item = Term>) -> Self {
        Self {
            terms: terms.into_iter().map(|term| (term.tid, term)).collect(),
            loads: AtomicUsize::new(0),
        }
    }

    /// Number of `load_multiple` calls so far.
    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl TermStorage for MemoryTermStorage {
    fn load_multiple(&self, tids: &[u64]) -> HashMap<u64, Term> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        tids.iter().filter_map(|tid| self.terms.get(tid).map(|term| (*tid, term.clone()))).collect()
    }
}

/// Shared preparation of the taxonomy term formatters.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaxonomyFormatter;

impl TaxonomyFormatter {
    /// Attach loaded terms to the items of every entity.
    ///
    /// All referenced ids are loaded in one batch. Items whose term exists
    /// get it attached; autocreate items stay as they are; every other item
    /// is removed and the remaining items shift down. When no item
    /// references a saved term nothing is loaded or changed.
    pub fn prepare_view(&self, entities_items: &mut [Vec<TermReference>], storage: &dyn TermStorage) {
        let tids: BTreeSet<u64> = entities_items
            .iter()
            .flatten()
            .map(|item| item.target_id)
            .filter(|tid| *tid != 0)
            .collect();
        if tids.is_empty() {
            return;
        }

        let tids: Vec<u64> = tids.into_iter().collect();
        let terms = storage.load_multiple(&tids);

        for items in entities_items.iter_mut() {
            let before = items.len();
            items.retain_mut(|item| {
                if let Some(term) = terms.get(&item.target_id) {
                    item.entity = Some(term.clone());
                    true
                } else {
                    item.target_id == 0 && item.entity.is_some()
                }
            });
            if items.len() != before {
                tracing::debug!("Dropped {} reference(s) to missing terms", before - items.len());
            }
        }
    }

    /// Names of the terms attached to `items`.
    pub fn term_names(items: &[TermReference]) -> Vec<&str> {
        items.iter().filter_map(|item| item.entity.as_ref().map(|term| term.name.as_str())).collect()
    }
}
