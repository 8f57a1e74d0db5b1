use codex_protocol::{Category, EntryId, EntryKey, RawEntry};
use std::collections::{BTreeMap, BTreeSet};

type CategoryIndex = BTreeMap<Category, BTreeMap<EntryId, RawEntry>>;

/// language -> category -> id -> entry.
///
/// Append-only: an id already present is never overwritten, so merging the same
/// fetch results twice is a no-op. Iteration is id-sorted everywhere.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryIndex {
    languages: BTreeMap<String, CategoryIndex>,
}

impl EntryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert under the entry's own category; returns false if the id was known
    pub fn insert_if_absent(&mut self, language: &str, entry: RawEntry) -> bool {
        let ids = self
            .languages
            .entry(language.to_string())
            .or_default()
            .entry(entry.category())
            .or_default();
        if ids.contains_key(&entry.id) {
            return false;
        }
        ids.insert(entry.id.clone(), entry);
        true
    }

    pub fn get(&self, language: &str, key: &EntryKey) -> Option<&RawEntry> {
        self.languages
            .get(language)?
            .get(&key.category)?
            .get(&key.id)
    }

    pub fn contains(&self, language: &str, key: &EntryKey) -> bool {
        self.get(language, key).is_some()
    }

    /// Every entry of a language, in category then id order
    pub fn all_entries(&self, language: &str) -> impl Iterator<Item = &RawEntry> {
        self.languages
            .get(language)
            .into_iter()
            .flat_map(BTreeMap::values)
            .flat_map(BTreeMap::values)
    }

    pub fn keys(&self, language: &str) -> BTreeSet<EntryKey> {
        self.all_entries(language)
            .map(|entry| EntryKey::new(entry.category(), entry.id.clone()))
            .collect()
    }

    pub fn len(&self, language: &str) -> usize {
        self.languages
            .get(language)
            .map(|categories| categories.values().map(BTreeMap::len).sum())
            .unwrap_or(0)
    }
}
