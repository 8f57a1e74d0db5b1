//! In-memory fetch collaborator.
//!
//! Serves entries registered up front. Ids can be hidden from listings (so only
//! a targeted backfill finds them) and per-id failures can be injected to
//! exercise retry behaviour.

use crate::error::FetchError;
use crate::fetcher::{CategoryPage, Fetcher, ItemTypeListing, ItemTypeSource};
use async_trait::async_trait;
use codex_protocol::{Category, EntryId, EntryKey, RawEntry};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Default)]
pub struct MemoryFetcher {
    page_size: usize,
    entries: BTreeMap<String, BTreeMap<EntryKey, RawEntry>>,
    unlisted: BTreeSet<EntryKey>,
    /// (language or any, key) -> failures left
    failures: HashMap<(Option<String>, EntryKey), AtomicUsize>,
    broken_pages: BTreeSet<(String, Category)>,
    item_types: BTreeMap<String, Vec<ItemTypeListing>>,
    page_calls: AtomicUsize,
    entry_calls: AtomicUsize,
}

impl MemoryFetcher {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            ..Self::default()
        }
    }

    pub fn with_entry(mut self, language: &str, entry: RawEntry) -> Self {
        let key = EntryKey::new(entry.category(), entry.id.clone());
        self.entries
            .entry(language.to_string())
            .or_default()
            .insert(key, entry);
        self
    }

    /// Hide `key` from listings in every language
    pub fn unlisted(mut self, key: EntryKey) -> Self {
        self.unlisted.insert(key);
        self
    }

    /// Fail the next `times` fetches of `key` (any language)
    pub fn failing(mut self, key: EntryKey, times: usize) -> Self {
        self.failures.insert((None, key), AtomicUsize::new(times));
        self
    }

    /// Fail the next `times` fetches of `key` in `language` only
    pub fn failing_in(mut self, language: &str, key: EntryKey, times: usize) -> Self {
        self.failures
            .insert((Some(language.to_string()), key), AtomicUsize::new(times));
        self
    }

    /// Every page request of (language, category) fails
    pub fn broken_listing(mut self, language: &str, category: Category) -> Self {
        self.broken_pages.insert((language.to_string(), category));
        self
    }

    pub fn with_item_types(mut self, language: &str, listings: Vec<ItemTypeListing>) -> Self {
        self.item_types.insert(language.to_string(), listings);
        self
    }

    pub fn page_calls(&self) -> usize {
        self.page_calls.load(Ordering::Relaxed)
    }

    pub fn entry_calls(&self) -> usize {
        self.entry_calls.load(Ordering::Relaxed)
    }

    fn listed_ids(&self, category: Category, language: &str) -> Vec<EntryId> {
        self.entries
            .get(language)
            .into_iter()
            .flat_map(BTreeMap::keys)
            .filter(|key| key.category == category && !self.unlisted.contains(key))
            .map(|key| key.id.clone())
            .collect()
    }

    fn take_failure(&self, language: &str, key: &EntryKey) -> bool {
        let take = |slot: &(Option<String>, EntryKey)| {
            self.failures.get(slot).is_some_and(|remaining| {
                remaining
                    .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_sub(1))
                    .is_ok()
            })
        };
        take(&(Some(language.to_string()), key.clone())) || take(&(None, key.clone()))
    }
}

#[async_trait]
impl Fetcher for MemoryFetcher {
    async fn fetch_category_page(
        &self,
        category: Category,
        language: &str,
        page: u32,
    ) -> Result<CategoryPage, FetchError> {
        self.page_calls.fetch_add(1, Ordering::Relaxed);
        if self
            .broken_pages
            .contains(&(language.to_string(), category))
        {
            return Err(FetchError::unavailable(format!(
                "listing {language}:{category} page {page} unavailable"
            )));
        }

        let ids = self.listed_ids(category, language);
        let start = (page.saturating_sub(1) as usize).saturating_mul(self.page_size);
        let page_ids: Vec<_> = ids.iter().skip(start).take(self.page_size).cloned().collect();
        Ok(CategoryPage {
            has_next: start + page_ids.len() < ids.len(),
            ids: page_ids,
        })
    }

    async fn fetch_entry(
        &self,
        category: Category,
        id: &str,
        language: &str,
    ) -> Result<Option<RawEntry>, FetchError> {
        self.entry_calls.fetch_add(1, Ordering::Relaxed);
        let key = EntryKey::new(category, id);
        if self.take_failure(language, &key) {
            return Err(FetchError::unavailable(format!(
                "injected failure for {language}:{key}"
            )));
        }
        Ok(self
            .entries
            .get(language)
            .and_then(|entries| entries.get(&key))
            .cloned())
    }
}

#[async_trait]
impl ItemTypeSource for MemoryFetcher {
    async fn fetch_item_types(&self, language: &str) -> Result<Vec<ItemTypeListing>, FetchError> {
        Ok(self.item_types.get(language).cloned().unwrap_or_default())
    }
}
