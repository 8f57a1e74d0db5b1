//! Offline [`Fetcher`] over pre-parsed record snapshots.
//!
//! ```text
//! <input>/
//!   listings/<language>/<category>.json   [["id", ...], ...]  one array per page
//!   entries/<language>/<category>.json    [RawEntry, ...]
//!   item_types/<language>.json            [{"type", "name", "itemIds"}, ...]
//! ```
//!
//! A missing listing file lists every snapshot entry of that category on one
//! page. Entries present in `entries/` but absent from `listings/` are only
//! reachable through references.

use anyhow::{Context, Result};
use async_trait::async_trait;
use codex_indexer::{CategoryPage, FetchError, Fetcher, ItemTypeListing, ItemTypeSource};
use codex_protocol::{Category, EntryId, RawEntry};
use serde::de::DeserializeOwned;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

type Shelf = (String, Category);

#[derive(Debug, Default)]
pub struct SnapshotFetcher {
    listings: HashMap<Shelf, Vec<Vec<EntryId>>>,
    entries: HashMap<Shelf, BTreeMap<EntryId, RawEntry>>,
    item_types: HashMap<String, Vec<ItemTypeListing>>,
}

impl SnapshotFetcher {
    pub fn load(root: &Path, languages: &[String]) -> Result<Self> {
        if !root.is_dir() {
            anyhow::bail!("Snapshot directory {} does not exist", root.display());
        }
        let mut fetcher = Self::default();

        for language in languages {
            for category in Category::ALL {
                let file = format!("{category}.json");
                let entries_path = root.join("entries").join(language).join(&file);
                if let Some(records) = read_json::<Vec<RawEntry>>(&entries_path)? {
                    let mut by_id = BTreeMap::new();
                    for record in records {
                        if record.category() != category {
                            log::warn!(
                                "{}: {} is a {} record, skipping",
                                entries_path.display(),
                                record.id,
                                record.category()
                            );
                            continue;
                        }
                        by_id.entry(record.id.clone()).or_insert(record);
                    }
                    fetcher
                        .entries
                        .insert((language.clone(), category), by_id);
                }

                let listing_path = root.join("listings").join(language).join(&file);
                if let Some(pages) = read_json::<Vec<Vec<EntryId>>>(&listing_path)? {
                    fetcher.listings.insert((language.clone(), category), pages);
                }
            }

            let types_path = root.join("item_types").join(format!("{language}.json"));
            if let Some(listings) = read_json::<Vec<ItemTypeListing>>(&types_path)? {
                fetcher.item_types.insert(language.clone(), listings);
            }
        }

        log::debug!(
            "Loaded snapshot {}: {} entry files, {} listing files",
            root.display(),
            fetcher.entries.len(),
            fetcher.listings.len()
        );
        Ok(fetcher)
    }

    fn pages(&self, shelf: &Shelf) -> Vec<Vec<EntryId>> {
        if let Some(pages) = self.listings.get(shelf) {
            return pages.clone();
        }
        match self.entries.get(shelf) {
            Some(entries) => vec![entries.keys().cloned().collect()],
            None => Vec::new(),
        }
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.is_file() {
        return Ok(None);
    }
    let data =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let value = serde_json::from_slice(&data)
        .with_context(|| format!("Failed to decode {}", path.display()))?;
    Ok(Some(value))
}

#[async_trait]
impl Fetcher for SnapshotFetcher {
    async fn fetch_category_page(
        &self,
        category: Category,
        language: &str,
        page: u32,
    ) -> Result<CategoryPage, FetchError> {
        let pages = self.pages(&(language.to_string(), category));
        let index = page.saturating_sub(1) as usize;
        Ok(CategoryPage {
            ids: pages.get(index).cloned().unwrap_or_default(),
            has_next: index + 1 < pages.len(),
        })
    }

    async fn fetch_entry(
        &self,
        category: Category,
        id: &str,
        language: &str,
    ) -> Result<Option<RawEntry>, FetchError> {
        Ok(self
            .entries
            .get(&(language.to_string(), category))
            .and_then(|entries| entries.get(id))
            .cloned())
    }
}

#[async_trait]
impl ItemTypeSource for SnapshotFetcher {
    async fn fetch_item_types(&self, language: &str) -> Result<Vec<ItemTypeListing>, FetchError> {
        Ok(self.item_types.get(language).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    fn write(root: &Path, rel: &str, body: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, body).unwrap();
    }

    #[tokio::test]
    async fn listing_pages_come_from_file() {
        let temp = tempfile::tempdir().unwrap();
        write(temp.path(), "listings/en/spells.json", r#"[["a", "b"], ["c"]]"#);
        let fetcher = SnapshotFetcher::load(temp.path(), &["en".to_string()]).unwrap();

        let first = fetcher
            .fetch_category_page(Category::Spells, "en", 1)
            .await
            .unwrap();
        assert_eq!(first.ids, vec!["a", "b"]);
        assert!(first.has_next);
        let second = fetcher
            .fetch_category_page(Category::Spells, "en", 2)
            .await
            .unwrap();
        assert_eq!(second.ids, vec!["c"]);
        assert!(!second.has_next);
    }

    #[tokio::test]
    async fn unlisted_category_lists_every_entry() {
        let temp = tempfile::tempdir().unwrap();
        write(
            temp.path(),
            "entries/en/spells.json",
            r#"[{"id": "heal", "name": "Heal", "category": "spells"},
                {"id": "bolt", "name": "Bolt", "category": "spells"},
                {"id": "sword", "name": "Sword", "category": "items"}]"#,
        );
        let fetcher = SnapshotFetcher::load(temp.path(), &["en".to_string()]).unwrap();

        let page = fetcher
            .fetch_category_page(Category::Spells, "en", 1)
            .await
            .unwrap();
        assert_eq!(page.ids, vec!["bolt", "heal"]);
        assert!(!page.has_next);
        assert!(fetcher
            .fetch_entry(Category::Spells, "sword", "en")
            .await
            .unwrap()
            .is_none());
        let heal = fetcher.fetch_entry(Category::Spells, "heal", "en").await.unwrap();
        assert_eq!(heal.map(|e| e.name), Some("Heal".to_string()));
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let temp = tempfile::tempdir().unwrap();
        write(temp.path(), "entries/en/items.json", "{not json");
        let err = SnapshotFetcher::load(temp.path(), &["en".to_string()]).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to decode"));
    }
}
