use crate::error::FetchError;
use async_trait::async_trait;
use codex_protocol::{Category, EntryId, RawEntry};
use serde::{Deserialize, Serialize};

/// One listing page of a (category, language)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryPage {
    pub ids: Vec<EntryId>,
    pub has_next: bool,
}

/// Source of raw entries. Pages are 1-based.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch_category_page(
        &self,
        category: Category,
        language: &str,
        page: u32,
    ) -> Result<CategoryPage, FetchError>;

    /// `Ok(None)` means the id does not exist in this language
    async fn fetch_entry(
        &self,
        category: Category,
        id: &str,
        language: &str,
    ) -> Result<Option<RawEntry>, FetchError>;
}

/// One item type and the items it covers, in one language
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemTypeListing {
    #[serde(rename = "type")]
    pub item_type: String,
    pub name: String,
    #[serde(default, alias = "itemIds")]
    pub item_ids: Vec<EntryId>,
}

#[async_trait]
pub trait ItemTypeSource: Send + Sync {
    async fn fetch_item_types(&self, language: &str) -> Result<Vec<ItemTypeListing>, FetchError>;
}
