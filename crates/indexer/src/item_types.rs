use crate::fetcher::{ItemTypeListing, ItemTypeSource};
use crate::stats::CrawlStats;
use std::collections::BTreeMap;

/// language -> item type listings
pub type ItemTypeTable = BTreeMap<String, Vec<ItemTypeListing>>;

/// Fetch the item-type listing of every language.
///
/// A failing language is logged, counted, and left out of the table.
pub async fn fetch_item_types(
    source: &dyn ItemTypeSource,
    languages: &[String],
    stats: &mut CrawlStats,
) -> ItemTypeTable {
    let mut table = ItemTypeTable::new();
    for language in languages {
        match source.fetch_item_types(language).await {
            Ok(listings) => {
                log::debug!("{language}: {} item types", listings.len());
                table.insert(language.clone(), listings);
            }
            Err(err) => {
                let message = format!("{language}: item types: {err}");
                log::warn!("Failed to fetch item types: {message}");
                stats.add_failure(message);
            }
        }
    }
    table
}
