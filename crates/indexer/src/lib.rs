//! # Codex Indexer
//!
//! Multi-language entry index, closed under the references relation.
//!
//! ## Pipeline
//!
//! ```text
//! Fetcher (async collaborator)
//!     │
//!     ├──> ListingCrawler
//!     │      └─> every listed (language, category, id)
//!     │
//!     └──> ClosureScheduler
//!            ├─ SCANNING     missing[lang] = discovered - indexed[lang]
//!            ├─ BACKFILLING  targeted fetch of missing ids, per language
//!            └─ DONE | DONE_PARTIAL (per-language residual)
//! ```
//!
//! Fetches run as `tokio` tasks bounded by a [`FetchPool`]. Rounds are strictly
//! sequential; results are merged into the [`EntryIndex`] by key, never
//! overwriting an entry already present.
//!
//! ## Example
//!
//! ```no_run
//! use codex_indexer::{ClosureConfig, ClosureScheduler, EntryIndex, FetchPool, ListingCrawler};
//! use codex_indexer::memory::MemoryFetcher;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> codex_indexer::Result<()> {
//!     let fetcher = Arc::new(MemoryFetcher::new(50));
//!     let config = ClosureConfig::new("en", vec!["en".to_string()]);
//!     let pool = FetchPool::new(4);
//!
//!     let mut index = EntryIndex::new();
//!     ListingCrawler::new(fetcher.clone(), pool.clone(), config.languages.clone())
//!         .crawl(&mut index)
//!         .await?;
//!     let outcome = ClosureScheduler::new(fetcher, pool, config)?
//!         .run(&mut index)
//!         .await?;
//!
//!     println!("closure {:?} after {} rounds", outcome.status, outcome.rounds);
//!     Ok(())
//! }
//! ```

mod closure;
mod entry_index;
mod error;
mod fetcher;
mod item_types;
mod limits;
mod listing;
pub mod memory;
mod stats;
mod worker;

pub use closure::{
    ClosureConfig, ClosureOutcome, ClosureScheduler, ClosureState, ScanResult, DEFAULT_ROUND_BUDGET,
};
pub use entry_index::EntryIndex;
pub use error::{FetchError, IndexerError, Result};
pub use fetcher::{CategoryPage, Fetcher, ItemTypeListing, ItemTypeSource};
pub use item_types::{fetch_item_types, ItemTypeTable};
pub use limits::{
    fetch_concurrency_from_env, FetchPool, FETCH_CONCURRENCY_ENV, MAX_FETCH_CONCURRENCY,
};
pub use listing::ListingCrawler;
pub use stats::CrawlStats;
