use crate::entry_index::EntryIndex;
use crate::error::Result;
use crate::fetcher::Fetcher;
use crate::limits::FetchPool;
use crate::stats::CrawlStats;
use crate::worker::{batch_jobs, merge_fetched, run_fetch_jobs};
use codex_protocol::{Category, EntryId, EntryKey};
use std::sync::Arc;
use std::time::Instant;

const DEFAULT_BATCH_SIZE: usize = 32;

/// Paginates every (language, category) listing and fetches the listed entries.
pub struct ListingCrawler {
    fetcher: Arc<dyn Fetcher>,
    pool: FetchPool,
    languages: Vec<String>,
    batch_size: usize,
}

struct Listing {
    language: String,
    category: Category,
    ids: Vec<EntryId>,
    pages: usize,
    failure: Option<String>,
}

impl ListingCrawler {
    pub fn new(fetcher: Arc<dyn Fetcher>, pool: FetchPool, languages: Vec<String>) -> Self {
        Self {
            fetcher,
            pool,
            languages,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub async fn crawl(&self, index: &mut EntryIndex) -> Result<CrawlStats> {
        let start = Instant::now();
        let mut stats = CrawlStats::new();

        let listings = self.paginate_all().await?;

        let mut jobs = Vec::new();
        for listing in listings {
            stats.pages += listing.pages;
            if let Some(message) = listing.failure {
                log::warn!("Listing stopped early: {message}");
                stats.add_failure(message);
            }
            let unknown: Vec<EntryId> = listing
                .ids
                .into_iter()
                .filter(|id| {
                    !index.contains(&listing.language, &EntryKey::new(listing.category, id.clone()))
                })
                .collect();
            jobs.extend(batch_jobs(
                &listing.language,
                listing.category,
                unknown,
                self.batch_size,
            ));
        }

        log::debug!("Fetching listed entries in {} batches", jobs.len());
        let fetched = run_fetch_jobs(&self.fetcher, &self.pool, jobs).await?;
        merge_fetched(index, fetched, &mut stats);

        stats.time_ms = elapsed_ms(start);
        log::info!(
            "Listing crawl completed: {} pages, {} entries, {} failures",
            stats.pages,
            stats.entries,
            stats.fetch_failures
        );
        Ok(stats)
    }

    async fn paginate_all(&self) -> Result<Vec<Listing>> {
        let mut tasks = Vec::new();
        for language in &self.languages {
            for category in Category::ALL {
                let fetcher = self.fetcher.clone();
                let pool = self.pool.clone();
                let language = language.clone();
                tasks.push(tokio::spawn(async move {
                    paginate(fetcher, pool, language, category).await
                }));
            }
        }

        let mut listings = Vec::with_capacity(tasks.len());
        for task in tasks {
            match task.await {
                Ok(listing) => listings.push(listing?),
                Err(err) => log::warn!("Listing task panicked: {err}"),
            }
        }
        Ok(listings)
    }
}

async fn paginate(
    fetcher: Arc<dyn Fetcher>,
    pool: FetchPool,
    language: String,
    category: Category,
) -> Result<Listing> {
    let mut listing = Listing {
        language,
        category,
        ids: Vec::new(),
        pages: 0,
        failure: None,
    };

    let mut page = 1u32;
    loop {
        let result = {
            let _permit = pool.acquire().await?;
            fetcher
                .fetch_category_page(category, &listing.language, page)
                .await
        };
        match result {
            Ok(fetched) => {
                listing.pages += 1;
                let empty = fetched.ids.is_empty();
                listing.ids.extend(fetched.ids);
                if !fetched.has_next {
                    break;
                }
                if empty {
                    log::warn!(
                        "{}:{category} page {page} is empty but claims a next page; stopping",
                        listing.language
                    );
                    break;
                }
            }
            Err(err) => {
                listing.failure = Some(format!(
                    "{}:{category} page {page}: {err}",
                    listing.language
                ));
                break;
            }
        }
        page += 1;
    }

    log::debug!(
        "{}:{category} listed {} ids over {} pages",
        listing.language,
        listing.ids.len(),
        listing.pages
    );
    Ok(listing)
}

#[allow(clippy::cast_possible_truncation)]
pub(crate) fn elapsed_ms(start: Instant) -> u64 {
    (start.elapsed().as_millis() as u64).max(1)
}
