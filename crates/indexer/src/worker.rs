use crate::entry_index::EntryIndex;
use crate::error::{FetchError, Result};
use crate::fetcher::Fetcher;
use crate::limits::FetchPool;
use crate::stats::CrawlStats;
use codex_protocol::{Category, EntryId, RawEntry};
use std::sync::Arc;

/// Disjoint unit of fetch work: one (language, category, id batch)
#[derive(Debug, Clone)]
pub(crate) struct FetchJob {
    pub language: String,
    pub category: Category,
    pub ids: Vec<EntryId>,
}

pub(crate) enum FetchOutcome {
    Found(RawEntry),
    NotFound,
    Failed(String),
}

pub(crate) struct FetchedEntry {
    pub language: String,
    pub category: Category,
    pub id: EntryId,
    pub outcome: FetchOutcome,
}

/// Split ids into batch jobs; ids are sorted so job layout is stable
pub(crate) fn batch_jobs(
    language: &str,
    category: Category,
    mut ids: Vec<EntryId>,
    batch_size: usize,
) -> Vec<FetchJob> {
    ids.sort();
    ids.dedup();
    ids.chunks(batch_size.max(1))
        .map(|batch| FetchJob {
            language: language.to_string(),
            category,
            ids: batch.to_vec(),
        })
        .collect()
}

/// Run jobs as spawned tasks under the pool; results come back in job order.
///
/// A panicked task counts as a failure for each of its ids.
pub(crate) async fn run_fetch_jobs(
    fetcher: &Arc<dyn Fetcher>,
    pool: &FetchPool,
    jobs: Vec<FetchJob>,
) -> Result<Vec<FetchedEntry>> {
    if jobs.is_empty() {
        return Ok(Vec::new());
    }

    let mut tasks = Vec::with_capacity(jobs.len());
    for job in jobs {
        let fetcher = fetcher.clone();
        let pool = pool.clone();
        let fallback = job.clone();
        let task = tokio::spawn(async move { fetch_job(fetcher, pool, job).await });
        tasks.push((fallback, task));
    }

    let mut fetched = Vec::new();
    let mut pending = tasks.into_iter();
    while let Some((job, task)) = pending.next() {
        match task.await {
            Ok(Ok(results)) => fetched.extend(results),
            Ok(Err(err)) => {
                for (_, task) in pending {
                    task.abort();
                }
                return Err(err);
            }
            Err(err) => {
                let message = format!("Task panicked: {err}");
                fetched.extend(job.ids.into_iter().map(|id| FetchedEntry {
                    language: job.language.clone(),
                    category: job.category,
                    id,
                    outcome: FetchOutcome::Failed(message.clone()),
                }));
            }
        }
    }
    Ok(fetched)
}

async fn fetch_job(
    fetcher: Arc<dyn Fetcher>,
    pool: FetchPool,
    job: FetchJob,
) -> Result<Vec<FetchedEntry>> {
    let _permit = pool.acquire().await?;
    let mut results = Vec::with_capacity(job.ids.len());
    for id in job.ids {
        let outcome = match fetcher.fetch_entry(job.category, &id, &job.language).await {
            Ok(Some(entry)) => check_identity(job.category, &id, entry),
            Ok(None) => FetchOutcome::NotFound,
            Err(err) => FetchOutcome::Failed(describe(&job.language, job.category, &id, &err)),
        };
        results.push(FetchedEntry {
            language: job.language.clone(),
            category: job.category,
            id,
            outcome,
        });
    }
    Ok(results)
}

fn check_identity(category: Category, id: &str, entry: RawEntry) -> FetchOutcome {
    if entry.category() != category || entry.id != id {
        return FetchOutcome::Failed(format!(
            "requested {category}/{id} but received {}/{}",
            entry.category(),
            entry.id
        ));
    }
    FetchOutcome::Found(entry)
}

fn describe(language: &str, category: Category, id: &str, err: &FetchError) -> String {
    format!("{language}:{category}/{id}: {err}")
}

/// Merge fetch results into the index by key
pub(crate) fn merge_fetched(
    index: &mut EntryIndex,
    fetched: Vec<FetchedEntry>,
    stats: &mut CrawlStats,
) {
    for item in fetched {
        match item.outcome {
            FetchOutcome::Found(entry) => {
                let inserted = index.insert_if_absent(&item.language, entry);
                stats.add_entry(inserted);
            }
            FetchOutcome::NotFound => {
                log::debug!("{}:{}/{} not found", item.language, item.category, item.id);
                stats.add_not_found();
            }
            FetchOutcome::Failed(message) => {
                log::warn!("Failed to fetch entry: {message}");
                stats.add_failure(message);
            }
        }
    }
}
