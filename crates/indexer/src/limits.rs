use crate::error::{IndexerError, Result};
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

pub const MAX_FETCH_CONCURRENCY: usize = 32;
pub const FETCH_CONCURRENCY_ENV: &str = "CODEX_FETCH_CONCURRENCY";

fn parse_fetch_concurrency(raw: Option<&str>, default_value: usize) -> usize {
    raw.map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(default_value)
        .clamp(1, MAX_FETCH_CONCURRENCY)
}

/// Configured worker count, overridden by `CODEX_FETCH_CONCURRENCY`
pub fn fetch_concurrency_from_env(default_value: usize) -> usize {
    let raw = std::env::var(FETCH_CONCURRENCY_ENV).ok();
    parse_fetch_concurrency(raw.as_deref(), default_value)
}

/// Bounded worker pool shared by listing and backfill fetches.
///
/// One instance per run; clones share the same permits.
#[derive(Debug, Clone)]
pub struct FetchPool {
    semaphore: Arc<Semaphore>,
    limit: usize,
}

impl FetchPool {
    pub fn new(limit: usize) -> Self {
        let limit = limit.clamp(1, MAX_FETCH_CONCURRENCY);
        Self {
            semaphore: Arc::new(Semaphore::new(limit)),
            limit,
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub(crate) async fn acquire(&self) -> Result<OwnedSemaphorePermit> {
        self.semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| IndexerError::PoolClosed)
    }

    #[cfg(test)]
    pub(crate) fn close(&self) {
        self.semaphore.close();
    }
}
