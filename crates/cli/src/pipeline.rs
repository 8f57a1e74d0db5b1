use crate::config::CodexConfig;
use anyhow::{Context, Result};
use codex_indexer::{
    fetch_item_types, ClosureScheduler, CrawlStats, EntryIndex, FetchPool, Fetcher,
    ItemTypeSource, ListingCrawler,
};
use codex_protocol::{Catalog, RunReport, TranslationCatalog};
use codex_reconciler::{build_report, Reconciler};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Everything the writer needs from one run
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub catalog: Catalog,
    pub translations: BTreeMap<String, TranslationCatalog>,
    pub report: RunReport,
}

/// listing crawl -> closure -> item types -> reconcile -> report
pub async fn run<S>(config: &CodexConfig, source: Arc<S>) -> Result<PipelineOutput>
where
    S: Fetcher + ItemTypeSource + 'static,
{
    let closure_config = config.closure_config()?;
    let languages = closure_config.languages.clone();
    let batch_size = closure_config.batch_size;

    // structural checks run before the first fetch
    let reconciler = Reconciler::new(config.base_language.clone(), languages.clone())
        .context("Invalid language configuration")?;
    let fetcher: Arc<dyn Fetcher> = source.clone();
    let pool = FetchPool::new(config.fetch_concurrency());
    let scheduler = ClosureScheduler::new(fetcher.clone(), pool.clone(), closure_config)
        .context("Invalid closure configuration")?;

    log::info!(
        "Crawling {} languages with {} fetch workers",
        languages.len(),
        pool.limit()
    );
    let mut index = EntryIndex::new();
    let listing = ListingCrawler::new(fetcher, pool, languages.clone())
        .with_batch_size(batch_size)
        .crawl(&mut index)
        .await
        .context("Listing crawl failed")?;

    let closure = scheduler
        .run(&mut index)
        .await
        .context("Closure scheduler failed")?;
    log::info!(
        "Closure {} after {} rounds, {} residual, {} languages with gaps",
        closure.status,
        closure.rounds,
        closure.residual.len(),
        closure.residual_by_language.len()
    );

    let mut type_stats = CrawlStats::new();
    let item_types = fetch_item_types(source.as_ref(), &languages, &mut type_stats).await;

    let reconciliation = reconciler.reconcile(&index, &item_types);
    let mut report = build_report(&listing, &closure, &index, &reconciliation.stats);
    report.fetch_failures += type_stats.fetch_failures;

    Ok(PipelineOutput {
        catalog: reconciliation.catalog,
        translations: reconciliation.translations,
        report,
    })
}
