use crate::entry_index::EntryIndex;
use crate::error::{IndexerError, Result};
use crate::fetcher::Fetcher;
use crate::limits::FetchPool;
use crate::listing::elapsed_ms;
use crate::stats::CrawlStats;
use crate::worker::{batch_jobs, merge_fetched, run_fetch_jobs};
use codex_protocol::{references_of, Category, ClosureStatus, EntryId, EntryKey};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

pub const DEFAULT_ROUND_BUDGET: u32 = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosureConfig {
    pub base_language: String,
    /// Every language to backfill, base included
    pub languages: Vec<String>,
    pub round_budget: u32,
    pub batch_size: usize,
    /// Entries known to be unreachable; removed from the residual only
    pub known_unreachable: BTreeSet<EntryKey>,
    /// Entries absent from every listing, added to `discovered` on each scan
    pub seeds: BTreeSet<EntryKey>,
}

impl ClosureConfig {
    pub fn new(base_language: impl Into<String>, languages: Vec<String>) -> Self {
        Self {
            base_language: base_language.into(),
            languages,
            round_budget: DEFAULT_ROUND_BUDGET,
            batch_size: 32,
            known_unreachable: BTreeSet::new(),
            seeds: BTreeSet::new(),
        }
    }

    pub fn with_round_budget(mut self, round_budget: u32) -> Self {
        self.round_budget = round_budget;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.round_budget == 0 {
            return Err(IndexerError::InvalidRoundBudget(self.round_budget));
        }
        if self.languages.is_empty() {
            return Err(IndexerError::InvalidConfig(
                "no languages configured".to_string(),
            ));
        }
        if !self.languages.contains(&self.base_language) {
            return Err(IndexerError::InvalidConfig(format!(
                "base language {:?} is not in the language list",
                self.base_language
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClosureState {
    Scanning,
    Backfilling,
    Done,
    DonePartial,
}

impl fmt::Display for ClosureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Scanning => "SCANNING",
            Self::Backfilling => "BACKFILLING",
            Self::Done => "DONE",
            Self::DonePartial => "DONE_PARTIAL",
        })
    }
}

/// One scan of the index against the base language
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    pub discovered: BTreeSet<EntryKey>,
    /// Base-language gaps: discovered but not indexed
    pub missing: BTreeSet<EntryKey>,
    /// language -> gaps, non-empty sets only. A non-base language also lacks
    /// every base entry it has no localized record of.
    pub missing_by_language: BTreeMap<String, BTreeSet<EntryKey>>,
    /// Pointers that failed to parse; their relations are dropped
    pub malformed: usize,
}

impl ScanResult {
    pub fn is_closed(&self) -> bool {
        self.missing_by_language.is_empty()
    }

    fn gap_count(&self) -> usize {
        self.missing_by_language.values().map(BTreeSet::len).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosureOutcome {
    pub status: ClosureStatus,
    /// Backfill rounds performed
    pub rounds: u32,
    /// Base-language gaps after the last scan, minus known-unreachable entries
    pub residual: Vec<EntryKey>,
    /// Same, per language; languages without gaps are absent
    pub residual_by_language: BTreeMap<String, Vec<EntryKey>>,
    /// Distinct known-unreachable entries dropped from the residual
    pub suppressed_unreachable: usize,
    pub stats: CrawlStats,
}

/// Drives the index to closure under the references relation
pub struct ClosureScheduler {
    fetcher: Arc<dyn Fetcher>,
    pool: FetchPool,
    config: ClosureConfig,
}

impl ClosureScheduler {
    /// Fails on structural misconfiguration, before anything is fetched
    pub fn new(fetcher: Arc<dyn Fetcher>, pool: FetchPool, config: ClosureConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            fetcher,
            pool,
            config,
        })
    }

    /// `missing = discovered - indexed`, computed for every configured language
    pub fn scan(&self, index: &EntryIndex) -> ScanResult {
        let base = &self.config.base_language;
        let mut result = ScanResult {
            discovered: self.config.seeds.clone(),
            ..ScanResult::default()
        };

        for entry in index.all_entries(base) {
            for reference in references_of(entry) {
                match reference {
                    Ok(key) => {
                        result.discovered.insert(key);
                    }
                    Err(err) => {
                        log::debug!("{}/{}: {err}", entry.category(), entry.id);
                        result.malformed += 1;
                    }
                }
            }
        }

        let mut expected = index.keys(base);
        expected.extend(result.discovered.iter().cloned());

        for language in &self.config.languages {
            let wanted = if language == base {
                &result.discovered
            } else {
                &expected
            };
            let gaps: BTreeSet<EntryKey> = wanted
                .iter()
                .filter(|key| !index.contains(language, key))
                .cloned()
                .collect();
            if !gaps.is_empty() {
                result.missing_by_language.insert(language.clone(), gaps);
            }
        }
        result.missing = result
            .missing_by_language
            .get(base)
            .cloned()
            .unwrap_or_default();
        result
    }

    pub async fn run(&self, index: &mut EntryIndex) -> Result<ClosureOutcome> {
        let start = Instant::now();
        let mut stats = CrawlStats::new();
        let mut rounds = 0u32;
        let mut scan = ScanResult::default();
        let mut state = ClosureState::Scanning;

        loop {
            log::debug!("Closure state {state} (round {rounds})");
            state = match state {
                ClosureState::Scanning => {
                    scan = self.scan(index);
                    if scan.is_closed() {
                        ClosureState::Done
                    } else if rounds >= self.config.round_budget {
                        ClosureState::DonePartial
                    } else {
                        ClosureState::Backfilling
                    }
                }
                ClosureState::Backfilling => {
                    log::info!(
                        "Backfill round {}: {} missing entries over {} languages",
                        rounds + 1,
                        scan.gap_count(),
                        scan.missing_by_language.len()
                    );
                    let round_stats = self.backfill(index, &scan.missing_by_language).await?;
                    stats.merge(round_stats);
                    rounds += 1;
                    ClosureState::Scanning
                }
                ClosureState::Done | ClosureState::DonePartial => break,
            };
        }

        let mut suppressed = BTreeSet::new();
        let mut residual_by_language = BTreeMap::new();
        for (language, gaps) in scan.missing_by_language {
            let (unreachable, kept): (Vec<EntryKey>, Vec<EntryKey>) = gaps
                .into_iter()
                .partition(|key| self.config.known_unreachable.contains(key));
            suppressed.extend(unreachable);
            if !kept.is_empty() {
                residual_by_language.insert(language, kept);
            }
        }
        let residual = residual_by_language
            .get(&self.config.base_language)
            .cloned()
            .unwrap_or_default();

        let status = if state == ClosureState::Done {
            ClosureStatus::Done
        } else {
            for (language, keys) in &residual_by_language {
                for key in keys {
                    log::warn!("Unresolved {language} entry after {rounds} rounds: {key}");
                }
            }
            ClosureStatus::DonePartial
        };

        stats.time_ms = elapsed_ms(start);
        log::info!(
            "Closure {state} after {rounds} rounds: {} residual in {} languages, {} known unreachable",
            residual_by_language.values().map(Vec::len).sum::<usize>(),
            residual_by_language.len(),
            suppressed.len()
        );

        Ok(ClosureOutcome {
            status,
            rounds,
            residual,
            residual_by_language,
            suppressed_unreachable: suppressed.len(),
            stats,
        })
    }

    /// Targeted fetch of each language's gaps; merged by key
    async fn backfill(
        &self,
        index: &mut EntryIndex,
        missing: &BTreeMap<String, BTreeSet<EntryKey>>,
    ) -> Result<CrawlStats> {
        let mut jobs = Vec::new();
        for (language, keys) in missing {
            let mut by_category: BTreeMap<Category, Vec<EntryId>> = BTreeMap::new();
            for key in keys {
                by_category
                    .entry(key.category)
                    .or_default()
                    .push(key.id.clone());
            }
            for (category, ids) in by_category {
                jobs.extend(batch_jobs(language, category, ids, self.config.batch_size));
            }
        }

        let mut stats = CrawlStats::new();
        let fetched = run_fetch_jobs(&self.fetcher, &self.pool, jobs).await?;
        merge_fetched(index, fetched, &mut stats);
        Ok(stats)
    }
}
