use crate::stats::ReconcileStats;
use codex_indexer::{ClosureOutcome, CrawlStats, EntryIndex};
use codex_protocol::RunReport;

/// Completeness report for one run
pub fn build_report(
    listing: &CrawlStats,
    closure: &ClosureOutcome,
    index: &EntryIndex,
    stats: &ReconcileStats,
) -> RunReport {
    RunReport {
        closure: closure.status,
        rounds_consumed: closure.rounds,
        unresolved_missing: closure.residual.clone(),
        missing_by_language: closure.residual_by_language.clone(),
        suppressed_unreachable: closure.suppressed_unreachable,
        entry_counts: index.counts(),
        malformed_references: stats.malformed_references,
        unresolved_references: stats.unresolved_references,
        alignment_mismatches: stats.alignment_mismatches,
        untranslated_entries: stats.untranslated_entries,
        unknown_fields: stats.unknown_fields,
        fetch_failures: listing.fetch_failures + closure.stats.fetch_failures,
    }
}
