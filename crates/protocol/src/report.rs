use crate::category::EntryKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClosureStatus {
    /// Every referenced entry is indexed
    Done,
    /// Round budget ran out with references still missing
    DonePartial,
}

impl fmt::Display for ClosureStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Done => "done",
            Self::DonePartial => "done_partial",
        })
    }
}

/// Completeness counters for one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub closure: ClosureStatus,

    /// Backfill rounds performed by the closure scheduler
    pub rounds_consumed: u32,

    /// Referenced entries never materialized (after the known-unreachable list)
    #[serde(default)]
    pub unresolved_missing: Vec<EntryKey>,

    /// language -> entries that language still lacks, base language included
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub missing_by_language: BTreeMap<String, Vec<EntryKey>>,

    /// Missing entries dropped from the residual because they are known-unreachable
    #[serde(default)]
    pub suppressed_unreachable: usize,

    /// language -> category -> indexed entry count
    #[serde(default)]
    pub entry_counts: BTreeMap<String, BTreeMap<String, usize>>,

    /// Pointers that could not be parsed (relation dropped)
    pub malformed_references: usize,

    /// Catalog edges kept as raw pointers
    pub unresolved_references: usize,

    /// Per-language lists truncated to the base language length
    pub alignment_mismatches: usize,

    /// Collaborator fetch failures (ids retried in later rounds)
    pub fetch_failures: usize,

    /// (language, entry) pairs with no localized entry
    #[serde(default)]
    pub untranslated_entries: usize,

    /// Record fields outside their category's known set, over every language
    #[serde(default)]
    pub unknown_fields: usize,
}

impl RunReport {
    pub fn is_complete(&self) -> bool {
        self.closure == ClosureStatus::Done
            && self.unresolved_missing.is_empty()
            && self.missing_by_language.is_empty()
            && self.unresolved_references == 0
            && self.untranslated_entries == 0
    }
}
