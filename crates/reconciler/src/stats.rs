/// Counters of one reconciliation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    /// Catalog entries produced
    pub entries: usize,

    /// Pointers that failed to parse; relation dropped
    pub malformed_references: usize,

    /// Edges kept raw (pointer outside the index, off-hand without spell)
    pub unresolved_references: usize,

    /// Localized lists truncated to the base length
    pub alignment_mismatches: usize,

    /// (language, entry) pairs with no localized entry
    pub untranslated_entries: usize,

    /// (language, entry) records carrying fields outside their category schema
    pub unknown_fields: usize,

    /// Back references and links added by the cross-link pass
    pub links: usize,

    /// Time taken in milliseconds
    pub time_ms: u64,
}

impl ReconcileStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_language(&mut self, alignment_mismatches: usize, untranslated_entries: usize) {
        self.alignment_mismatches += alignment_mismatches;
        self.untranslated_entries += untranslated_entries;
    }

    pub fn add_links(&mut self, count: usize) {
        self.links += count;
    }
}
