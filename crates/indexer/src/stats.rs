use serde::{Deserialize, Serialize};

/// Statistics about a crawl (listing plus closure rounds)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlStats {
    /// Listing pages fetched
    pub pages: usize,

    /// Entries fetched and merged into the index
    pub entries: usize,

    /// Fetched ids that already existed in the index
    pub duplicates: usize,

    /// Ids the collaborator reported as absent
    pub not_found: usize,

    /// Collaborator failures (pages and entries)
    pub fetch_failures: usize,

    /// Time taken in milliseconds
    pub time_ms: u64,

    /// Failure messages, for the log
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl CrawlStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_entry(&mut self, inserted: bool) {
        if inserted {
            self.entries += 1;
        } else {
            self.duplicates += 1;
        }
    }

    pub fn add_not_found(&mut self) {
        self.not_found += 1;
    }

    pub fn add_failure(&mut self, error: String) {
        self.fetch_failures += 1;
        self.errors.push(error);
    }

    pub fn merge(&mut self, other: CrawlStats) {
        self.pages += other.pages;
        self.entries += other.entries;
        self.duplicates += other.duplicates;
        self.not_found += other.not_found;
        self.fetch_failures += other.fetch_failures;
        self.time_ms += other.time_ms;
        self.errors.extend(other.errors);
    }
}
