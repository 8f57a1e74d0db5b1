//! # Codex Reconciler
//!
//! Turns the closed multi-language entry index into one canonical catalog plus
//! per-language translation tables.
//!
//! ## Phases
//!
//! ```text
//! EntryIndex (closed)
//!     │
//!     ├──> Planning (base language, id-sorted, single-threaded)
//!     │      └─> CatalogEntry + per-entry key plan
//!     │
//!     ├──> Language walks (one per language, plan + positions)
//!     │      └─> TranslationCatalog[language]
//!     │
//!     └──> Cross-link pass (base language)
//!            ├─ item types, two_handed
//!            ├─ materials -> source / dismantled_by
//!            ├─ skills -> used_by
//!            ├─ "<X> (Off-hand)" spells <-> items
//!            └─ filter options, sortable fields
//! ```
//!
//! ## Example
//!
//! ```rust
//! use codex_indexer::{EntryIndex, ItemTypeTable};
//! use codex_reconciler::Reconciler;
//!
//! let reconciler = Reconciler::new("en", vec!["en".to_string(), "fr".to_string()]).unwrap();
//! let result = reconciler.reconcile(&EntryIndex::new(), &ItemTypeTable::new());
//! assert!(result.catalog.is_empty());
//! assert_eq!(result.translations.len(), 2);
//! ```

mod crosslink;
mod error;
mod facets;
pub mod namespace;
mod plan;
mod report;
mod stats;
mod translate;
pub mod values;

pub use error::{ReconcileError, Result};
pub use report::build_report;
pub use stats::ReconcileStats;

use codex_indexer::{EntryIndex, ItemTypeTable};
use codex_protocol::{Catalog, TranslationCatalog};
use std::collections::BTreeMap;
use std::time::Instant;

/// Output of one reconciliation
#[derive(Debug, Clone)]
pub struct Reconciliation {
    pub catalog: Catalog,
    /// language -> translation tables
    pub translations: BTreeMap<String, TranslationCatalog>,
    pub stats: ReconcileStats,
}

pub struct Reconciler {
    base_language: String,
    languages: Vec<String>,
}

impl Reconciler {
    pub fn new(base_language: impl Into<String>, languages: Vec<String>) -> Result<Self> {
        let base_language = base_language.into();
        if languages.is_empty() {
            return Err(ReconcileError::NoLanguages);
        }
        if !languages.contains(&base_language) {
            return Err(ReconcileError::MissingBaseLanguage(base_language));
        }
        Ok(Self {
            base_language,
            languages,
        })
    }

    /// Never fails: defects degrade to counters in [`ReconcileStats`]
    pub fn reconcile(&self, index: &EntryIndex, item_types: &ItemTypeTable) -> Reconciliation {
        let start = Instant::now();
        let mut stats = ReconcileStats::new();

        log::info!(
            "Planning {} {} entries",
            index.len(&self.base_language),
            self.base_language
        );
        let plan = plan::build(index, &self.base_language);
        stats.entries = plan.catalog.len();
        stats.malformed_references = plan.malformed_references;
        stats.unresolved_references = plan.unresolved_references;

        let mut translations = BTreeMap::new();
        for language in &self.languages {
            let listings = item_types.get(language).map(Vec::as_slice).unwrap_or_default();
            let walk = translate::walk_language(
                language,
                &self.base_language,
                &plan.entries,
                index,
                listings,
            );
            log::info!(
                "Translated {language}: {} entries, {} alignment mismatches",
                walk.catalog.entries.len(),
                walk.alignment_mismatches
            );
            stats.add_language(walk.alignment_mismatches, walk.untranslated_entries);
            stats.unknown_fields += count_unknown_fields(index, language);
            translations.insert(language.clone(), walk.catalog);
        }

        let plan::Plan {
            mut catalog,
            offhands,
            bond_abilities,
            spells_by_name,
            ..
        } = plan;

        let base_listings = item_types
            .get(&self.base_language)
            .map(Vec::as_slice)
            .unwrap_or_default();
        stats.add_links(crosslink::assign_item_types(&mut catalog, base_listings));
        crosslink::normalize_two_handed(&mut catalog);
        stats.add_links(crosslink::link_materials(&mut catalog));
        stats.add_links(crosslink::link_skill_users(&mut catalog));
        let (paired, unmatched) = crosslink::pair_offhands(&mut catalog, &offhands, &spells_by_name);
        stats.add_links(paired);
        stats.unresolved_references += unmatched;
        stats.add_links(crosslink::link_bond_abilities(
            &mut catalog,
            &bond_abilities,
            &spells_by_name,
        ));
        catalog.meta.options = facets::options(&catalog);
        catalog.meta.sorts = facets::sorts(&catalog);

        #[allow(clippy::cast_possible_truncation)]
        {
            stats.time_ms = (start.elapsed().as_millis() as u64).max(1);
        }
        log::info!("Reconciliation completed: {stats:?}");

        Reconciliation {
            catalog,
            translations,
            stats,
        }
    }
}

/// Records of `language` carrying fields their category does not define
fn count_unknown_fields(index: &EntryIndex, language: &str) -> usize {
    let mut count = 0;
    for entry in index.all_entries(language) {
        let extra = entry.extra();
        if extra.is_empty() {
            continue;
        }
        let names: Vec<&str> = extra.keys().map(String::as_str).collect();
        log::warn!(
            "{language} {}/{} has unknown fields: {}",
            entry.category(),
            entry.id,
            names.join(", ")
        );
        count += 1;
    }
    count
}
