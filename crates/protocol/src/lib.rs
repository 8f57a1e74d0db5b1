//! # Codex Protocol
//!
//! Shared data model for the codex catalog builder.
//!
//! ```text
//! Fetch collaborator
//!     │
//!     ├──> RawEntry (per language, per category)
//!     │      ├─ scalar fields (name, icon, meta, ...)
//!     │      └─ ordered lists (tags, events, stats, drops, ...)
//!     │
//!     ├──> Closure scheduler / Reconciler
//!     │
//!     └──> Writer collaborator
//!            ├─ Catalog (CatalogEntry per EntryKey)
//!            ├─ TranslationCatalog per language
//!            └─ RunReport
//! ```

mod catalog;
mod category;
mod entry;
mod error;
mod reference;
mod report;
mod translation;

pub use catalog::{
    AbilityStat, BondEffect, Catalog, CatalogEntry, CatalogMeta, EdgeRef, StatValue, StatusRef,
    ValueKind, ValueType, ValueUnit,
};
pub use category::{Category, EntryId, EntryKey};
pub use entry::{
    Ability, BondLevel, ClassBody, CreatureBody, DropGroup, EntryBody, ExtraFields, FollowerBody,
    FollowerLink, InlineRelation, ItemBody, MetaRow, OffhandAbility, PointerRelation, RaidBody,
    RawEntry, Relation, SpellBody, StatRow, StatText,
};
pub use error::{ReferenceError, Result};
pub use reference::{extract_reference, references_of};
pub use report::{ClosureStatus, RunReport};
pub use translation::{LocalizedText, TranslationCatalog};
