use crate::category::{Category, EntryKey};
use crate::entry::RawEntry;
use crate::error::{ReferenceError, Result};

/// Parse a path-like pointer (`/codex/items/iron-sword/`) into an entry key.
///
/// Only the last two path segments are significant: `category/id`.
pub fn extract_reference(pointer: &str) -> Result<EntryKey> {
    let trimmed = pointer.trim().trim_matches('/');
    let mut segments = trimmed.rsplit('/');
    let (Some(id), Some(category)) = (segments.next(), segments.next()) else {
        return Err(ReferenceError::TooFewSegments {
            pointer: pointer.to_string(),
        });
    };
    if id.is_empty() {
        return Err(ReferenceError::EmptyId {
            pointer: pointer.to_string(),
        });
    }
    let category = Category::parse(category).ok_or_else(|| ReferenceError::UnknownCategory {
        pointer: pointer.to_string(),
        category: category.to_string(),
    })?;
    Ok(EntryKey::new(category, id))
}

/// Every pointer relation of an entry, parsed in field order
pub fn references_of(entry: &RawEntry) -> impl Iterator<Item = Result<EntryKey>> + '_ {
    entry
        .drops()
        .iter()
        .flat_map(|group| group.relations.iter())
        .filter_map(|relation| relation.pointer())
        .map(extract_reference)
}
