use crate::error::ReferenceError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Entry id, opaque and unique within a category
pub type EntryId = String;

/// Catalog category.
///
/// Declaration order is processing order: spells come first so that items and
/// creatures can be linked back to them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Spells,
    Items,
    Monsters,
    Bosses,
    Raids,
    Followers,
    Classes,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Spells,
        Category::Items,
        Category::Monsters,
        Category::Bosses,
        Category::Raids,
        Category::Followers,
        Category::Classes,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Spells => "spells",
            Self::Items => "items",
            Self::Monsters => "monsters",
            Self::Bosses => "bosses",
            Self::Raids => "raids",
            Self::Followers => "followers",
            Self::Classes => "classes",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == raw)
    }

    /// Categories whose `skills` make them users of spells
    pub fn is_monster_like(self) -> bool {
        matches!(
            self,
            Self::Monsters | Self::Bosses | Self::Raids | Self::Followers
        )
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Global identity of an entry: `(category, id)`, rendered as `category/id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntryKey {
    pub category: Category,
    pub id: EntryId,
}

impl EntryKey {
    pub fn new(category: Category, id: impl Into<EntryId>) -> Self {
        Self {
            category,
            id: id.into(),
        }
    }
}

impl fmt::Display for EntryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.category, self.id)
    }
}

impl FromStr for EntryKey {
    type Err = ReferenceError;

    /// Strict `category/id` form; pointers with more segments go through
    /// [`crate::extract_reference`].
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let Some((category, id)) = raw.split_once('/') else {
            return Err(ReferenceError::TooFewSegments {
                pointer: raw.to_string(),
            });
        };
        let category = Category::parse(category).ok_or_else(|| ReferenceError::UnknownCategory {
            pointer: raw.to_string(),
            category: category.to_string(),
        })?;
        if id.is_empty() || id.contains('/') {
            return Err(ReferenceError::EmptyId {
                pointer: raw.to_string(),
            });
        }
        Ok(Self::new(category, id))
    }
}

impl TryFrom<String> for EntryKey {
    type Error = ReferenceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<EntryKey> for String {
    fn from(key: EntryKey) -> Self {
        key.to_string()
    }
}
