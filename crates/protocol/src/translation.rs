use crate::category::EntryKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Localized name/description pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedText {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Per-language translation tables.
///
/// `msg` maps namespace (status, tags, events, stats, item_type, ...) to
/// canonical key to localized text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationCatalog {
    pub language: String,
    #[serde(default)]
    pub msg: BTreeMap<String, BTreeMap<String, String>>,
    #[serde(default)]
    pub entries: BTreeMap<EntryKey, LocalizedText>,
    #[serde(default)]
    pub abilities: BTreeMap<String, LocalizedText>,
}

impl TranslationCatalog {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            ..Default::default()
        }
    }

    pub fn get(&self, namespace: &str, key: &str) -> Option<&str> {
        self.msg
            .get(namespace)
            .and_then(|table| table.get(key))
            .map(String::as_str)
    }
}
