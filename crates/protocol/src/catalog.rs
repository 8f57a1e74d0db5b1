use crate::category::{Category, EntryId, EntryKey};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Reconciled catalog handed to the writer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub entries: BTreeMap<EntryKey, CatalogEntry>,
    pub meta: CatalogMeta,
}

impl Catalog {
    pub fn get(&self, key: &EntryKey) -> Option<&CatalogEntry> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &EntryKey) -> Option<&mut CatalogEntry> {
        self.entries.get_mut(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogMeta {
    /// Canonical key of an icon-backed entity -> icon path
    #[serde(default)]
    pub icons: BTreeMap<String, String>,

    /// `stats.<key>` / `bonds.<key>` / `abilities.<key>` -> value shape
    #[serde(default)]
    pub value_types: BTreeMap<String, ValueType>,

    /// Ability key -> canonical stat key -> value, from the first entry listing it
    #[serde(default)]
    pub ability_stats: BTreeMap<String, BTreeMap<String, AbilityStat>>,

    /// Filter field -> distinct values over the whole catalog
    #[serde(default)]
    pub options: BTreeMap<String, Vec<String>>,

    /// Category -> sortable `stats.<key>` fields
    #[serde(default)]
    pub sorts: BTreeMap<String, Vec<String>>,
}

/// Canonical, base-language keyed entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub category: Category,
    pub id: EntryId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aura: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hp: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exotic: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub two_handed: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spell_type: Option<String>,
    /// Canonical target of a spell (`Targets` stat row)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub targets: Option<String>,
    /// Icon key of the follower a raid rewards
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follower: Option<String>,

    /// Canonical values of text meta rows (rarity, family, place, ...)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub stats: BTreeMap<String, StatValue>,
    /// Stat key -> canonical conditions (`+10% (vs undead)`)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub stats_conditions: BTreeMap<String, Vec<String>>,
    /// Class skill -> level it is learned at
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub skills_level: BTreeMap<EntryKey, u32>,

    /// Pointer sections keyed by canonical group label
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub relations: BTreeMap<String, Vec<EdgeRef>>,
    /// Inline sections (causes, gives, summons, ...) keyed by canonical group label
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub statuses: BTreeMap<String, Vec<StatusRef>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub abilities: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bestial_bond: Vec<Vec<BondEffect>>,
    /// Off-hand ability, rewritten to the matching spell when one exists
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ability: Option<EdgeRef>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub source: Vec<EntryKey>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dismantled_by: Vec<EntryKey>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub used_by: Vec<EntryKey>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub off_hands: Vec<EntryKey>,
}

impl CatalogEntry {
    pub fn new(key: &EntryKey) -> Self {
        Self {
            category: key.category,
            id: key.id.clone(),
            icon: None,
            aura: None,
            tier: None,
            hp: None,
            exotic: None,
            item_type: None,
            two_handed: None,
            spell_type: None,
            targets: None,
            follower: None,
            attributes: BTreeMap::new(),
            tags: Vec::new(),
            events: Vec::new(),
            stats: BTreeMap::new(),
            stats_conditions: BTreeMap::new(),
            skills_level: BTreeMap::new(),
            relations: BTreeMap::new(),
            statuses: BTreeMap::new(),
            abilities: Vec::new(),
            bestial_bond: Vec::new(),
            ability: None,
            source: Vec::new(),
            dismantled_by: Vec::new(),
            used_by: Vec::new(),
            off_hands: Vec::new(),
        }
    }

    pub fn key(&self) -> EntryKey {
        EntryKey::new(self.category, self.id.clone())
    }

    /// Resolved targets of a pointer section
    pub fn edges<'a>(&'a self, group: &str) -> impl Iterator<Item = &'a EntryKey> + 'a {
        self.relations
            .get(group)
            .into_iter()
            .flatten()
            .filter_map(EdgeRef::resolved)
    }
}

/// Relation edge: resolved to an entry of the closed index, or kept as the raw
/// pointer text when the target never materialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EdgeRef {
    Resolved(EntryKey),
    Unresolved(String),
}

impl EdgeRef {
    pub fn resolved(&self) -> Option<&EntryKey> {
        match self {
            Self::Resolved(key) => Some(key),
            Self::Unresolved(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusRef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chance: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatValue {
    Flag(bool),
    Integer(i64),
    Number(f64),
    Text(String),
    List(Vec<String>),
}

/// Value of one ability stat: a plain stat value, or the statuses it gives or causes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AbilityStat {
    Value(StatValue),
    Statuses(Vec<StatusRef>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BondEffect {
    /// Status applied with a chance, e.g. `Rot (10%)`
    Bond { name: String, chance: f64 },
    /// Ability granted, e.g. `+Ability: Heal`; `spell` is filled by the cross-link pass
    Ability {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        spell: Option<EntryKey>,
    },
    /// Stat bonus, e.g. `Attack: +5%`, or a bare flag
    Bonus { name: String, value: StatValue },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Number,
    Flag,
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueUnit {
    Percent,
    Turn,
    Mana,
    PerM,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueType {
    pub kind: ValueKind,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub signed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<ValueUnit>,
}

impl ValueType {
    pub const FLAG: ValueType = ValueType {
        kind: ValueKind::Flag,
        signed: false,
        unit: None,
    };

    pub const TEXT: ValueType = ValueType {
        kind: ValueKind::Text,
        signed: false,
        unit: None,
    };
}
