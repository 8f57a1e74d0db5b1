use crate::category::{Category, EntryId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Fields outside a category's known set, kept verbatim
pub type ExtraFields = BTreeMap<String, Value>;

/// Language-specific record as delivered by the Fetch collaborator.
///
/// The header is shared by every category; `body` carries the category's fixed
/// field set and is selected by the `category` tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEntry {
    pub id: EntryId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aura: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub body: EntryBody,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum EntryBody {
    Spells(SpellBody),
    Items(ItemBody),
    Monsters(CreatureBody),
    Bosses(CreatureBody),
    Raids(RaidBody),
    Followers(FollowerBody),
    Classes(ClassBody),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemBody {
    #[serde(default)]
    pub exotic: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub meta: Vec<MetaRow>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stats: Vec<StatRow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ability: Option<OffhandAbility>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub drops: Vec<DropGroup>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// Monsters and bosses
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreatureBody {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub meta: Vec<MetaRow>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub drops: Vec<DropGroup>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub abilities: Vec<Ability>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RaidBody {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follower: Option<FollowerLink>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub meta: Vec<MetaRow>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub drops: Vec<DropGroup>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub abilities: Vec<Ability>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FollowerBody {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub meta: Vec<MetaRow>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stats: Vec<StatRow>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub drops: Vec<DropGroup>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bestial_bond: Vec<BondLevel>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassBody {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub meta: Vec<MetaRow>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub drops: Vec<DropGroup>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub abilities: Vec<Ability>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpellBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spell_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stats: Vec<StatRow>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub drops: Vec<DropGroup>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// Labelled scalar row from the entry header (`Tier: ★3`, `Rarity: Epic`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaRow {
    pub label: String,
    pub value: String,
}

/// Stat row; `value` is absent for flag stats such as "Two handed"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatRow {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<StatText>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatText {
    Text(String),
    /// Element rows carry several values
    List(Vec<String>),
}

/// Labelled relation section ("Dropped by", "Causes", "Summons", ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropGroup {
    pub label: String,
    #[serde(default)]
    pub relations: Vec<Relation>,
}

/// Element of a relation section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Relation {
    /// Link to another entry
    Pointer(PointerRelation),
    /// Named value without an entry of its own (status effects, summons)
    Inline(InlineRelation),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerRelation {
    pub href: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineRelation {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Raw chance text, e.g. `12%`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chance: Option<String>,
}

impl Relation {
    pub fn pointer(&self) -> Option<&str> {
        match self {
            Self::Pointer(p) => Some(&p.href),
            Self::Inline(_) => None,
        }
    }

    pub fn display_name(&self) -> Option<&str> {
        match self {
            Self::Pointer(p) => p.name.as_deref(),
            Self::Inline(i) => Some(&i.name),
        }
    }
}

/// Passive ability listed on creatures and classes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ability {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `Mana rush: Level 2`, `Causes: Rot (10%), Blight (5%)`, ...
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stats: Vec<StatRow>,
}

/// Follower a raid rewards, shown under a labelled header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowerLink {
    pub label: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// Ability granted by an off-hand item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffhandAbility {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One bestial bond level: its name and the raw comma separated effect text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BondLevel {
    pub name: String,
    pub effects: String,
}

impl RawEntry {
    pub fn category(&self) -> Category {
        match self.body {
            EntryBody::Spells(_) => Category::Spells,
            EntryBody::Items(_) => Category::Items,
            EntryBody::Monsters(_) => Category::Monsters,
            EntryBody::Bosses(_) => Category::Bosses,
            EntryBody::Raids(_) => Category::Raids,
            EntryBody::Followers(_) => Category::Followers,
            EntryBody::Classes(_) => Category::Classes,
        }
    }

    pub fn meta(&self) -> &[MetaRow] {
        match &self.body {
            EntryBody::Items(b) => &b.meta,
            EntryBody::Monsters(b) | EntryBody::Bosses(b) => &b.meta,
            EntryBody::Raids(b) => &b.meta,
            EntryBody::Followers(b) => &b.meta,
            EntryBody::Classes(b) => &b.meta,
            EntryBody::Spells(_) => &[],
        }
    }

    pub fn tags(&self) -> &[String] {
        match &self.body {
            EntryBody::Items(b) => &b.tags,
            EntryBody::Raids(b) => &b.tags,
            EntryBody::Spells(b) => &b.tags,
            _ => &[],
        }
    }

    pub fn events(&self) -> &[String] {
        match &self.body {
            EntryBody::Monsters(b) | EntryBody::Bosses(b) => &b.events,
            EntryBody::Raids(b) => &b.events,
            EntryBody::Followers(b) => &b.events,
            _ => &[],
        }
    }

    pub fn stats(&self) -> &[StatRow] {
        match &self.body {
            EntryBody::Items(b) => &b.stats,
            EntryBody::Followers(b) => &b.stats,
            EntryBody::Spells(b) => &b.stats,
            _ => &[],
        }
    }

    pub fn drops(&self) -> &[DropGroup] {
        match &self.body {
            EntryBody::Spells(b) => &b.drops,
            EntryBody::Items(b) => &b.drops,
            EntryBody::Monsters(b) | EntryBody::Bosses(b) => &b.drops,
            EntryBody::Raids(b) => &b.drops,
            EntryBody::Followers(b) => &b.drops,
            EntryBody::Classes(b) => &b.drops,
        }
    }

    pub fn abilities(&self) -> &[Ability] {
        match &self.body {
            EntryBody::Monsters(b) | EntryBody::Bosses(b) => &b.abilities,
            EntryBody::Raids(b) => &b.abilities,
            EntryBody::Classes(b) => &b.abilities,
            _ => &[],
        }
    }

    pub fn bestial_bond(&self) -> &[BondLevel] {
        match &self.body {
            EntryBody::Followers(b) => &b.bestial_bond,
            _ => &[],
        }
    }

    pub fn offhand_ability(&self) -> Option<&OffhandAbility> {
        match &self.body {
            EntryBody::Items(b) => b.ability.as_ref(),
            _ => None,
        }
    }

    /// `Some` only for items
    pub fn exotic(&self) -> Option<bool> {
        match &self.body {
            EntryBody::Items(b) => Some(b.exotic),
            _ => None,
        }
    }

    pub fn spell_tier(&self) -> Option<&str> {
        match &self.body {
            EntryBody::Spells(b) => b.tier.as_deref(),
            _ => None,
        }
    }

    pub fn spell_type(&self) -> Option<&str> {
        match &self.body {
            EntryBody::Spells(b) => b.spell_type.as_deref(),
            _ => None,
        }
    }

    pub fn follower(&self) -> Option<&FollowerLink> {
        match &self.body {
            EntryBody::Raids(b) => b.follower.as_ref(),
            _ => None,
        }
    }

    /// Unknown fields of the record, empty for a well-formed one
    pub fn extra(&self) -> &ExtraFields {
        match &self.body {
            EntryBody::Spells(b) => &b.extra,
            EntryBody::Items(b) => &b.extra,
            EntryBody::Monsters(b) | EntryBody::Bosses(b) => &b.extra,
            EntryBody::Raids(b) => &b.extra,
            EntryBody::Followers(b) => &b.extra,
            EntryBody::Classes(b) => &b.extra,
        }
    }
}
