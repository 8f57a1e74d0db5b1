//! Translation namespaces.
//!
//! Text meta values use their canonical meta label as namespace
//! (`rarity`, `family`, ...).

pub const TAGS: &str = "tags";
pub const EVENTS: &str = "events";
pub const META: &str = "meta";
pub const STATS: &str = "stats";
pub const STATS_TEXT: &str = "stats_text";
pub const STATUS: &str = "status";
pub const SUMMONS: &str = "summons";
pub const SPELL_TYPE: &str = "spell_type";
pub const LEVELS: &str = "levels";
pub const ITEM_TYPE: &str = "item_type";
pub const STATS_CONDITIONS: &str = "stats_conditions";
pub const TARGETS: &str = "targets";
pub const FOLLOWER: &str = "follower";

/// Drop group whose inline relations are summons rather than statuses
pub(crate) const SUMMONS_GROUP: &str = "summons";
pub(crate) const UPGRADE_MATERIALS_GROUP: &str = "upgrade_materials";
pub(crate) const SKILLS_GROUP: &str = "skills";

pub(crate) const TIER_META: &str = "tier";
pub(crate) const HP_META: &str = "hp";
pub(crate) const TWO_HANDED_STAT: &str = "two_handed";
/// Stat moved out of `stats` into the entry's `targets` field
pub(crate) const TARGETS_STAT: &str = "targets";
pub(crate) const FOLLOWER_META: &str = "follower";
