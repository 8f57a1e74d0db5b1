//! Base-language planning walk.
//!
//! Runs once, single-threaded, over the base language in category then id
//! order. It is the only place keys are assigned: every canonical key, and the
//! position in the localized entry its translation comes from, is recorded in
//! an [`EntryPlan`] that the per-language walks consume read-only.

use crate::namespace::{
    EVENTS, FOLLOWER, FOLLOWER_META, HP_META, LEVELS, META, SKILLS_GROUP, SPELL_TYPE, STATS,
    STATS_CONDITIONS, STATS_TEXT, STATUS, SUMMONS, SUMMONS_GROUP, TAGS, TARGETS, TARGETS_STAT,
    TIER_META,
};
use crate::values::{
    looks_numeric, parse_bond, parse_hp, parse_number, parse_percent, parse_spell_level,
    parse_status_list, parse_tier, should_replace, split_conditions, value_type, BondPart,
};
use codex_indexer::EntryIndex;
use codex_protocol::{
    extract_reference, Ability, AbilityStat, BondEffect, Catalog, CatalogEntry, Category, EdgeRef,
    EntryKey, RawEntry, Relation, StatRow, StatText, StatValue, StatusRef, ValueType,
};
use codex_slug::{canonicalize, content_hash, KeyGenerator};
use std::collections::{BTreeMap, BTreeSet};

/// Stats whose text value is a translatable label, never a number
const TEXT_STATS: [&str; 2] = ["stat_bonus", "bestial_bond_level"];
/// Ability stats kept as translatable labels
const TEXT_ABILITY_STATS: [&str; 2] = ["bestial_bond_level", "mana_rush"];
/// Ability stats listing statuses with chances (`Rot (1%), Blight (2%)`)
const STATUS_ABILITY_STATS: [&str; 2] = ["gives", "causes"];

/// Where a translated string sits inside a localized entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Locator {
    Tag(usize),
    Event(usize),
    MetaLabel(usize),
    MetaValue(usize),
    StatLabel(usize),
    StatTextValue(usize),
    StatElement(usize, usize),
    StatCondition(usize, usize),
    DropLabel(usize),
    Inline(usize, usize),
    SpellType,
    FollowerLabel,
    FollowerName,
    BondLevel(usize),
    BondEffect(usize, usize),
    /// (ability, stat)
    AbilityStatLabel(usize, usize),
    AbilityStatValue(usize, usize),
    /// (ability, stat, list element)
    AbilityStatElement(usize, usize, usize),
    /// (ability, stat, status)
    AbilityStatus(usize, usize, usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WriteMode {
    /// First writer for (namespace, key) wins
    First,
    /// Overwrites anything not locked, then locks (single-valued events)
    Lock,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Slot {
    pub namespace: String,
    pub key: String,
    pub locator: Locator,
    pub mode: WriteMode,
}

impl Slot {
    fn new(namespace: &str, key: &str, locator: Locator) -> Self {
        Self {
            namespace: namespace.to_string(),
            key: key.to_string(),
            locator,
            mode: WriteMode::First,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct EntryPlan {
    pub key: EntryKey,
    pub slots: Vec<Slot>,
    /// Ability keys by position
    pub abilities: Vec<String>,
}

/// `+Ability: <name>` bond effect waiting for its spell
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BondAbility {
    pub follower: EntryKey,
    pub level: usize,
    pub effect: usize,
    pub name: String,
}

#[derive(Debug, Default)]
pub(crate) struct Plan {
    pub catalog: Catalog,
    pub entries: Vec<EntryPlan>,
    /// (item, base-language off-hand ability name)
    pub offhands: Vec<(EntryKey, String)>,
    pub bond_abilities: Vec<BondAbility>,
    /// Base-language spell name to its first (id-sorted) spell
    pub spells_by_name: BTreeMap<String, EntryKey>,
    pub malformed_references: usize,
    pub unresolved_references: usize,
}

pub(crate) fn build(index: &EntryIndex, base_language: &str) -> Plan {
    let mut planner = Planner {
        indexed: index.keys(base_language),
        icon_keys: KeyGenerator::new("icons"),
        ability_keys: KeyGenerator::new("abilities"),
        plan: Plan::default(),
    };
    for entry in index.all_entries(base_language) {
        planner.plan_entry(entry);
    }
    log::debug!(
        "Assigned {} icon keys and {} ability keys",
        planner.icon_keys.len(),
        planner.ability_keys.len()
    );
    planner.plan
}

struct Planner {
    indexed: BTreeSet<EntryKey>,
    icon_keys: KeyGenerator,
    ability_keys: KeyGenerator,
    plan: Plan,
}

impl Planner {
    fn plan_entry(&mut self, entry: &RawEntry) {
        let key = EntryKey::new(entry.category(), entry.id.clone());
        let mut target = CatalogEntry::new(&key);
        let mut slots = Vec::new();

        target.icon = entry.icon.clone();
        target.aura = entry.aura.clone();
        target.exotic = entry.exotic().map(u8::from);

        if key.category == Category::Spells {
            self.plan
                .spells_by_name
                .entry(entry.name.clone())
                .or_insert_with(|| key.clone());
        }
        if let Some(tier) = entry.spell_tier() {
            target.tier = parse_tier(tier);
        }
        if let Some(spell_type) = entry.spell_type() {
            let spell_type = canonicalize(spell_type);
            slots.push(Slot::new(SPELL_TYPE, &spell_type, Locator::SpellType));
            target.spell_type = Some(spell_type);
        }
        if let Some(ability) = entry.offhand_ability() {
            self.plan.offhands.push((key.clone(), ability.name.clone()));
        }
        if let Some(follower) = entry.follower() {
            let icon = follower.icon.as_deref().unwrap_or_default();
            let follower_key = self.icon_keys.generate(&follower.name, icon);
            if let Some(icon) = &follower.icon {
                self.record_icon(&follower_key, icon);
            }
            slots.push(Slot::new(META, FOLLOWER_META, Locator::FollowerLabel));
            slots.push(Slot::new(FOLLOWER, &follower_key, Locator::FollowerName));
            target.follower = Some(follower_key);
        }

        plan_meta(entry, &mut target, &mut slots);
        plan_tags(entry, &mut target, &mut slots);
        plan_events(entry, &mut target, &mut slots);
        for (i, row) in entry.stats().iter().enumerate() {
            self.plan_stat(i, row, &mut target, &mut slots);
        }
        self.plan_drops(&key, entry, &mut target, &mut slots);
        self.plan_abilities(entry, &mut target, &mut slots);
        self.plan_bestial_bond(&key, entry, &mut target, &mut slots);

        let abilities = target.abilities.clone();
        self.plan.catalog.entries.insert(key.clone(), target);
        self.plan.entries.push(EntryPlan {
            key,
            slots,
            abilities,
        });
    }

    fn plan_stat(
        &mut self,
        i: usize,
        row: &StatRow,
        target: &mut CatalogEntry,
        slots: &mut Vec<Slot>,
    ) {
        let mut label = canonicalize(&row.label);
        if label == "bestial_bond"
            && matches!(&row.value, Some(StatText::Text(t)) if t.trim().ends_with(|c: char| c.is_ascii_digit()))
        {
            label = "bestial_bond_level".to_string();
        }

        if label == TARGETS_STAT {
            if let Some(StatText::Text(text)) = &row.value {
                let value = canonicalize(text);
                slots.push(Slot::new(META, TARGETS_STAT, Locator::StatLabel(i)));
                slots.push(Slot::new(TARGETS, &value, Locator::StatTextValue(i)));
                target.targets.get_or_insert(value);
                return;
            }
        }
        slots.push(Slot::new(STATS, &label, Locator::StatLabel(i)));

        let (value, vt) = match &row.value {
            None => (StatValue::Flag(true), ValueType::FLAG),
            Some(StatText::List(items)) => {
                let keys: Vec<String> = items.iter().map(|item| canonicalize(item)).collect();
                for (j, item_key) in keys.iter().enumerate() {
                    slots.push(Slot::new(STATS_TEXT, item_key, Locator::StatElement(i, j)));
                }
                (StatValue::List(keys), ValueType::TEXT)
            }
            Some(StatText::Text(text)) => {
                let (text, conditions) = split_conditions(text);
                if !conditions.is_empty() {
                    let keys: Vec<String> = conditions.iter().map(|c| canonicalize(c)).collect();
                    for (j, condition) in keys.iter().enumerate() {
                        slots.push(Slot::new(
                            STATS_CONDITIONS,
                            condition,
                            Locator::StatCondition(i, j),
                        ));
                    }
                    target
                        .stats_conditions
                        .entry(label.clone())
                        .or_insert(keys);
                }

                let number = (!TEXT_STATS.contains(&label.as_str()) && looks_numeric(text))
                    .then(|| parse_number(text))
                    .flatten();
                match number {
                    Some(number) => (number, value_type(text)),
                    None => {
                        let text_key = canonicalize(text);
                        slots.push(Slot::new(
                            STATS_TEXT,
                            &text_key,
                            Locator::StatTextValue(i),
                        ));
                        (StatValue::Text(text_key), ValueType::TEXT)
                    }
                }
            }
        };

        self.record_value_type(format!("stats.{label}"), vt);
        target.stats.entry(label).or_insert(value);
    }

    fn plan_drops(
        &mut self,
        key: &EntryKey,
        entry: &RawEntry,
        target: &mut CatalogEntry,
        slots: &mut Vec<Slot>,
    ) {
        for (g, group) in entry.drops().iter().enumerate() {
            let label = canonicalize(&group.label);
            slots.push(Slot::new(META, &label, Locator::DropLabel(g)));
            let inline_namespace = if label == SUMMONS_GROUP {
                SUMMONS
            } else {
                STATUS
            };

            let learns_skills = key.category == Category::Classes && label == SKILLS_GROUP;

            let mut edges = Vec::new();
            let mut statuses = Vec::new();
            for (r, relation) in group.relations.iter().enumerate() {
                match relation {
                    Relation::Pointer(pointer) => match extract_reference(&pointer.href) {
                        Ok(target_key) if self.indexed.contains(&target_key) => {
                            if learns_skills {
                                if let Some(level) =
                                    pointer.name.as_deref().and_then(parse_spell_level)
                                {
                                    target.skills_level.insert(target_key.clone(), level);
                                }
                            }
                            edges.push(EdgeRef::Resolved(target_key));
                        }
                        Ok(target_key) => {
                            log::warn!("{key}: {target_key} is not indexed, keeping raw pointer");
                            self.plan.unresolved_references += 1;
                            edges.push(EdgeRef::Unresolved(pointer.href.clone()));
                        }
                        Err(err) => {
                            log::warn!("{key}: dropping relation: {err}");
                            self.plan.malformed_references += 1;
                        }
                    },
                    Relation::Inline(inline) => {
                        let icon = inline.icon.as_deref().unwrap_or_default();
                        let status_key = self.icon_keys.generate(&inline.name, icon);
                        if let Some(icon) = &inline.icon {
                            self.record_icon(&status_key, icon);
                        }
                        slots.push(Slot::new(
                            inline_namespace,
                            &status_key,
                            Locator::Inline(g, r),
                        ));
                        statuses.push(StatusRef {
                            name: status_key,
                            chance: inline.chance.as_deref().and_then(parse_percent),
                        });
                    }
                }
            }

            if !edges.is_empty() {
                target
                    .relations
                    .entry(label.clone())
                    .or_default()
                    .extend(edges);
            }
            if !statuses.is_empty() {
                target.statuses.entry(label).or_default().extend(statuses);
            }
        }
    }

    fn plan_abilities(
        &mut self,
        entry: &RawEntry,
        target: &mut CatalogEntry,
        slots: &mut Vec<Slot>,
    ) {
        for (a, ability) in entry.abilities().iter().enumerate() {
            let payload = content_hash(ability.description.as_deref().unwrap_or_default());
            let ability_key = self.ability_keys.generate(&ability.name, &payload);
            if let Some(icon) = &ability.icon {
                self.record_icon(&ability_key, icon);
            }
            if !ability.stats.is_empty()
                && !self.plan.catalog.meta.ability_stats.contains_key(&ability_key)
            {
                let stats = self.plan_ability_stats(a, ability, slots);
                self.plan
                    .catalog
                    .meta
                    .ability_stats
                    .insert(ability_key.clone(), stats);
            }
            target.abilities.push(ability_key);
        }
    }

    /// Stats of the first entry listing an ability; later listings are ignored
    fn plan_ability_stats(
        &mut self,
        a: usize,
        ability: &Ability,
        slots: &mut Vec<Slot>,
    ) -> BTreeMap<String, AbilityStat> {
        let mut stats = BTreeMap::new();
        for (i, row) in ability.stats.iter().enumerate() {
            let mut label = canonicalize(&row.label);
            if label == "bestial_bond"
                && matches!(&row.value, Some(StatText::Text(t)) if t.trim().ends_with(|c: char| c.is_ascii_digit()))
            {
                label = "bestial_bond_level".to_string();
            }
            slots.push(Slot::new(STATS, &label, Locator::AbilityStatLabel(a, i)));

            let (stat, vt) = match &row.value {
                None => (AbilityStat::Value(StatValue::Flag(true)), Some(ValueType::FLAG)),
                Some(StatText::List(items)) => {
                    let keys: Vec<String> = items.iter().map(|item| canonicalize(item)).collect();
                    for (j, item_key) in keys.iter().enumerate() {
                        slots.push(Slot::new(
                            STATS_TEXT,
                            item_key,
                            Locator::AbilityStatElement(a, i, j),
                        ));
                    }
                    (AbilityStat::Value(StatValue::List(keys)), Some(ValueType::TEXT))
                }
                Some(StatText::Text(text)) if TEXT_ABILITY_STATS.contains(&label.as_str()) => {
                    let value = canonicalize(text);
                    slots.push(Slot::new(STATS_TEXT, &value, Locator::AbilityStatValue(a, i)));
                    (AbilityStat::Value(StatValue::Text(value)), Some(ValueType::TEXT))
                }
                Some(StatText::Text(text)) if looks_numeric(text) => match parse_number(text) {
                    Some(number) => (AbilityStat::Value(number), Some(value_type(text))),
                    None => continue,
                },
                Some(StatText::Text(text)) if STATUS_ABILITY_STATS.contains(&label.as_str()) => {
                    let mut statuses = Vec::new();
                    for (j, (name, chance)) in parse_status_list(text).into_iter().enumerate() {
                        let name = canonicalize(name);
                        slots.push(Slot::new(STATUS, &name, Locator::AbilityStatus(a, i, j)));
                        statuses.push(StatusRef { name, chance });
                    }
                    (AbilityStat::Statuses(statuses), None)
                }
                Some(StatText::Text(text)) => {
                    log::debug!("{}: untyped ability stat {label}: {text:?}", ability.name);
                    let value = canonicalize(text);
                    slots.push(Slot::new(STATS_TEXT, &value, Locator::AbilityStatValue(a, i)));
                    (AbilityStat::Value(StatValue::Text(value)), Some(ValueType::TEXT))
                }
            };

            if let Some(vt) = vt {
                self.record_value_type(format!("abilities.{label}"), vt);
            }
            stats.entry(label).or_insert(stat);
        }
        stats
    }

    fn plan_bestial_bond(
        &mut self,
        key: &EntryKey,
        entry: &RawEntry,
        target: &mut CatalogEntry,
        slots: &mut Vec<Slot>,
    ) {
        for (l, level) in entry.bestial_bond().iter().enumerate() {
            slots.push(Slot::new(LEVELS, &(l + 1).to_string(), Locator::BondLevel(l)));

            let mut effects = Vec::new();
            for (e, part) in parse_bond(&level.effects).into_iter().enumerate() {
                let effect = match part {
                    BondPart::Bond { name, chance } => {
                        let name = canonicalize(name);
                        slots.push(Slot::new(STATUS, &name, Locator::BondEffect(l, e)));
                        BondEffect::Bond { name, chance }
                    }
                    BondPart::Ability { name } => {
                        self.plan.bond_abilities.push(BondAbility {
                            follower: key.clone(),
                            level: l,
                            effect: e,
                            name: name.to_string(),
                        });
                        BondEffect::Ability {
                            name: canonicalize(name),
                            spell: None,
                        }
                    }
                    BondPart::Bonus { name, value } => {
                        let name = canonicalize(name);
                        slots.push(Slot::new(STATS, &name, Locator::BondEffect(l, e)));
                        let (value, vt) = bonus_value(value);
                        self.record_value_type(format!("bonds.{name}"), vt);
                        BondEffect::Bonus { name, value }
                    }
                };
                effects.push(effect);
            }
            target.bestial_bond.push(effects);
        }
    }

    fn record_icon(&mut self, key: &str, icon: &str) {
        self.plan
            .catalog
            .meta
            .icons
            .entry(key.to_string())
            .or_insert_with(|| icon.to_string());
    }

    fn record_value_type(&mut self, key: String, vt: ValueType) {
        let value_types = &mut self.plan.catalog.meta.value_types;
        if should_replace(value_types.get(&key), &vt) {
            value_types.insert(key, vt);
        }
    }
}

fn bonus_value(value: Option<&str>) -> (StatValue, ValueType) {
    let Some(text) = value else {
        return (StatValue::Flag(true), ValueType::FLAG);
    };
    match looks_numeric(text).then(|| parse_number(text)).flatten() {
        Some(number) => (number, value_type(text)),
        None => (StatValue::Text(canonicalize(text)), ValueType::TEXT),
    }
}

fn plan_meta(entry: &RawEntry, target: &mut CatalogEntry, slots: &mut Vec<Slot>) {
    for (i, row) in entry.meta().iter().enumerate() {
        let label = canonicalize(&row.label);
        slots.push(Slot::new(META, &label, Locator::MetaLabel(i)));

        match label.as_str() {
            TIER_META => {
                if let Some(tier) = parse_tier(&row.value) {
                    target.tier = Some(tier);
                    continue;
                }
            }
            HP_META => {
                if let Some(hp) = parse_hp(&row.value) {
                    target.hp = Some(hp);
                    continue;
                }
            }
            _ => {}
        }

        let value = canonicalize(&row.value);
        slots.push(Slot::new(&label, &value, Locator::MetaValue(i)));
        target.attributes.entry(label).or_insert(value);
    }
}

fn plan_tags(entry: &RawEntry, target: &mut CatalogEntry, slots: &mut Vec<Slot>) {
    for (i, tag) in entry.tags().iter().enumerate() {
        let tag = canonicalize(tag);
        slots.push(Slot::new(TAGS, &tag, Locator::Tag(i)));
        target.tags.push(tag);
    }
}

/// A single event names itself unambiguously and locks its translation
fn plan_events(entry: &RawEntry, target: &mut CatalogEntry, slots: &mut Vec<Slot>) {
    let events = entry.events();
    let mode = if events.len() == 1 {
        WriteMode::Lock
    } else {
        WriteMode::First
    };
    for (i, event) in events.iter().enumerate() {
        let event = canonicalize(event);
        slots.push(Slot {
            mode,
            ..Slot::new(EVENTS, &event, Locator::Event(i))
        });
        target.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codex_protocol::{
        BondLevel, ClassBody, CreatureBody, DropGroup, EntryBody, FollowerBody, FollowerLink,
        InlineRelation, ItemBody, MetaRow, PointerRelation, RaidBody, SpellBody,
    };
    use pretty_assertions::assert_eq;

    fn raw(id: &str, name: &str, body: EntryBody) -> RawEntry {
        RawEntry {
            id: id.to_string(),
            name: name.to_string(),
            icon: None,
            aura: None,
            description: None,
            body,
        }
    }

    fn status(name: &str, icon: &str) -> Relation {
        Relation::Inline(InlineRelation {
            name: name.to_string(),
            icon: Some(icon.to_string()),
            description: None,
            chance: Some("10%".to_string()),
        })
    }

    #[test]
    fn item_scalars_and_stats_are_canonical() {
        let mut index = EntryIndex::new();
        index.insert_if_absent(
            "en",
            raw(
                "sword",
                "Sword",
                EntryBody::Items(ItemBody {
                    exotic: true,
                    meta: vec![
                        MetaRow {
                            label: "Tier".into(),
                            value: "★5".into(),
                        },
                        MetaRow {
                            label: "Rarity".into(),
                            value: "Ornate".into(),
                        },
                    ],
                    stats: vec![
                        StatRow {
                            label: "Attack".into(),
                            value: Some(StatText::Text("+15%".into())),
                        },
                        StatRow {
                            label: "Two handed".into(),
                            value: None,
                        },
                        StatRow {
                            label: "Element".into(),
                            value: Some(StatText::List(vec!["Fire".into(), "Dark".into()])),
                        },
                    ],
                    ..Default::default()
                }),
            ),
        );

        let plan = build(&index, "en");
        let sword = &plan.catalog.entries[&EntryKey::new(Category::Items, "sword")];
        assert_eq!(sword.tier, Some(5));
        assert_eq!(sword.exotic, Some(1));
        assert_eq!(sword.attributes["rarity"], "ornate");
        assert_eq!(sword.stats["attack"], StatValue::Integer(15));
        assert_eq!(sword.stats["two_handed"], StatValue::Flag(true));
        assert_eq!(
            sword.stats["element"],
            StatValue::List(vec!["fire".into(), "dark".into()])
        );
        assert!(plan.catalog.meta.value_types["stats.attack"].signed);
        assert_eq!(
            plan.catalog.meta.value_types["stats.two_handed"],
            ValueType::FLAG
        );
    }

    #[test]
    fn colliding_status_names_get_distinct_keys() {
        let mut index = EntryIndex::new();
        for (id, icon) in [("a", "rot_a.png"), ("b", "rot_b.png"), ("c", "rot_a.png")] {
            index.insert_if_absent(
                "en",
                raw(
                    id,
                    id,
                    EntryBody::Monsters(CreatureBody {
                        drops: vec![DropGroup {
                            label: "Causes".into(),
                            relations: vec![status("Rot", icon)],
                        }],
                        ..Default::default()
                    }),
                ),
            );
        }

        let plan = build(&index, "en");
        let key_of = |id: &str| {
            plan.catalog.entries[&EntryKey::new(Category::Monsters, id)].statuses["causes"][0]
                .name
                .clone()
        };
        assert_eq!(key_of("a"), "rot");
        assert_eq!(key_of("c"), "rot");
        assert_ne!(key_of("b"), "rot");
        assert!(key_of("b").starts_with("rot_"));
        assert_eq!(plan.catalog.meta.icons["rot"], "rot_a.png");
    }

    #[test]
    fn pointers_resolve_or_stay_raw() {
        let mut index = EntryIndex::new();
        index.insert_if_absent(
            "en",
            raw(
                "rat",
                "Rat",
                EntryBody::Monsters(CreatureBody {
                    drops: vec![DropGroup {
                        label: "Drops".into(),
                        relations: vec![
                            Relation::Pointer(PointerRelation {
                                href: "/codex/monsters/rat/".into(),
                                name: None,
                            }),
                            Relation::Pointer(PointerRelation {
                                href: "/codex/items/ghost/".into(),
                                name: None,
                            }),
                            Relation::Pointer(PointerRelation {
                                href: "nowhere".into(),
                                name: None,
                            }),
                        ],
                    }],
                    ..Default::default()
                }),
            ),
        );

        let plan = build(&index, "en");
        let rat = &plan.catalog.entries[&EntryKey::new(Category::Monsters, "rat")];
        assert_eq!(
            rat.relations["drops"],
            vec![
                EdgeRef::Resolved(EntryKey::new(Category::Monsters, "rat")),
                EdgeRef::Unresolved("/codex/items/ghost/".into()),
            ]
        );
        assert_eq!(plan.unresolved_references, 1);
        assert_eq!(plan.malformed_references, 1);
    }

    #[test]
    fn abilities_key_on_name_and_description() {
        let ability = |description: &str| Ability {
            name: "Fury".into(),
            description: Some(description.into()),
            ..Default::default()
        };
        let mut index = EntryIndex::new();
        index.insert_if_absent(
            "en",
            raw(
                "a",
                "A",
                EntryBody::Bosses(CreatureBody {
                    abilities: vec![ability("Hits hard"), ability("Hits harder")],
                    ..Default::default()
                }),
            ),
        );

        let plan = build(&index, "en");
        let boss = &plan.catalog.entries[&EntryKey::new(Category::Bosses, "a")];
        assert_eq!(boss.abilities[0], "fury");
        assert_ne!(boss.abilities[1], "fury");
        assert_eq!(plan.entries[0].abilities, boss.abilities);
    }

    #[test]
    fn bestial_bond_effects_are_typed_and_queued() {
        let mut index = EntryIndex::new();
        index.insert_if_absent(
            "en",
            raw(
                "wolf",
                "Wolf",
                EntryBody::Followers(FollowerBody {
                    bestial_bond: vec![BondLevel {
                        name: "Bond I".into(),
                        effects: "Rot (10%), +Ability: Heal, Attack: +5%, Lucky".into(),
                    }],
                    ..Default::default()
                }),
            ),
        );

        let plan = build(&index, "en");
        let wolf = &plan.catalog.entries[&EntryKey::new(Category::Followers, "wolf")];
        assert_eq!(
            wolf.bestial_bond[0],
            vec![
                BondEffect::Bond {
                    name: "rot".into(),
                    chance: 10.0
                },
                BondEffect::Ability {
                    name: "heal".into(),
                    spell: None
                },
                BondEffect::Bonus {
                    name: "attack".into(),
                    value: StatValue::Integer(5)
                },
                BondEffect::Bonus {
                    name: "lucky".into(),
                    value: StatValue::Flag(true)
                },
            ]
        );
        assert_eq!(plan.bond_abilities[0].name, "Heal");
        assert_eq!(plan.catalog.meta.value_types["bonds.lucky"], ValueType::FLAG);
    }

    fn stat(label: &str, value: &str) -> StatRow {
        StatRow {
            label: label.into(),
            value: Some(StatText::Text(value.into())),
        }
    }

    #[test]
    fn conditions_split_off_and_targets_move_out_of_stats() {
        let mut index = EntryIndex::new();
        index.insert_if_absent(
            "en",
            raw(
                "smite",
                "Smite",
                EntryBody::Spells(SpellBody {
                    stats: vec![
                        stat("Power", "+10% (vs undead, at night)"),
                        stat("Targets", "All enemies"),
                    ],
                    ..Default::default()
                }),
            ),
        );

        let plan = build(&index, "en");
        let smite = &plan.catalog.entries[&EntryKey::new(Category::Spells, "smite")];
        assert_eq!(smite.stats["power"], StatValue::Integer(10));
        assert_eq!(
            smite.stats_conditions["power"],
            vec!["vs_undead".to_string(), "at_night".to_string()]
        );
        assert_eq!(smite.targets.as_deref(), Some("all_enemies"));
        assert!(!smite.stats.contains_key("targets"));
        assert!(!plan.catalog.meta.value_types.contains_key("stats.targets"));

        let slots = &plan.entries[0].slots;
        assert!(slots.contains(&Slot::new(
            STATS_CONDITIONS,
            "at_night",
            Locator::StatCondition(0, 1)
        )));
        assert!(slots.contains(&Slot::new(META, TARGETS_STAT, Locator::StatLabel(1))));
        assert!(slots.contains(&Slot::new(
            TARGETS,
            "all_enemies",
            Locator::StatTextValue(1)
        )));
    }

    #[test]
    fn class_skills_carry_their_level() {
        let skill = |id: &str, name: &str| {
            Relation::Pointer(PointerRelation {
                href: format!("/codex/spells/{id}/"),
                name: Some(name.into()),
            })
        };
        let mut index = EntryIndex::new();
        index.insert_if_absent("en", raw("fire", "Fire", EntryBody::Spells(SpellBody::default())));
        index.insert_if_absent("en", raw("ice", "Ice", EntryBody::Spells(SpellBody::default())));
        index.insert_if_absent(
            "en",
            raw(
                "mage",
                "Mage",
                EntryBody::Classes(ClassBody {
                    drops: vec![DropGroup {
                        label: "Skills".into(),
                        relations: vec![skill("fire", "Fire (Level 5)"), skill("ice", "Ice")],
                    }],
                    ..Default::default()
                }),
            ),
        );

        let plan = build(&index, "en");
        let mage = &plan.catalog.entries[&EntryKey::new(Category::Classes, "mage")];
        assert_eq!(
            mage.skills_level,
            BTreeMap::from([(EntryKey::new(Category::Spells, "fire"), 5)])
        );
        assert_eq!(mage.relations["skills"].len(), 2);
    }

    #[test]
    fn raid_follower_shares_icon_keys() {
        let mut index = EntryIndex::new();
        index.insert_if_absent(
            "en",
            raw(
                "dragon",
                "Dragon",
                EntryBody::Raids(RaidBody {
                    follower: Some(FollowerLink {
                        label: "Follower".into(),
                        name: "Whelp".into(),
                        icon: Some("followers/whelp.png".into()),
                    }),
                    ..Default::default()
                }),
            ),
        );

        let plan = build(&index, "en");
        let dragon = &plan.catalog.entries[&EntryKey::new(Category::Raids, "dragon")];
        assert_eq!(dragon.follower.as_deref(), Some("whelp"));
        assert_eq!(plan.catalog.meta.icons["whelp"], "followers/whelp.png");
        assert_eq!(
            plan.entries[0].slots,
            vec![
                Slot::new(META, FOLLOWER_META, Locator::FollowerLabel),
                Slot::new(FOLLOWER, "whelp", Locator::FollowerName),
            ]
        );
    }

    #[test]
    fn ability_stats_come_from_the_first_listing() {
        let ability = |power: &str| Ability {
            name: "Bite".into(),
            description: Some("Bites".into()),
            stats: vec![
                stat("Power", power),
                stat("Causes", "Rot (10%), Bleed"),
                stat("Mana rush", "Large"),
                StatRow {
                    label: "Piercing".into(),
                    value: None,
                },
            ],
            ..Default::default()
        };
        let boss = |id: &str, power: &str| {
            raw(
                id,
                id,
                EntryBody::Bosses(CreatureBody {
                    abilities: vec![ability(power)],
                    ..Default::default()
                }),
            )
        };
        let mut index = EntryIndex::new();
        index.insert_if_absent("en", boss("a", "+5"));
        index.insert_if_absent("en", boss("b", "+7"));

        let plan = build(&index, "en");
        let stats = &plan.catalog.meta.ability_stats["bite"];
        assert_eq!(stats["power"], AbilityStat::Value(StatValue::Integer(5)));
        assert_eq!(
            stats["causes"],
            AbilityStat::Statuses(vec![
                StatusRef {
                    name: "rot".into(),
                    chance: Some(10.0)
                },
                StatusRef {
                    name: "bleed".into(),
                    chance: None
                },
            ])
        );
        assert_eq!(stats["mana_rush"], AbilityStat::Value(StatValue::Text("large".into())));
        assert_eq!(stats["piercing"], AbilityStat::Value(StatValue::Flag(true)));
        assert!(plan.catalog.meta.value_types["abilities.power"].signed);
        assert_eq!(
            plan.catalog.meta.value_types["abilities.mana_rush"],
            ValueType::TEXT
        );

        // slots are planned once, on the first listing
        assert!(plan.entries[0]
            .slots
            .contains(&Slot::new(STATUS, "bleed", Locator::AbilityStatus(0, 1, 1))));
        assert!(plan.entries[1].slots.is_empty());
    }
}
