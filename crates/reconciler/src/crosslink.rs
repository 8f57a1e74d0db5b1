//! Cross-link pass over the base-language catalog.
//!
//! Runs after every language walk. Each step first collects its (target,
//! source) pairs from the id-sorted catalog, then applies them, so back
//! references come out in a fixed order.

use crate::namespace::{SKILLS_GROUP, TWO_HANDED_STAT, UPGRADE_MATERIALS_GROUP};
use crate::plan::BondAbility;
use codex_indexer::ItemTypeListing;
use codex_protocol::{BondEffect, Catalog, Category, EdgeRef, EntryKey, StatValue};
use std::collections::BTreeMap;

const OFFHAND_SUFFIX: &str = " (Off-hand)";
const HANDED_ITEM_TYPES: [&str; 2] = ["weapon", "armor"];

fn push_unique(list: &mut Vec<EntryKey>, key: EntryKey) {
    if !list.contains(&key) {
        list.push(key);
    }
}

/// Base-language item-type listing assigns `item_type`
pub(crate) fn assign_item_types(catalog: &mut Catalog, listings: &[ItemTypeListing]) -> usize {
    let mut assigned = 0;
    for listing in listings {
        for id in &listing.item_ids {
            let key = EntryKey::new(Category::Items, id.as_str());
            match catalog.get_mut(&key) {
                Some(entry) if entry.item_type.is_none() => {
                    entry.item_type = Some(listing.item_type.clone());
                    assigned += 1;
                }
                Some(_) => {}
                None => log::debug!("Item type {} lists unknown item {key}", listing.item_type),
            }
        }
    }
    assigned
}

/// `two_handed` is 0/1 for weapons and armor only
pub(crate) fn normalize_two_handed(catalog: &mut Catalog) {
    for entry in catalog.entries.values_mut() {
        let handed = entry
            .item_type
            .as_deref()
            .is_some_and(|t| HANDED_ITEM_TYPES.contains(&t));
        if !handed {
            continue;
        }
        let two_handed = matches!(
            entry.stats.get(TWO_HANDED_STAT),
            Some(StatValue::Flag(true)) | Some(StatValue::Integer(1))
        );
        entry.two_handed = Some(u8::from(two_handed));
    }
}

/// Items' upgrade materials gain the item in `source` and `dismantled_by`
pub(crate) fn link_materials(catalog: &mut Catalog) -> usize {
    let pairs: Vec<(EntryKey, EntryKey)> = catalog
        .entries
        .values()
        .filter(|entry| entry.category == Category::Items)
        .flat_map(|entry| {
            entry
                .edges(UPGRADE_MATERIALS_GROUP)
                .map(move |material| (material.clone(), entry.key()))
        })
        .collect();

    let mut linked = 0;
    for (material, item) in pairs {
        if let Some(target) = catalog.get_mut(&material) {
            push_unique(&mut target.source, item.clone());
            push_unique(&mut target.dismantled_by, item);
            linked += 1;
        }
    }
    linked
}

/// Spells used as skills by monster-like entries gain `used_by`
pub(crate) fn link_skill_users(catalog: &mut Catalog) -> usize {
    let pairs: Vec<(EntryKey, EntryKey)> = catalog
        .entries
        .values()
        .filter(|entry| entry.category.is_monster_like())
        .flat_map(|entry| {
            entry
                .edges(SKILLS_GROUP)
                .map(move |spell| (spell.clone(), entry.key()))
        })
        .collect();

    let mut linked = 0;
    for (spell, user) in pairs {
        if let Some(target) = catalog.get_mut(&spell) {
            push_unique(&mut target.used_by, user);
            linked += 1;
        }
    }
    linked
}

/// Pair items with the `"<X> (Off-hand)"` spell of their ability `X`.
///
/// Returns (paired, unmatched); unmatched items keep the spell name as a raw edge.
pub(crate) fn pair_offhands(
    catalog: &mut Catalog,
    offhands: &[(EntryKey, String)],
    spells_by_name: &BTreeMap<String, EntryKey>,
) -> (usize, usize) {
    let mut paired = 0;
    let mut unmatched = 0;
    for (item, ability) in offhands {
        let spell_name = format!("{ability}{OFFHAND_SUFFIX}");
        let edge = match spells_by_name.get(&spell_name) {
            Some(spell) => {
                if let Some(target) = catalog.get_mut(spell) {
                    push_unique(&mut target.off_hands, item.clone());
                }
                paired += 1;
                EdgeRef::Resolved(spell.clone())
            }
            None => {
                log::warn!("{item}: no spell named {spell_name:?}");
                unmatched += 1;
                EdgeRef::Unresolved(spell_name)
            }
        };
        if let Some(entry) = catalog.get_mut(item) {
            entry.ability = Some(edge);
        }
    }
    (paired, unmatched)
}

/// Bond `+Ability` effects point at the spell with that exact name
pub(crate) fn link_bond_abilities(
    catalog: &mut Catalog,
    bond_abilities: &[BondAbility],
    spells_by_name: &BTreeMap<String, EntryKey>,
) -> usize {
    let mut linked = 0;
    for attached in bond_abilities {
        let Some(spell) = spells_by_name.get(&attached.name) else {
            log::debug!("{}: bond ability {:?} has no spell", attached.follower, attached.name);
            continue;
        };
        let effect = catalog
            .get_mut(&attached.follower)
            .and_then(|entry| entry.bestial_bond.get_mut(attached.level))
            .and_then(|level| level.get_mut(attached.effect));
        if let Some(BondEffect::Ability { spell: slot, .. }) = effect {
            *slot = Some(spell.clone());
            linked += 1;
        }
    }
    linked
}
