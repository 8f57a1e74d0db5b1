use crate::namespace::ITEM_TYPE;
use crate::plan::{EntryPlan, Locator, WriteMode};
use crate::values::{parse_bond, parse_status_list, split_conditions};
use codex_indexer::{EntryIndex, ItemTypeListing};
use codex_protocol::{EntryKey, LocalizedText, RawEntry, StatRow, StatText, TranslationCatalog};
use std::collections::HashSet;

/// Translation tables of one language under construction.
///
/// Writes follow [`WriteMode`]; a locked (namespace, key) is never written again.
#[derive(Debug)]
pub(crate) struct TranslationAccumulator {
    catalog: TranslationCatalog,
    locked: HashSet<(String, String)>,
}

impl TranslationAccumulator {
    pub fn new(language: &str) -> Self {
        Self {
            catalog: TranslationCatalog::new(language),
            locked: HashSet::new(),
        }
    }

    pub fn set(&mut self, namespace: &str, key: &str, value: &str, mode: WriteMode) -> bool {
        if key.is_empty() || value.trim().is_empty() {
            return false;
        }
        let lock = (namespace.to_string(), key.to_string());
        if self.locked.contains(&lock) {
            return false;
        }

        let table = self.catalog.msg.entry(namespace.to_string()).or_default();
        match mode {
            WriteMode::First => {
                if table.contains_key(key) {
                    return false;
                }
                table.insert(key.to_string(), value.to_string());
            }
            WriteMode::Lock => {
                table.insert(key.to_string(), value.to_string());
                self.locked.insert(lock);
            }
        }
        true
    }

    pub fn set_ability(&mut self, key: &str, text: LocalizedText) {
        self.catalog
            .abilities
            .entry(key.to_string())
            .or_insert(text);
    }

    pub fn set_entry(&mut self, key: EntryKey, text: LocalizedText) {
        self.catalog.entries.entry(key).or_insert(text);
    }

    pub fn finish(self) -> TranslationCatalog {
        self.catalog
    }
}

pub(crate) struct LanguageWalk {
    pub catalog: TranslationCatalog,
    pub alignment_mismatches: usize,
    pub untranslated_entries: usize,
}

/// Zip one language's entries with the base plans by position
pub(crate) fn walk_language(
    language: &str,
    base_language: &str,
    plans: &[EntryPlan],
    index: &EntryIndex,
    item_types: &[ItemTypeListing],
) -> LanguageWalk {
    let mut translations = TranslationAccumulator::new(language);
    let mut alignment_mismatches = 0;
    let mut untranslated_entries = 0;

    for plan in plans {
        let Some(base) = index.get(base_language, &plan.key) else {
            continue;
        };
        let Some(entry) = index.get(language, &plan.key) else {
            log::debug!("{language}: no localized entry for {}", plan.key);
            untranslated_entries += 1;
            continue;
        };

        translations.set_entry(
            plan.key.clone(),
            LocalizedText {
                name: entry.name.clone(),
                description: entry.description.clone(),
            },
        );
        alignment_mismatches += count_mismatches(language, &plan.key, base, entry);

        for slot in &plan.slots {
            if let Some(text) = locate(entry, slot.locator) {
                translations.set(&slot.namespace, &slot.key, text, slot.mode);
            }
        }
        for (ability_key, ability) in plan.abilities.iter().zip(entry.abilities()) {
            translations.set_ability(
                ability_key,
                LocalizedText {
                    name: ability.name.clone(),
                    description: ability.description.clone(),
                },
            );
        }
    }

    for listing in item_types {
        translations.set(ITEM_TYPE, &listing.item_type, &listing.name, WriteMode::First);
    }

    LanguageWalk {
        catalog: translations.finish(),
        alignment_mismatches,
        untranslated_entries,
    }
}

fn locate(entry: &RawEntry, locator: Locator) -> Option<&str> {
    match locator {
        Locator::Tag(i) => entry.tags().get(i).map(String::as_str),
        Locator::Event(i) => entry.events().get(i).map(String::as_str),
        Locator::MetaLabel(i) => entry.meta().get(i).map(|row| row.label.as_str()),
        Locator::MetaValue(i) => entry.meta().get(i).map(|row| row.value.as_str()),
        Locator::StatLabel(i) => entry.stats().get(i).map(|row| row.label.as_str()),
        Locator::StatTextValue(i) => text_value(entry.stats().get(i)?),
        Locator::StatElement(i, j) => list_element(entry.stats().get(i)?, j),
        Locator::StatCondition(i, j) => match entry.stats().get(i)?.value.as_ref()? {
            StatText::Text(text) => split_conditions(text).1.get(j).copied(),
            StatText::List(_) => None,
        },
        Locator::DropLabel(g) => entry.drops().get(g).map(|group| group.label.as_str()),
        Locator::Inline(g, r) => entry.drops().get(g)?.relations.get(r)?.display_name(),
        Locator::SpellType => entry.spell_type(),
        Locator::FollowerLabel => entry.follower().map(|follower| follower.label.as_str()),
        Locator::FollowerName => entry.follower().map(|follower| follower.name.as_str()),
        Locator::BondLevel(l) => entry.bestial_bond().get(l).map(|level| level.name.as_str()),
        Locator::BondEffect(l, e) => {
            let level = entry.bestial_bond().get(l)?;
            parse_bond(&level.effects).get(e)?.translatable_name()
        }
        Locator::AbilityStatLabel(a, i) => ability_stat(entry, a, i).map(|row| row.label.as_str()),
        Locator::AbilityStatValue(a, i) => text_value(ability_stat(entry, a, i)?),
        Locator::AbilityStatElement(a, i, j) => list_element(ability_stat(entry, a, i)?, j),
        Locator::AbilityStatus(a, i, j) => match ability_stat(entry, a, i)?.value.as_ref()? {
            StatText::Text(text) => parse_status_list(text).get(j).map(|(name, _)| *name),
            StatText::List(_) => None,
        },
    }
}

fn ability_stat(entry: &RawEntry, a: usize, i: usize) -> Option<&StatRow> {
    entry.abilities().get(a)?.stats.get(i)
}

/// Text of a stat row without its trailing conditions
fn text_value(row: &StatRow) -> Option<&str> {
    match row.value.as_ref()? {
        StatText::Text(text) => Some(split_conditions(text).0),
        StatText::List(_) => None,
    }
}

fn list_element(row: &StatRow, j: usize) -> Option<&str> {
    match row.value.as_ref()? {
        StatText::List(items) => items.get(j).map(String::as_str),
        StatText::Text(_) => None,
    }
}

/// Lists whose length differs from the base; each is truncated by the zip
fn count_mismatches(language: &str, key: &EntryKey, base: &RawEntry, entry: &RawEntry) -> usize {
    let mut lists: Vec<(String, usize, usize)> = vec![
        ("tags".into(), base.tags().len(), entry.tags().len()),
        ("events".into(), base.events().len(), entry.events().len()),
        ("meta".into(), base.meta().len(), entry.meta().len()),
        ("stats".into(), base.stats().len(), entry.stats().len()),
        ("drops".into(), base.drops().len(), entry.drops().len()),
        (
            "abilities".into(),
            base.abilities().len(),
            entry.abilities().len(),
        ),
        (
            "bestial_bond".into(),
            base.bestial_bond().len(),
            entry.bestial_bond().len(),
        ),
    ];
    for (g, (b, l)) in base.drops().iter().zip(entry.drops()).enumerate() {
        lists.push((format!("drops[{g}]"), b.relations.len(), l.relations.len()));
    }
    for (i, (b, l)) in base.stats().iter().zip(entry.stats()).enumerate() {
        match (&b.value, &l.value) {
            (Some(StatText::List(b)), Some(StatText::List(l))) => {
                lists.push((format!("stats[{i}]"), b.len(), l.len()));
            }
            (Some(StatText::Text(b)), Some(StatText::Text(l))) => {
                let (b, l) = (split_conditions(b).1, split_conditions(l).1);
                if !b.is_empty() {
                    lists.push((format!("stats[{i}] conditions"), b.len(), l.len()));
                }
            }
            _ => {}
        }
    }
    for (i, (b, l)) in base.bestial_bond().iter().zip(entry.bestial_bond()).enumerate() {
        lists.push((
            format!("bestial_bond[{i}]"),
            parse_bond(&b.effects).len(),
            parse_bond(&l.effects).len(),
        ));
    }

    let mut mismatches = 0;
    for (field, base_len, len) in lists {
        if base_len != len {
            log::warn!(
                "{language}:{key}: {field} has {len} items, base has {base_len}; truncating"
            );
            mismatches += 1;
        }
    }
    mismatches
}
