//! Filter options and sortable fields over the finished catalog.

use codex_protocol::{Catalog, Category, StatValue};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

/// Text meta rows offered as filters
const ATTRIBUTE_OPTIONS: [&str; 5] = ["rarity", "family", "place", "type", "useable_by"];
/// Inline sections offered as filters, by status name
const STATUS_OPTIONS: [&str; 5] = ["causes", "gives", "cures", "immunities", "summons"];
/// List stats offered as filters
const STAT_OPTIONS: [&str; 1] = ["element"];

const SORTED_CATEGORIES: [Category; 3] = [Category::Items, Category::Followers, Category::Spells];
const UNSORTED_STATS: [&str; 2] = ["power", "element"];

/// Filter field -> every distinct value in the catalog
pub(crate) fn options(catalog: &Catalog) -> BTreeMap<String, Vec<String>> {
    let mut options: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    let mut add = |field: &str, value: String| {
        options.entry(field.to_string()).or_default().insert(value);
    };

    for entry in catalog.entries.values() {
        add("category", entry.category.to_string());
        if let Some(tier) = entry.tier {
            add("tier", tier.to_string());
        }
        if let Some(exotic) = entry.exotic {
            add("exotic", exotic.to_string());
        }
        if let Some(two_handed) = entry.two_handed {
            add("two_handed", two_handed.to_string());
        }
        for (field, value) in [
            ("item_type", &entry.item_type),
            ("spell_type", &entry.spell_type),
            ("targets", &entry.targets),
        ] {
            if let Some(value) = value {
                add(field, value.clone());
            }
        }
        for event in &entry.events {
            add("events", event.clone());
        }
        for tag in &entry.tags {
            add("tags", tag.clone());
        }
        for ability in &entry.abilities {
            add("abilities", ability.clone());
        }
        for field in ATTRIBUTE_OPTIONS {
            if let Some(value) = entry.attributes.get(field) {
                add(field, value.clone());
            }
        }
        for field in STATUS_OPTIONS {
            for status in entry.statuses.get(field).into_iter().flatten() {
                add(field, status.name.clone());
            }
        }
        for stat in STAT_OPTIONS {
            match entry.stats.get(stat) {
                Some(StatValue::List(values)) => {
                    for value in values {
                        add(&format!("stats.{stat}"), value.clone());
                    }
                }
                Some(StatValue::Text(value)) => add(&format!("stats.{stat}"), value.clone()),
                _ => {}
            }
        }
    }

    options
        .into_iter()
        .map(|(field, values)| {
            let mut values: Vec<String> = values.into_iter().collect();
            values.sort_by(|a, b| compare_values(a, b));
            (field, values)
        })
        .collect()
}

/// Category -> `stats.<key>` fields worth sorting by; raids sort by hp
pub(crate) fn sorts(catalog: &Catalog) -> BTreeMap<String, Vec<String>> {
    let mut sorts: BTreeMap<String, BTreeSet<String>> = SORTED_CATEGORIES
        .iter()
        .map(|category| (category.to_string(), BTreeSet::new()))
        .collect();
    sorts.insert(Category::Raids.to_string(), BTreeSet::from(["hp".to_string()]));

    for entry in catalog.entries.values() {
        if !SORTED_CATEGORIES.contains(&entry.category) {
            continue;
        }
        let Some(fields) = sorts.get_mut(entry.category.as_str()) else {
            continue;
        };
        for stat in entry.stats.keys() {
            if !UNSORTED_STATS.contains(&stat.as_str()) {
                fields.insert(format!("stats.{stat}"));
            }
        }
    }

    sorts
        .into_iter()
        .map(|(category, fields)| (category, fields.into_iter().collect()))
        .collect()
}

/// Numbers first in numeric order, then text
fn compare_values(a: &str, b: &str) -> Ordering {
    match (a.parse::<i64>(), b.parse::<i64>()) {
        (Ok(a), Ok(b)) => a.cmp(&b),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}
