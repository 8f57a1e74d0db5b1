//! Text value parsing: numbers, value types, chances and bond effects.

use codex_protocol::{StatValue, ValueKind, ValueType, ValueUnit};
use once_cell::sync::Lazy;
use regex::Regex;

static CHANCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<name>.+) \((?P<value>\d+(?:\.\d+)?)%\)$").expect("chance pattern")
});
static ABILITY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+(?P<name>.+): (?P<value>.+)$").expect("ability pattern"));
static BONUS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<name>.+): (?P<value>.+)$").expect("bonus pattern"));
static CONDITIONS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<value>.+) \((?P<conditions>[^()]+)\)$").expect("conditions pattern")
});
static SPELL_LEVEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^.+ \(.+ (?P<level>\d+)\)$").expect("spell level pattern"));
static NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?(?P<number>-?\d+(?:\.\d+)*)").expect("number pattern"));

/// Value type from the shape of a stat text (`+15%`, `3 turns`, `10 mana`)
pub fn value_type(text: &str) -> ValueType {
    let text = text.trim();
    let unit = if text.ends_with('%') {
        Some(ValueUnit::Percent)
    } else if text.ends_with("turn") || text.ends_with("turns") {
        Some(ValueUnit::Turn)
    } else if text.ends_with("mana") {
        Some(ValueUnit::Mana)
    } else if text.ends_with("/m") {
        Some(ValueUnit::PerM)
    } else {
        None
    };
    ValueType {
        kind: ValueKind::Number,
        signed: text.starts_with('+'),
        unit,
    }
}

/// Numeric stat text: signed, carries a unit, or ends in a digit
pub fn looks_numeric(text: &str) -> bool {
    let vt = value_type(text);
    vt.signed || vt.unit.is_some() || text.trim().ends_with(|c: char| c.is_ascii_digit())
}

/// Leading number of a stat text; `None` when there is none
pub fn parse_number(text: &str) -> Option<StatValue> {
    let caps = NUMBER.captures(text.trim())?;
    let number = caps.name("number")?.as_str();
    if let Ok(n) = number.parse::<i64>() {
        return Some(StatValue::Integer(n));
    }
    number.parse::<f64>().ok().map(StatValue::Number)
}

/// `"12%"` -> 12.0
pub fn parse_percent(text: &str) -> Option<f64> {
    text.trim().trim_end_matches('%').trim().parse().ok()
}

/// `"★5"` -> 5
pub fn parse_tier(text: &str) -> Option<u32> {
    text.trim().trim_start_matches('★').trim().parse().ok()
}

/// `"12,000"` -> 12000
pub fn parse_hp(text: &str) -> Option<u64> {
    text.trim().replace(',', "").parse().ok()
}

/// Keep an existing value type once it is decisive (signed, flag or text);
/// otherwise take a new one that says more.
pub fn should_replace(existing: Option<&ValueType>, new: &ValueType) -> bool {
    match existing {
        None => true,
        Some(old) if old.signed || old.kind != ValueKind::Number => false,
        Some(old) => {
            (new.signed || new.kind != ValueKind::Number || new.unit.is_some()) && old != new
        }
    }
}

/// `"+10% (vs undead, at night)"` -> (`"+10%"`, `["vs undead", "at night"]`)
pub fn split_conditions(text: &str) -> (&str, Vec<&str>) {
    let text = text.trim();
    match CONDITIONS.captures(text) {
        Some(caps) => match (caps.name("value"), caps.name("conditions")) {
            (Some(value), Some(conditions)) => (
                value.as_str(),
                conditions
                    .as_str()
                    .split(',')
                    .map(str::trim)
                    .filter(|c| !c.is_empty())
                    .collect(),
            ),
            _ => (text, Vec::new()),
        },
        None => (text, Vec::new()),
    }
}

/// `"Fireball (Level 12)"` -> 12
pub fn parse_spell_level(text: &str) -> Option<u32> {
    SPELL_LEVEL
        .captures(text.trim())?
        .name("level")?
        .as_str()
        .parse()
        .ok()
}

/// `"Rot (1%), Blight"` -> `[("Rot", Some(1.0)), ("Blight", None)]`
pub fn parse_status_list(text: &str) -> Vec<(&str, Option<f64>)> {
    text.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| match CHANCE.captures(part) {
            Some(caps) => match (caps.name("name"), caps.name("value")) {
                (Some(name), Some(value)) => (name.as_str(), value.as_str().parse().ok()),
                _ => (part, None),
            },
            None => (part, None),
        })
        .collect()
}

/// One effect of a bestial bond level
#[derive(Debug, Clone, PartialEq)]
pub enum BondPart<'a> {
    /// `Rot (10%)`
    Bond { name: &'a str, chance: f64 },
    /// `+Ability: Heal`
    Ability { name: &'a str },
    /// `Attack: +5%`, or a bare flag like `Lucky`
    Bonus { name: &'a str, value: Option<&'a str> },
}

impl<'a> BondPart<'a> {
    /// Text translated for this effect; abilities translate through their spell
    pub fn translatable_name(&self) -> Option<&'a str> {
        match self {
            Self::Bond { name, .. } | Self::Bonus { name, .. } => Some(*name),
            Self::Ability { .. } => None,
        }
    }
}

/// Split a bond level's comma separated effect text
pub fn parse_bond(text: &str) -> Vec<BondPart<'_>> {
    text.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(parse_bond_part)
        .collect()
}

fn parse_bond_part(part: &str) -> BondPart<'_> {
    if let Some(caps) = CHANCE.captures(part) {
        let chance = caps
            .name("value")
            .and_then(|m| m.as_str().parse().ok());
        if let (Some(name), Some(chance)) = (caps.name("name"), chance) {
            return BondPart::Bond {
                name: name.as_str(),
                chance,
            };
        }
    }
    if let Some(name) = ABILITY.captures(part).and_then(|caps| caps.name("value")) {
        return BondPart::Ability {
            name: name.as_str(),
        };
    }
    if !part.starts_with('+') {
        if let Some(caps) = BONUS.captures(part) {
            if let (Some(name), Some(value)) = (caps.name("name"), caps.name("value")) {
                return BondPart::Bonus {
                    name: name.as_str(),
                    value: Some(value.as_str()),
                };
            }
        }
    }
    BondPart::Bonus {
        name: part,
        value: None,
    }
}
