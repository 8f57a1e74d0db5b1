use codex_indexer::{EntryIndex, ItemTypeListing, ItemTypeTable};
use codex_protocol::{
    Ability, BondEffect, BondLevel, Category, CreatureBody, DropGroup, EdgeRef, EntryBody,
    EntryKey, FollowerBody, FollowerLink, InlineRelation, ItemBody, OffhandAbility,
    PointerRelation, RaidBody, RawEntry, Relation, SpellBody, StatRow, StatText, StatValue,
};
use codex_reconciler::namespace::{
    EVENTS, FOLLOWER, ITEM_TYPE, LEVELS, META, STATS_CONDITIONS, STATUS, SUMMONS, TAGS, TARGETS,
};
use codex_reconciler::{ReconcileError, Reconciler};
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

fn spell(id: &str, name: &str, tags: &[&str]) -> RawEntry {
    raw(
        id,
        name,
        EntryBody::Spells(SpellBody {
            tags: tags.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        }),
    )
}

fn pointer(href: &str) -> Relation {
    Relation::Pointer(PointerRelation {
        href: href.to_string(),
        name: None,
    })
}

fn monster(id: &str, events: &[&str], drops: Vec<DropGroup>) -> RawEntry {
    raw(
        id,
        id,
        EntryBody::Monsters(CreatureBody {
            events: events.iter().map(|e| e.to_string()).collect(),
            drops,
            ..Default::default()
        }),
    )
}

fn inline(group: &str, name: &str, icon: &str) -> DropGroup {
    DropGroup {
        label: group.to_string(),
        relations: vec![Relation::Inline(InlineRelation {
            name: name.to_string(),
            icon: Some(icon.to_string()),
            description: None,
            chance: None,
        })],
    }
}

fn text_stat(label: &str, value: &str) -> StatRow {
    StatRow {
        label: label.to_string(),
        value: Some(StatText::Text(value.to_string())),
    }
}

fn languages() -> Vec<String> {
    vec!["en".to_string(), "fr".to_string()]
}

fn reconciler() -> Reconciler {
    Reconciler::new("en", languages()).expect("reconciler")
}

#[test]
fn translations_align_by_position() {
    let mut index = EntryIndex::new();
    index.insert_if_absent("en", spell("blast", "Blast", &["Fire", "Ice"]));
    index.insert_if_absent("fr", spell("blast", "Explosion", &["Feu", "Glace"]));

    let result = reconciler().reconcile(&index, &ItemTypeTable::new());
    let fr = &result.translations["fr"];
    assert_eq!(fr.get(TAGS, "fire"), Some("Feu"));
    assert_eq!(fr.get(TAGS, "ice"), Some("Glace"));
    assert_eq!(
        fr.entries[&EntryKey::new(Category::Spells, "blast")].name,
        "Explosion"
    );
    assert_eq!(result.translations["en"].get(TAGS, "fire"), Some("Fire"));
    assert_eq!(result.stats.alignment_mismatches, 0);
}

#[test]
fn shorter_translation_is_truncated_and_counted() {
    let mut index = EntryIndex::new();
    index.insert_if_absent("en", spell("blast", "Blast", &["Fire", "Ice", "Dark"]));
    index.insert_if_absent("fr", spell("blast", "Explosion", &["Feu"]));

    let result = reconciler().reconcile(&index, &ItemTypeTable::new());
    let fr = &result.translations["fr"];
    assert_eq!(fr.get(TAGS, "fire"), Some("Feu"));
    assert_eq!(fr.get(TAGS, "ice"), None);
    assert_eq!(result.stats.alignment_mismatches, 1);
    let blast = &result.catalog.entries[&EntryKey::new(Category::Spells, "blast")];
    assert_eq!(blast.tags, vec!["fire", "ice", "dark"]);
}

#[test]
fn single_event_entry_names_the_event() {
    let mut index = EntryIndex::new();
    // "a" sorts first and lists two events in an order that differs in French
    index.insert_if_absent("en", monster("a", &["Harvest", "Winter"], vec![]));
    index.insert_if_absent("fr", monster("a", &["Hiver", "Moisson"], vec![]));
    index.insert_if_absent("en", monster("b", &["Harvest"], vec![]));
    index.insert_if_absent("fr", monster("b", &["Moisson"], vec![]));

    let result = reconciler().reconcile(&index, &ItemTypeTable::new());
    let fr = &result.translations["fr"];
    assert_eq!(fr.get(EVENTS, "harvest"), Some("Moisson"));
    assert_eq!(fr.get(EVENTS, "winter"), Some("Moisson"));
}

#[test]
fn materials_and_offhands_are_cross_linked() {
    let mut index = EntryIndex::new();
    let mut shield = raw(
        "shield",
        "Shield",
        EntryBody::Items(ItemBody {
            ability: Some(OffhandAbility {
                name: "Heal".into(),
                description: None,
            }),
            drops: vec![DropGroup {
                label: "Upgrade materials".into(),
                relations: vec![pointer("/codex/items/ore/")],
            }],
            ..Default::default()
        }),
    );
    shield.icon = Some("items/shield.png".into());
    index.insert_if_absent("en", shield);
    index.insert_if_absent("en", raw("ore", "Ore", EntryBody::Items(ItemBody::default())));
    index.insert_if_absent("en", spell("heal", "Heal", &[]));
    index.insert_if_absent("en", spell("heal-oh", "Heal (Off-hand)", &[]));

    let result = Reconciler::new("en", vec!["en".into()])
        .expect("reconciler")
        .reconcile(&index, &ItemTypeTable::new());
    let shield_key = EntryKey::new(Category::Items, "shield");
    let offhand_key = EntryKey::new(Category::Spells, "heal-oh");

    let catalog = &result.catalog;
    assert_eq!(
        catalog.entries[&EntryKey::new(Category::Items, "ore")].source,
        vec![shield_key.clone()]
    );
    assert_eq!(
        catalog.entries[&shield_key].ability,
        Some(EdgeRef::Resolved(offhand_key.clone()))
    );
    assert_eq!(catalog.entries[&offhand_key].off_hands, vec![shield_key]);
    assert_eq!(result.stats.unresolved_references, 0);
}

#[test]
fn skill_users_and_unresolved_edges() {
    let mut index = EntryIndex::new();
    index.insert_if_absent("en", spell("fire", "Fire", &[]));
    index.insert_if_absent(
        "en",
        monster(
            "imp",
            &[],
            vec![DropGroup {
                label: "Skills".into(),
                relations: vec![pointer("/codex/spells/fire/"), pointer("/codex/spells/gone/")],
            }],
        ),
    );

    let result = Reconciler::new("en", vec!["en".into()])
        .expect("reconciler")
        .reconcile(&index, &ItemTypeTable::new());
    let imp_key = EntryKey::new(Category::Monsters, "imp");
    assert_eq!(
        result.catalog.entries[&EntryKey::new(Category::Spells, "fire")].used_by,
        vec![imp_key.clone()]
    );
    assert_eq!(
        result.catalog.entries[&imp_key].relations["skills"][1],
        EdgeRef::Unresolved("/codex/spells/gone/".into())
    );
    assert_eq!(result.stats.unresolved_references, 1);
    assert_eq!(
        result.translations["en"].get(META, "skills"),
        Some("Skills")
    );
}

#[test]
fn item_types_assign_and_translate() {
    let mut index = EntryIndex::new();
    index.insert_if_absent(
        "en",
        raw(
            "axe",
            "Axe",
            EntryBody::Items(ItemBody {
                stats: vec![StatRow {
                    label: "Two handed".into(),
                    value: None,
                }],
                ..Default::default()
            }),
        ),
    );
    let listing = |name: &str| ItemTypeListing {
        item_type: "weapon".into(),
        name: name.into(),
        item_ids: vec!["axe".into()],
    };
    let mut item_types = ItemTypeTable::new();
    item_types.insert("en".into(), vec![listing("Weapon")]);
    item_types.insert("fr".into(), vec![listing("Arme")]);

    let result = reconciler().reconcile(&index, &item_types);
    let axe = &result.catalog.entries[&EntryKey::new(Category::Items, "axe")];
    assert_eq!(axe.item_type.as_deref(), Some("weapon"));
    assert_eq!(axe.two_handed, Some(1));
    assert_eq!(result.translations["fr"].get(ITEM_TYPE, "weapon"), Some("Arme"));
    assert_eq!(result.stats.untranslated_entries, 1);
}

#[test]
fn bond_abilities_link_to_spells_and_statuses_translate() {
    let follower = |bond: &str, effects: &str| {
        raw(
            "wolf",
            "Wolf",
            EntryBody::Followers(FollowerBody {
                bestial_bond: vec![BondLevel {
                    name: bond.into(),
                    effects: effects.into(),
                }],
                drops: vec![DropGroup {
                    label: "Causes".into(),
                    relations: vec![Relation::Inline(InlineRelation {
                        name: if bond == "Bond I" { "Rot" } else { "Pourriture" }.into(),
                        icon: Some("status/rot.png".into()),
                        description: None,
                        chance: None,
                    })],
                }],
                ..Default::default()
            }),
        )
    };
    let mut index = EntryIndex::new();
    index.insert_if_absent("en", spell("heal", "Heal", &[]));
    index.insert_if_absent("en", follower("Bond I", "Bleed (5%), +Ability: Heal"));
    index.insert_if_absent("fr", follower("Lien I", "Saignement (5%), +Capacité: Soin"));

    let result = reconciler().reconcile(&index, &ItemTypeTable::new());
    let wolf = &result.catalog.entries[&EntryKey::new(Category::Followers, "wolf")];
    assert_eq!(
        wolf.bestial_bond[0][1],
        BondEffect::Ability {
            name: "heal".into(),
            spell: Some(EntryKey::new(Category::Spells, "heal")),
        }
    );
    let fr = &result.translations["fr"];
    assert_eq!(fr.get(STATUS, "bleed"), Some("Saignement"));
    assert_eq!(fr.get(STATUS, "rot"), Some("Pourriture"));
    assert_eq!(fr.get(LEVELS, "1"), Some("Lien I"));
}

#[test]
fn reconciliation_is_deterministic() {
    let build = || {
        let mut index = EntryIndex::new();
        for (id, icon) in [("b", "rot_b.png"), ("a", "rot_a.png"), ("c", "rot_b.png")] {
            index.insert_if_absent(
                "en",
                monster(
                    id,
                    &[],
                    vec![DropGroup {
                        label: "Causes".into(),
                        relations: vec![Relation::Inline(InlineRelation {
                            name: "Rot".into(),
                            icon: Some(icon.into()),
                            description: None,
                            chance: Some("10%".into()),
                        })],
                    }],
                ),
            );
        }
        index.insert_if_absent(
            "en",
            raw(
                "ring",
                "Ring",
                EntryBody::Items(ItemBody {
                    stats: vec![StatRow {
                        label: "Attack".into(),
                        value: Some(StatText::Text("+5".into())),
                    }],
                    ..Default::default()
                }),
            ),
        );
        Reconciler::new("en", vec!["en".into()])
            .expect("reconciler")
            .reconcile(&index, &ItemTypeTable::new())
    };

    let first = build();
    let second = build();
    assert_eq!(first.catalog, second.catalog);
    assert_eq!(first.translations, second.translations);

    // insertion order does not matter: "a" is planned first and keeps the bare key
    let a = &first.catalog.entries[&EntryKey::new(Category::Monsters, "a")];
    assert_eq!(a.statuses["causes"][0].name, "rot");
    assert_eq!(a.statuses["causes"][0].chance, Some(10.0));
    let ring = &first.catalog.entries[&EntryKey::new(Category::Items, "ring")];
    assert_eq!(ring.stats["attack"], StatValue::Integer(5));
}

#[test]
fn base_language_must_be_listed() {
    assert_eq!(
        Reconciler::new("en", vec!["fr".into()]).err(),
        Some(ReconcileError::MissingBaseLanguage("en".into()))
    );
    assert_eq!(
        Reconciler::new("en", Vec::new()).err(),
        Some(ReconcileError::NoLanguages)
    );
}

#[test]
fn colliding_statuses_translate_under_their_own_keys() {
    let mut index = EntryIndex::new();
    index.insert_if_absent("en", monster("a", &[], vec![inline("Causes", "Rot", "rot_a.png")]));
    index.insert_if_absent("en", monster("b", &[], vec![inline("Causes", "Rot", "rot_b.png")]));
    index.insert_if_absent("fr", monster("a", &[], vec![inline("Cause", "Pourriture", "rot_a.png")]));
    index.insert_if_absent("fr", monster("b", &[], vec![inline("Cause", "Nécrose", "rot_b.png")]));

    let result = reconciler().reconcile(&index, &ItemTypeTable::new());
    let suffixed = format!("rot_{}", codex_slug::hash8("rot_b.png"));
    let b = &result.catalog.entries[&EntryKey::new(Category::Monsters, "b")];
    assert_eq!(b.statuses["causes"][0].name, suffixed);

    let fr = &result.translations["fr"];
    assert_eq!(fr.get(STATUS, "rot"), Some("Pourriture"));
    assert_eq!(fr.get(STATUS, &suffixed), Some("Nécrose"));
    assert_eq!(result.translations["en"].get(STATUS, &suffixed), Some("Rot"));
}

#[test]
fn summons_group_translates_into_summons() {
    let mut index = EntryIndex::new();
    index.insert_if_absent("en", monster("witch", &[], vec![inline("Summons", "Imp", "imp.png")]));
    index.insert_if_absent(
        "fr",
        monster("witch", &[], vec![inline("Invocations", "Diablotin", "imp.png")]),
    );

    let result = reconciler().reconcile(&index, &ItemTypeTable::new());
    let witch = &result.catalog.entries[&EntryKey::new(Category::Monsters, "witch")];
    assert_eq!(witch.statuses["summons"][0].name, "imp");
    let fr = &result.translations["fr"];
    assert_eq!(fr.get(SUMMONS, "imp"), Some("Diablotin"));
    assert_eq!(fr.get(STATUS, "imp"), None);
    assert_eq!(fr.get(META, "summons"), Some("Invocations"));
    assert_eq!(result.catalog.meta.options["summons"], vec!["imp"]);
}

#[test]
fn conditions_targets_and_followers_translate() {
    let smite = |damage: &str, targets: (&str, &str)| {
        raw(
            "smite",
            "Smite",
            EntryBody::Spells(SpellBody {
                stats: vec![text_stat("Damage", damage), text_stat(targets.0, targets.1)],
                ..Default::default()
            }),
        )
    };
    let dragon = |label: &str, name: &str| {
        raw(
            "dragon",
            "Dragon",
            EntryBody::Raids(RaidBody {
                follower: Some(FollowerLink {
                    label: label.into(),
                    name: name.into(),
                    icon: Some("whelp.png".into()),
                }),
                ..Default::default()
            }),
        )
    };
    let mut index = EntryIndex::new();
    index.insert_if_absent("en", smite("+10% (vs undead)", ("Targets", "All enemies")));
    index.insert_if_absent(
        "fr",
        smite("+10% (contre les morts)", ("Cibles", "Tous les ennemis")),
    );
    index.insert_if_absent("en", dragon("Follower", "Whelp"));
    index.insert_if_absent("fr", dragon("Compagnon", "Dragonnet"));

    let result = reconciler().reconcile(&index, &ItemTypeTable::new());
    let fr = &result.translations["fr"];
    assert_eq!(fr.get(STATS_CONDITIONS, "vs_undead"), Some("contre les morts"));
    assert_eq!(fr.get(TARGETS, "all_enemies"), Some("Tous les ennemis"));
    assert_eq!(fr.get(META, "targets"), Some("Cibles"));
    assert_eq!(fr.get(META, "follower"), Some("Compagnon"));
    assert_eq!(fr.get(FOLLOWER, "whelp"), Some("Dragonnet"));
    assert_eq!(result.stats.alignment_mismatches, 0);

    let catalog = &result.catalog;
    assert_eq!(
        catalog.entries[&EntryKey::new(Category::Raids, "dragon")].follower.as_deref(),
        Some("whelp")
    );
    assert_eq!(catalog.meta.options["targets"], vec!["all_enemies"]);
    assert_eq!(catalog.meta.sorts["spells"], vec!["stats.damage"]);
}

#[test]
fn ability_statuses_translate_by_position() {
    let boss = |causes: &str| {
        raw(
            "ogre",
            "Ogre",
            EntryBody::Bosses(CreatureBody {
                abilities: vec![Ability {
                    name: "Smash".into(),
                    stats: vec![text_stat("Causes", causes)],
                    ..Default::default()
                }],
                ..Default::default()
            }),
        )
    };
    let mut index = EntryIndex::new();
    index.insert_if_absent("en", boss("Stun (20%), Rot (5%)"));
    index.insert_if_absent("fr", boss("Étourdi (20%), Pourriture (5%)"));

    let result = reconciler().reconcile(&index, &ItemTypeTable::new());
    let fr = &result.translations["fr"];
    assert_eq!(fr.get(STATUS, "stun"), Some("Étourdi"));
    assert_eq!(fr.get(STATUS, "rot"), Some("Pourriture"));
    assert!(result.catalog.meta.ability_stats["smash"].contains_key("causes"));
}

#[test]
fn unknown_fields_are_counted_per_language() {
    let ring = || {
        raw(
            "ring",
            "Ring",
            EntryBody::Items(ItemBody {
                extra: [("weight".to_string(), serde_json::json!(3))].into_iter().collect(),
                ..Default::default()
            }),
        )
    };
    let mut index = EntryIndex::new();
    index.insert_if_absent("en", ring());
    index.insert_if_absent("fr", ring());
    index.insert_if_absent("en", spell("heal", "Heal", &[]));

    let result = reconciler().reconcile(&index, &ItemTypeTable::new());
    assert_eq!(result.stats.unknown_fields, 2);
    assert_eq!(result.stats.untranslated_entries, 1);
}
