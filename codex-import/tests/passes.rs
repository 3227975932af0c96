use codex_catalog::*;
use codex_import::passes::*;
use codex_import::{Catalog, ImageIndex, Record, text::UNKNOWN};

fn catalog_with_units() -> Catalog {
    let mut catalog = Catalog::new();
    catalog.initialize_faction("TYR", "Tyranids").unwrap();
    catalog.initialize_faction("SM", "Space Marines").unwrap();
    let rows = vec![
        Record::from_pairs(&[("id", "T1"), ("faction_id", "TYR"), ("name", "Hive Tyrant")]),
        Record::from_pairs(&[("id", "T2"), ("faction_id", "TYR"), ("name", "Termagants")]),
        Record::from_pairs(&[("id", "S1"), ("faction_id", "SM"), ("name", "Captain")]),
    ];
    apply_datasheets(&mut catalog, rows, &ImageIndex::new());
    catalog
}

fn unit<'a>(catalog: &'a Catalog, id: &str) -> &'a Unit {
    catalog.find_unit(id).unwrap().1
}

fn wargear(datasheet: &str, name: &str, description: &str, range: &str, kind: &str) -> Record {
    Record::from_pairs(&[
        ("datasheet_id", datasheet),
        ("name", name),
        ("description", description),
        ("range", range),
        ("type", kind),
        ("A", "2"),
        ("BS_WS", "3+"),
        ("S", "4"),
        ("AP", "0"),
        ("D", "1"),
    ])
}

#[test]
fn datasheet_rows_need_identity_fields() {
    let mut catalog = Catalog::new();
    catalog.initialize_faction("TYR", "Tyranids").unwrap();
    let stats = apply_datasheets(
        &mut catalog,
        vec![
            Record::from_pairs(&[("id", ""), ("faction_id", "TYR"), ("name", "Blank")]),
            Record::from_pairs(&[("id", "T1"), ("faction_id", "TYR"), ("name", "")]),
            Record::from_pairs(&[("id", "T2"), ("faction_id", "ORK"), ("name", "Boyz")]),
        ],
        &ImageIndex::new(),
    );
    assert_eq!(stats.malformed, 2);
    assert_eq!(stats.missing_key, 1);
    assert_eq!(catalog.unit_count(), 0);
}

#[test]
fn datasheet_row_completes_placeholder_unit() {
    let mut catalog = Catalog::new();
    catalog.initialize_faction("TYR", "Tyranids").unwrap();
    catalog.ensure_unit("TYR", "T1").unwrap();

    apply_keywords(
        &mut catalog,
        vec![Record::from_pairs(&[
            ("datasheet_id", "T1"),
            ("keyword", "Monster"),
            ("is_faction_keyword", "false"),
        ])],
    );
    let stats = apply_datasheets(
        &mut catalog,
        vec![Record::from_pairs(&[
            ("id", "T1"),
            ("faction_id", "TYR"),
            ("name", "Hive Tyrant"),
            ("role", "Characters"),
        ])],
        &ImageIndex::new(),
    );

    assert_eq!(stats.applied, 1);
    assert_eq!(catalog.unit_count(), 1);
    let tyrant = unit(&catalog, "T1");
    assert_eq!(tyrant.name, "Hive Tyrant");
    assert_eq!(tyrant.role, "Characters");
    assert_eq!(tyrant.keywords.other, vec!["Monster"]);
}

#[test]
fn datasheet_pass_restores_indexed_image() {
    let mut catalog = Catalog::new();
    catalog.initialize_faction("TYR", "Tyranids").unwrap();
    let mut images = ImageIndex::new();
    images.insert("T1", "tyrant.png");

    apply_datasheets(
        &mut catalog,
        vec![
            Record::from_pairs(&[("id", "T1"), ("faction_id", "TYR"), ("name", "Hive Tyrant")]),
            Record::from_pairs(&[("id", "T2"), ("faction_id", "TYR"), ("name", "Termagants")]),
        ],
        &images,
    );
    assert_eq!(unit(&catalog, "T1").image, "tyrant.png");
    assert_eq!(unit(&catalog, "T2").image, "");
}

#[test]
fn weapons_are_filed_under_exactly_one_list() {
    let mut catalog = catalog_with_units();
    let stats = apply_wargear(
        &mut catalog,
        vec![
            wargear("T1", "Scything talons", "", "Melee", "Melee"),
            wargear("T1", "Heavy venom cannon", "blast", "36\"", "Ranged"),
            wargear("T1", "Stranglethorn", "Blast|24\"|Heavy|1|4+|7|-1|2", "", ""),
            wargear("NOPE", "Lost", "", "12\"", "Ranged"),
        ],
    );
    assert_eq!(stats.applied, 3);
    assert_eq!(stats.missing_key, 1);

    let tyrant = unit(&catalog, "T1");
    assert_eq!(tyrant.melee_weapons.len(), 1);
    assert_eq!(tyrant.ranged_weapons.len(), 2);
    assert!(tyrant.melee_weapons.iter().all(Weapon::is_melee));
    assert!(tyrant.ranged_weapons.iter().all(|w| !w.is_melee()));

    let cannon = &tyrant.ranged_weapons[0];
    assert_eq!(cannon.special_rules, vec!["blast"]);
    assert_eq!(cannon.range, "36\"");
    assert_eq!(cannon.attacks, "2");

    let thorn = &tyrant.ranged_weapons[1];
    assert_eq!(thorn.special_rules, vec!["Blast"]);
    assert_eq!(thorn.range, "24\"");
    assert_eq!(thorn.weapon_type, "Heavy");
    assert_eq!(thorn.ap, "-1");
}

#[test]
fn ability_pass_is_idempotent() {
    let mut catalog = catalog_with_units();
    let rows = || {
        vec![
            Record::from_pairs(&[
                ("datasheet_id", "T1"),
                ("line", "1"),
                ("name", "Synapse"),
                ("description", "Leadership aura."),
                ("type", "Faction"),
            ]),
            Record::from_pairs(&[
                ("datasheet_id", "T1"),
                ("line", "2"),
                ("name", "Shadow in the Warp"),
                ("description", "Battle-shock."),
                ("type", "Datasheet"),
            ]),
        ]
    };

    let first = apply_abilities(&mut catalog, rows(), &AbilityCatalog::default());
    assert_eq!(first.applied, 2);
    let before = unit(&catalog, "T1").abilities.clone();

    let second = apply_abilities(&mut catalog, rows(), &AbilityCatalog::default());
    assert_eq!(second.applied, 0);
    assert_eq!(second.duplicates, 2);
    assert_eq!(unit(&catalog, "T1").abilities, before);
    assert_eq!(before.faction.len(), 1);
    assert_eq!(before.datasheet.len(), 1);
}

#[test]
fn ability_type_labels_pick_the_list() {
    let mut catalog = catalog_with_units();
    let row = |line: &str, kind: &str| {
        Record::from_pairs(&[
            ("datasheet_id", "S1"),
            ("line", line),
            ("name", "Rule"),
            ("description", line),
            ("type", kind),
        ])
    };
    apply_abilities(
        &mut catalog,
        vec![
            row("1", "Core"),
            row("2", "Wargear"),
            row("3", "Special (Primarch)"),
            row("4", "Fortification"),
            row("5", "Something new"),
        ],
        &AbilityCatalog::default(),
    );

    let abilities = &unit(&catalog, "S1").abilities;
    assert_eq!(abilities.core.len(), 1);
    assert_eq!(abilities.wargear.len(), 1);
    assert_eq!(abilities.primarch.len(), 1);
    assert_eq!(abilities.fortification.len(), 1);
    assert_eq!(abilities.datasheet.len(), 1);
    assert_eq!(abilities.datasheet[0].ability_type, "datasheet");
}

#[test]
fn ability_reference_fills_blank_fields() {
    let (reference, stats) = load_ability_catalog(vec![
        Record::from_pairs(&[("id", "AB1"), ("name", "Deep Strike"), ("description", "Reserves.")]),
        Record::from_pairs(&[("id", ""), ("name", "Nameless")]),
    ]);
    assert_eq!(stats.applied, 1);
    assert_eq!(stats.malformed, 1);
    assert_eq!(reference.len(), 1);

    let mut catalog = catalog_with_units();
    apply_abilities(
        &mut catalog,
        vec![
            Record::from_pairs(&[("datasheet_id", "T1"), ("ability_id", "AB1"), ("type", "Core")]),
            Record::from_pairs(&[
                ("datasheet_id", "T2"),
                ("ability_id", "AB1"),
                ("name", "Deep Strike (6\")"),
                ("type", "Core"),
            ]),
        ],
        &reference,
    );
    let core = &unit(&catalog, "T1").abilities.core[0];
    assert_eq!(core.name, "Deep Strike");
    assert_eq!(core.description, "Reserves.");
    let own = &unit(&catalog, "T2").abilities.core[0];
    assert_eq!(own.name, "Deep Strike (6\")");
    assert_eq!(own.description, "Reserves.");
}

#[test]
fn keywords_split_by_faction_flag() {
    let mut catalog = catalog_with_units();
    let row = |keyword: &str, flag: &str| {
        Record::from_pairs(&[
            ("datasheet_id", "S1"),
            ("keyword", keyword),
            ("is_faction_keyword", flag),
        ])
    };
    let stats = apply_keywords(
        &mut catalog,
        vec![
            row("Adeptus Astartes", "TRUE"),
            row("Infantry", "false"),
            row("Infantry", "false"),
            row("", "false"),
        ],
    );
    assert_eq!(stats.applied, 2);
    assert_eq!(stats.duplicates, 1);
    assert_eq!(stats.malformed, 1);

    let keywords = &unit(&catalog, "S1").keywords;
    assert_eq!(keywords.faction, vec!["Adeptus Astartes"]);
    assert_eq!(keywords.other, vec!["Infantry"]);
}

#[test]
fn enrichment_rows_do_not_create_units() {
    let mut catalog = catalog_with_units();
    let stats = apply_keywords(
        &mut catalog,
        vec![Record::from_pairs(&[
            ("datasheet_id", "X9"),
            ("keyword", "Monster"),
            ("is_faction_keyword", "false"),
        ])],
    );
    assert_eq!(stats.missing_key, 1);
    assert_eq!(stats.applied, 0);
    assert_eq!(catalog.unit_count(), 3);
    assert!(catalog.find_unit("X9").is_none());
}

#[test]
fn profile_names_fan_out() {
    let mut catalog = catalog_with_units();
    apply_profiles(
        &mut catalog,
        vec![
            Record::from_pairs(&[("datasheet_id", "T2"), ("name", "Termagant\nLeader"), ("M", "6\"")]),
            Record::from_pairs(&[("datasheet_id", "T1"), ("name", ""), ("M", "8\"")]),
        ],
    );
    let gants = unit(&catalog, "T2");
    assert_eq!(gants.profiles.len(), 2);
    assert_eq!(gants.profiles[1].name, "Leader");
    assert_eq!(gants.profiles[1].movement, "6\"");
    assert_eq!(unit(&catalog, "T1").profiles.len(), 1);
}

#[test]
fn leaders_reference_attached_units() {
    let mut catalog = catalog_with_units();
    let stats = apply_leaders(
        &mut catalog,
        vec![
            Record::from_pairs(&[("leader_id", "T1"), ("attached_id", "T2")]),
            Record::from_pairs(&[("leader_id", "T1"), ("attached_id", "T2")]),
            Record::from_pairs(&[("leader_id", "GONE"), ("attached_id", "T2")]),
            Record::from_pairs(&[("leader_id", "T1"), ("attached_id", "")]),
        ],
    );
    assert_eq!(stats.applied, 1);
    assert_eq!(stats.duplicates, 1);
    assert_eq!(stats.missing_key, 1);
    assert_eq!(stats.malformed, 1);

    let leads = &unit(&catalog, "T1").leads;
    assert_eq!(leads.len(), 1);
    assert_eq!(leads[0].name, "Termagants");
    // The attached unit stays in place.
    assert!(catalog.find_unit("T2").is_some());
    assert_eq!(catalog.faction("TYR").unwrap().units.len(), 2);
}

#[test]
fn stratagems_without_markers_read_unknown() {
    let mut catalog = catalog_with_units();
    let stats = apply_stratagems(
        &mut catalog,
        vec![
            Record::from_pairs(&[
                ("faction_id", "SM"),
                ("id", "S1"),
                ("name", "Armour of Contempt"),
                ("detachment", "Gladius Task Force"),
                ("description", "Reduce AP by 1."),
            ]),
            Record::from_pairs(&[
                ("faction_id", "ORK"),
                ("id", "S2"),
                ("name", "Waaagh"),
                ("detachment", "War Horde"),
                ("description", "Go."),
            ]),
        ],
    );
    assert_eq!(stats.applied, 1);
    assert_eq!(stats.missing_key, 1);

    let faction = catalog.faction("SM").unwrap();
    let stratagem = &faction.detachment("Gladius Task Force").unwrap().stratagems[0];
    assert_eq!(stratagem.when, UNKNOWN);
    assert_eq!(stratagem.target, UNKNOWN);
    assert_eq!(stratagem.effect, UNKNOWN);
    assert_eq!(stratagem.full_description, "Reduce AP by 1.");
    assert_eq!(faction.stratagems.len(), 1);
}

#[test]
fn detachment_abilities_create_detachments_once() {
    let mut catalog = catalog_with_units();
    let row = |id: &str, name: &str| {
        Record::from_pairs(&[
            ("id", id),
            ("faction_id", "TYR"),
            ("name", name),
            ("detachment", "Invasion Fleet"),
            ("description", "Rule text."),
        ])
    };
    let stats = apply_detachment_abilities(
        &mut catalog,
        vec![
            row("D1", "Hyper-adaptations"),
            row("D2", "Swarm Tactics"),
            row("D1", "Hyper-adaptations"),
        ],
    );
    assert_eq!(stats.applied, 2);
    assert_eq!(stats.duplicates, 1);

    let faction = catalog.faction("TYR").unwrap();
    assert_eq!(faction.detachments.len(), 1);
    assert_eq!(faction.detachments[0].abilities.len(), 2);
    assert_eq!(faction.detachment_abilities.len(), 2);
}
