use crate::graph::Catalog;
use crate::source::Record;
use crate::tables;
use crate::text::{WeaponColumns, normalize, parse_weapon_text};

use super::{PassStats, unit_for};

/// Parse wargear rows into weapons and file each under ranged or melee.
pub fn apply_wargear(catalog: &mut Catalog, rows: impl IntoIterator<Item = Record>) -> PassStats {
    let table = tables::WARGEAR.schema.table;
    let mut stats = PassStats::new(table);

    for record in rows {
        stats.rows += 1;
        let Some(unit) = unit_for(catalog, table, "datasheet_id", &record, &mut stats) else {
            continue;
        };

        let columns = WeaponColumns {
            range: record.get("range"),
            weapon_type: record.get("type"),
            attacks: record.get("A"),
            skill: record.get("BS_WS"),
            strength: record.get("S"),
            ap: record.get("AP"),
            damage: record.get("D"),
        };
        let description = normalize(record.get("description"));
        let weapon = parse_weapon_text(&normalize(record.get("name")), &description, &columns);

        log::debug!(
            "{}: {} → {} ({})",
            table,
            unit.id,
            weapon.name,
            if weapon.is_melee() { "melee" } else { "ranged" }
        );
        unit.add_weapon(weapon);
        stats.applied += 1;
    }

    stats
}
