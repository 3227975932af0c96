//! Faction registry seeding, unit materialization and model profiles.

use codex_catalog::Profile;

use crate::error::LinkError;
use crate::graph::Catalog;
use crate::preserve::ImageIndex;
use crate::source::Record;
use crate::tables;
use crate::text::normalize;

use super::{PassStats, unit_for};

/// Seed the registry from the faction table.
pub fn apply_factions(catalog: &mut Catalog, rows: impl IntoIterator<Item = Record>) -> PassStats {
    let mut stats = PassStats::new(tables::FACTIONS.schema.table);

    for record in rows {
        stats.rows += 1;
        match catalog.initialize_faction(record.get("id"), record.get("name")) {
            Ok(_) => stats.applied += 1,
            Err(e) => stats.reject(&e, &record),
        }
    }

    stats
}

/// Create or update one unit per datasheet row.
///
/// A unit that already exists (for instance a placeholder created earlier)
/// keeps its collections; only its scalar fields are overwritten. The image
/// comes from `images` unless the unit already carries one.
pub fn apply_datasheets(
    catalog: &mut Catalog,
    rows: impl IntoIterator<Item = Record>,
    images: &ImageIndex,
) -> PassStats {
    let table = tables::DATASHEETS.schema.table;
    let mut stats = PassStats::new(table);

    for record in rows {
        stats.rows += 1;

        let id = record.get("id");
        let faction_id = record.get("faction_id");
        let name = record.get("name");
        let empty = [("id", id), ("faction_id", faction_id), ("name", name)]
            .into_iter()
            .find(|(_, v)| v.is_empty());
        if let Some((field, _)) = empty {
            stats.reject(&LinkError::empty(table, field), &record);
            continue;
        }
        if catalog.faction(faction_id).is_none() {
            stats.missing(&LinkError::missing(table, "faction_id", faction_id), &record);
            continue;
        }

        let unit = match catalog.ensure_unit(faction_id, id) {
            Ok(unit) => unit,
            Err(e) => {
                stats.link_failed(&e, &record);
                continue;
            }
        };

        unit.name = name.to_string();
        unit.role = record.get("role").to_string();
        unit.loadout = normalize(record.get("loadout"));
        unit.transport = normalize(record.get("transport"));
        unit.damaged_w = record.get("damaged_w").to_string();
        unit.damaged_description = normalize(record.get("damaged_description"));
        unit.image = images.resolve(id, "", &unit.image);

        stats.applied += 1;
    }

    stats
}

/// Attach model profiles. A row whose name cell lists several `\n`-separated
/// names yields one profile per name, all sharing the row's stats.
pub fn apply_profiles(catalog: &mut Catalog, rows: impl IntoIterator<Item = Record>) -> PassStats {
    let table = tables::MODELS.schema.table;
    let mut stats = PassStats::new(table);

    for record in rows {
        stats.rows += 1;
        let Some(unit) = unit_for(catalog, table, "datasheet_id", &record, &mut stats) else {
            continue;
        };

        let mut names: Vec<&str> = record
            .get("name")
            .split('\n')
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .collect();
        if names.is_empty() {
            names.push("");
        }

        for name in names {
            unit.profiles.push(Profile {
                name: name.to_string(),
                movement: record.get("M").to_string(),
                toughness: record.get("T").to_string(),
                save: record.get("Sv").to_string(),
                invulnerable_save: record.get("inv_sv").to_string(),
                invulnerable_description: normalize(record.get("inv_sv_descr")),
                wounds: record.get("W").to_string(),
                leadership: record.get("Ld").to_string(),
                objective_control: record.get("OC").to_string(),
                base_size: record.get("base_size").to_string(),
                base_size_description: normalize(record.get("base_size_descr")),
            });
        }
        stats.applied += 1;
    }

    stats
}
