//! Datasheet abilities and the shared ability reference table.
//!
//! Core and faction abilities are usually listed on a datasheet by
//! `ability_id` only; their name and text live in the reference table.

use std::collections::HashMap;

use codex_catalog::{Ability, AbilityType};

use crate::error::LinkError;
use crate::graph::Catalog;
use crate::source::Record;
use crate::tables;
use crate::text::normalize;

use super::{PassStats, unit_for};

/// An entry of the ability reference table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceAbility {
    pub name: String,
    pub legend: String,
    pub description: String,
}

/// Ability id → reference entry.
#[derive(Debug, Clone, Default)]
pub struct AbilityCatalog {
    entries: HashMap<String, ReferenceAbility>,
}

impl AbilityCatalog {
    pub fn get(&self, id: &str) -> Option<&ReferenceAbility> {
        self.entries.get(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Build the ability reference table.
pub fn load_ability_catalog(rows: impl IntoIterator<Item = Record>) -> (AbilityCatalog, PassStats) {
    let table = tables::ABILITY_CATALOG.schema.table;
    let mut stats = PassStats::new(table);
    let mut catalog = AbilityCatalog::default();

    for record in rows {
        stats.rows += 1;
        let id = record.get("id");
        if id.is_empty() {
            stats.reject(&LinkError::empty(table, "id"), &record);
            continue;
        }
        let entry = ReferenceAbility {
            name: normalize(record.get("name")),
            legend: normalize(record.get("legend")),
            description: normalize(record.get("description")),
        };
        if catalog.entries.insert(id.to_string(), entry).is_some() {
            stats.duplicates += 1;
        } else {
            stats.applied += 1;
        }
    }

    (catalog, stats)
}

/// Attach abilities to units, grouped by type.
///
/// An ability identical in name, description and line to one already filed
/// under the same type on the same unit is dropped.
pub fn apply_abilities(
    catalog: &mut Catalog,
    rows: impl IntoIterator<Item = Record>,
    reference: &AbilityCatalog,
) -> PassStats {
    let table = tables::ABILITIES.schema.table;
    let mut stats = PassStats::new(table);

    for record in rows {
        stats.rows += 1;
        let Some(unit) = unit_for(catalog, table, "datasheet_id", &record, &mut stats) else {
            continue;
        };

        let label = record.get("type");
        let kind = AbilityType::from_label(label).unwrap_or_else(|| {
            log::debug!("{table}: unrecognized ability type '{label}', filing as datasheet");
            AbilityType::Datasheet
        });

        let ability_id = record.get("ability_id");
        let shared = (!ability_id.is_empty())
            .then(|| reference.get(ability_id))
            .flatten();
        if shared.is_none() && !ability_id.is_empty() && !reference.is_empty() {
            log::debug!("{table}: ability id '{ability_id}' not in reference table");
        }

        let mut name = normalize(record.get("name"));
        let mut description = normalize(record.get("description"));
        if let Some(shared) = shared {
            if name.is_empty() {
                name = shared.name.clone();
            }
            if description.is_empty() {
                description = shared.description.clone();
            }
        }

        let ability = Ability {
            datasheet_id: unit.id.clone(),
            line: record.get("line").to_string(),
            ability_id: ability_id.to_string(),
            name,
            description,
            ability_type: kind.as_str().to_string(),
            parameter: record.get("parameter").to_string(),
        };

        if unit.abilities.insert(kind, ability) {
            stats.applied += 1;
        } else {
            stats.duplicates += 1;
        }
    }

    stats
}
