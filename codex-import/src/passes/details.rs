//! Keywords, wargear options, unit composition and points costs.

use codex_catalog::{Composition, Cost, UnitOption};

use crate::error::LinkError;
use crate::graph::Catalog;
use crate::source::Record;
use crate::tables;
use crate::text::normalize;

use super::{PassStats, unit_for};

/// File keywords under faction or other. A keyword already on the unit's
/// list is counted as a duplicate; multi-model datasheets repeat them.
pub fn apply_keywords(catalog: &mut Catalog, rows: impl IntoIterator<Item = Record>) -> PassStats {
    let table = tables::KEYWORDS.schema.table;
    let mut stats = PassStats::new(table);

    for record in rows {
        stats.rows += 1;
        let keyword = normalize(record.get("keyword"));
        if keyword.is_empty() {
            stats.reject(&LinkError::empty(table, "keyword"), &record);
            continue;
        }
        let Some(unit) = unit_for(catalog, table, "datasheet_id", &record, &mut stats) else {
            continue;
        };

        let is_faction = record
            .get("is_faction_keyword")
            .eq_ignore_ascii_case("true");
        if unit.keywords.insert(&keyword, is_faction) {
            stats.applied += 1;
        } else {
            stats.duplicates += 1;
        }
    }

    stats
}

pub fn apply_options(catalog: &mut Catalog, rows: impl IntoIterator<Item = Record>) -> PassStats {
    let table = tables::OPTIONS.schema.table;
    let mut stats = PassStats::new(table);

    for record in rows {
        stats.rows += 1;
        let Some(unit) = unit_for(catalog, table, "datasheet_id", &record, &mut stats) else {
            continue;
        };
        unit.options.push(UnitOption {
            line: record.get("line").to_string(),
            button: normalize(record.get("button")),
            description: normalize(record.get("description")),
        });
        stats.applied += 1;
    }

    stats
}

pub fn apply_compositions(
    catalog: &mut Catalog,
    rows: impl IntoIterator<Item = Record>,
) -> PassStats {
    let table = tables::COMPOSITIONS.schema.table;
    let mut stats = PassStats::new(table);

    for record in rows {
        stats.rows += 1;
        let Some(unit) = unit_for(catalog, table, "datasheet_id", &record, &mut stats) else {
            continue;
        };
        unit.compositions.push(Composition {
            line: record.get("line").to_string(),
            description: normalize(record.get("description")),
        });
        stats.applied += 1;
    }

    stats
}

pub fn apply_costs(catalog: &mut Catalog, rows: impl IntoIterator<Item = Record>) -> PassStats {
    let table = tables::COSTS.schema.table;
    let mut stats = PassStats::new(table);

    for record in rows {
        stats.rows += 1;
        let Some(unit) = unit_for(catalog, table, "datasheet_id", &record, &mut stats) else {
            continue;
        };
        unit.costs.push(Cost {
            line: record.get("line").to_string(),
            description: normalize(record.get("description")),
            cost: record.get("cost").to_string(),
        });
        stats.applied += 1;
    }

    stats
}
