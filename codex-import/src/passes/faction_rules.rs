//! Faction-scoped rules: stratagems and detachment abilities.
//!
//! Both are keyed by faction and grouped by detachment name. Detachments are
//! created the first time a row names them. Each entry is owned by its
//! detachment and mirrored into the faction's flat list.

use codex_catalog::{DetachmentAbility, Faction, Stratagem};

use crate::error::LinkError;
use crate::graph::Catalog;
use crate::source::Record;
use crate::tables;
use crate::text::{normalize, split_stratagem};

use super::PassStats;

/// Resolve the faction and detachment name of a faction-scoped row.
fn faction_for<'c>(
    catalog: &'c mut Catalog,
    table: &'static str,
    record: &Record,
    stats: &mut PassStats,
) -> Option<(&'c mut Faction, String)> {
    let faction_id = record.get("faction_id");
    if faction_id.is_empty() {
        stats.missing(&LinkError::missing(table, "faction_id", faction_id), record);
        return None;
    }
    let detachment = normalize(record.get("detachment"));
    if detachment.is_empty() {
        stats.reject(&LinkError::empty(table, "detachment"), record);
        return None;
    }
    match catalog.faction_mut(faction_id) {
        Some(faction) => Some((faction, detachment)),
        None => {
            stats.missing(&LinkError::missing(table, "faction_id", faction_id), record);
            None
        }
    }
}

pub fn apply_stratagems(catalog: &mut Catalog, rows: impl IntoIterator<Item = Record>) -> PassStats {
    let table = tables::STRATAGEMS.schema.table;
    let mut stats = PassStats::new(table);

    for record in rows {
        stats.rows += 1;
        let Some((faction, detachment_name)) = faction_for(catalog, table, &record, &mut stats)
        else {
            continue;
        };

        let sections = split_stratagem(record.get("description"));
        let stratagem = Stratagem {
            id: record.get("id").to_string(),
            name: normalize(record.get("name")),
            stratagem_type: normalize(record.get("type")),
            cp_cost: record.get("cp_cost").to_string(),
            legend: normalize(record.get("legend")),
            turn: record.get("turn").to_string(),
            phase: record.get("phase").to_string(),
            when: sections.when,
            target: sections.target,
            effect: sections.effect,
            full_description: sections.full_description,
        };

        let detachment = faction.detachment_mut(&detachment_name);
        if detachment.stratagems.contains(&stratagem) {
            stats.duplicates += 1;
            continue;
        }
        detachment.stratagems.push(stratagem.clone());
        faction.stratagems.push(stratagem);
        stats.applied += 1;
    }

    stats
}

pub fn apply_detachment_abilities(
    catalog: &mut Catalog,
    rows: impl IntoIterator<Item = Record>,
) -> PassStats {
    let table = tables::DETACHMENT_ABILITIES.schema.table;
    let mut stats = PassStats::new(table);

    for record in rows {
        stats.rows += 1;
        let Some((faction, detachment_name)) = faction_for(catalog, table, &record, &mut stats)
        else {
            continue;
        };

        let ability = DetachmentAbility {
            id: record.get("id").to_string(),
            name: normalize(record.get("name")),
            legend: normalize(record.get("legend")),
            description: normalize(record.get("description")),
        };

        let detachment = faction.detachment_mut(&detachment_name);
        if detachment.abilities.contains(&ability) {
            stats.duplicates += 1;
            continue;
        }
        detachment.abilities.push(ability.clone());
        faction.detachment_abilities.push(ability);
        stats.applied += 1;
    }

    stats
}
