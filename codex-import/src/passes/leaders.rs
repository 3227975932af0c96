use crate::error::LinkError;
use crate::graph::Catalog;
use crate::source::Record;
use crate::tables;

use super::PassStats;

/// Record which units each leader can join.
///
/// The leader's `leads` list receives a copy of the attached unit's id, name
/// and image. This is a display reference; the attached unit stays where it
/// is. Run after the datasheet pass so names and images are final.
pub fn apply_leaders(catalog: &mut Catalog, rows: impl IntoIterator<Item = Record>) -> PassStats {
    let table = tables::LEADERS.schema.table;
    let mut stats = PassStats::new(table);

    for record in rows {
        stats.rows += 1;
        let leader_id = record.get("leader_id");
        let attached_id = record.get("attached_id");
        if leader_id.is_empty() || attached_id.is_empty() {
            let field = if leader_id.is_empty() {
                "leader_id"
            } else {
                "attached_id"
            };
            stats.reject(&LinkError::empty(table, field), &record);
            continue;
        }

        let Some(entry) = catalog
            .find_unit(attached_id)
            .map(|(_, unit)| unit.as_ref_entry())
        else {
            stats.missing(&LinkError::missing(table, "attached_id", attached_id), &record);
            continue;
        };
        let Some(leader) = catalog.find_unit_mut(leader_id) else {
            stats.missing(&LinkError::missing(table, "leader_id", leader_id), &record);
            continue;
        };

        if leader.leads.iter().any(|r| r.id == entry.id) {
            stats.duplicates += 1;
            continue;
        }
        leader.leads.push(entry);
        stats.applied += 1;
    }

    stats
}
