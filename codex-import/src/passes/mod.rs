//! Enrichment passes, one per source table.
//!
//! Every pass takes the shared [`Catalog`](crate::graph::Catalog) by mutable
//! reference plus an iterator of records, resolves each row's foreign key and
//! merges the row into the referenced entity. Rows that cannot be linked are
//! logged and counted; no pass ever fails as a whole.
//!
//! Only the datasheet pass creates units, completing any placeholder made
//! through [`Catalog::ensure_unit`](crate::graph::Catalog::ensure_unit).
//! Enrichment rows carry no owning faction, so they resolve through
//! [`Catalog::find_unit_mut`](crate::graph::Catalog::find_unit_mut) and an
//! unknown datasheet id is counted under `missing_key` instead of creating
//! a placeholder.

pub mod abilities;
pub mod details;
pub mod faction_rules;
pub mod leaders;
pub mod units;
pub mod wargear;

pub use abilities::{AbilityCatalog, apply_abilities, load_ability_catalog};
pub use details::{apply_compositions, apply_costs, apply_keywords, apply_options};
pub use faction_rules::{apply_detachment_abilities, apply_stratagems};
pub use leaders::apply_leaders;
pub use units::{apply_datasheets, apply_factions, apply_profiles};
pub use wargear::apply_wargear;

use crate::error::LinkError;
use crate::graph::Catalog;
use crate::source::Record;

use codex_catalog::Unit;

/// Outcome counters of one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassStats {
    pub table: &'static str,
    /// Rows handed to the pass.
    pub rows: usize,
    /// Rows merged into an entity.
    pub applied: usize,
    /// Rows whose foreign key resolved to nothing.
    pub missing_key: usize,
    /// Rows dropped for missing or inconsistent values, including rows the
    /// reader rejected.
    pub malformed: usize,
    /// Rows suppressed because an identical entry already existed.
    pub duplicates: usize,
    /// The source could not be read; the pass did not run.
    pub source_unavailable: bool,
}

impl PassStats {
    pub fn new(table: &'static str) -> Self {
        Self {
            table,
            ..Default::default()
        }
    }

    /// Stats for a pass whose source could not be read.
    pub fn unavailable(table: &'static str) -> Self {
        Self {
            table,
            source_unavailable: true,
            ..Default::default()
        }
    }

    /// Count and log a row whose key did not resolve.
    pub(crate) fn missing(&mut self, err: &LinkError, record: &Record) {
        log::warn!("{err} (line {}); row skipped", record.line());
        self.missing_key += 1;
    }

    /// Count and log a row with unusable values.
    pub(crate) fn reject(&mut self, err: &LinkError, record: &Record) {
        log::warn!("{err} (line {}); row skipped", record.line());
        self.malformed += 1;
    }

    /// Count and log a link failure, filed by kind.
    pub(crate) fn link_failed(&mut self, err: &LinkError, record: &Record) {
        match err {
            LinkError::MissingForeignKey { .. } => self.missing(err, record),
            _ => self.reject(err, record),
        }
    }

    /// Rows that did not make it into the graph.
    pub fn skipped(&self) -> usize {
        self.missing_key + self.malformed + self.duplicates
    }

    pub fn log_summary(&self) {
        if self.source_unavailable {
            log::warn!("{}: source unavailable, pass skipped", self.table);
            return;
        }
        log::info!(
            "{}: {} row(s), {} applied, {} unknown key, {} malformed, {} duplicate",
            self.table,
            self.rows,
            self.applied,
            self.missing_key,
            self.malformed,
            self.duplicates
        );
    }
}

/// Resolve the unit a unit-scoped row refers to through `field`.
fn unit_for<'c>(
    catalog: &'c mut Catalog,
    table: &'static str,
    field: &'static str,
    record: &Record,
    stats: &mut PassStats,
) -> Option<&'c mut Unit> {
    let id = record.get(field);
    if id.is_empty() {
        stats.reject(&LinkError::empty(table, field), record);
        return None;
    }
    match catalog.find_unit_mut(id) {
        Some(unit) => Some(unit),
        None => {
            stats.missing(&LinkError::missing(table, field, id), record);
            None
        }
    }
}
