//! Orchestration of a compile run.
//!
//! The run is strictly linear: seed the faction registry, load images from
//! the previous output, materialize units, run the enrichment passes, write.
//! The faction and datasheet tables are required; every other table is
//! optional and its absence only empties the matching collections.

use std::path::{Path, PathBuf};

use codex_catalog::{SUMMARY_FILE, WriteReport, write_catalog};

use crate::error::CompileError;
use crate::graph::Catalog;
use crate::passes::{self, AbilityCatalog, PassStats};
use crate::preserve::ImageIndex;
use crate::progress::{CompileProgress, LogProgress};
use crate::source::{SourceRows, read_raw_rows};
use crate::tables::{self, SourceTable};

/// Inputs and switches of one run.
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Directory holding the source tables.
    pub source_dir: PathBuf,
    /// Directory documents are written to and images are recovered from.
    pub output_dir: PathBuf,
    pub summary_file: String,
    /// Recover images from documents already in `output_dir`.
    pub preserve_images: bool,
    /// Compile without writing.
    pub dry_run: bool,
}

impl CompileOptions {
    pub fn new(source_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            output_dir: output_dir.into(),
            summary_file: SUMMARY_FILE.to_string(),
            preserve_images: true,
            dry_run: false,
        }
    }
}

/// What a run did.
#[derive(Debug, Default)]
pub struct CompileReport {
    /// Per-pass counters, in execution order.
    pub passes: Vec<PassStats>,
    pub factions: usize,
    pub units: usize,
    pub images_recovered: usize,
    /// `None` on a dry run.
    pub written: Option<WriteReport>,
}

impl CompileReport {
    pub fn pass(&self, table: &str) -> Option<&PassStats> {
        self.passes.iter().find(|p| p.table == table)
    }

    /// Tables whose source could not be read.
    pub fn unavailable_sources(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.passes
            .iter()
            .filter(|p| p.source_unavailable)
            .map(|p| p.table)
    }
}

/// Compile the source tables and write the documents.
///
/// Without a `progress` reporter, phases and pass summaries go to the log
/// through [`LogProgress`].
pub fn compile(
    options: &CompileOptions,
    progress: Option<&dyn CompileProgress>,
) -> Result<CompileReport, CompileError> {
    let progress = progress.unwrap_or(&LogProgress);
    let (catalog, mut report) = build_catalog(options, Some(progress))?;

    if options.dry_run {
        progress.on_complete(&format!(
            "Dry run: {} faction(s), {} unit(s) compiled; nothing written",
            report.factions, report.units
        ));
        return Ok(report);
    }

    progress.on_phase(&format!(
        "Writing documents to {}",
        options.output_dir.display()
    ));
    let written = write_catalog(
        &options.output_dir,
        catalog.factions(),
        &options.summary_file,
    )?;
    progress.on_complete(&format!(
        "Wrote {} faction document(s) and {}",
        written.faction_documents.len(),
        written.summary_document.display()
    ));
    report.written = Some(written);

    Ok(report)
}

/// Run every phase up to, but not including, writing.
pub fn build_catalog(
    options: &CompileOptions,
    progress: Option<&dyn CompileProgress>,
) -> Result<(Catalog, CompileReport), CompileError> {
    let progress = progress.unwrap_or(&LogProgress);
    let dir = options.source_dir.as_path();
    let mut catalog = Catalog::new();
    let mut report = CompileReport::default();

    progress.on_phase("Seeding faction registry");
    let stats = required_pass(dir, tables::FACTIONS, |rows| {
        passes::apply_factions(&mut catalog, rows)
    })?;
    record(&mut report, progress, stats);

    let images = if options.preserve_images {
        progress.on_phase("Recovering unit images from previous output");
        ImageIndex::load(&options.output_dir, &options.summary_file)
    } else {
        ImageIndex::new()
    };
    report.images_recovered = images.len();

    progress.on_phase("Materializing units");
    let stats = required_pass(dir, tables::DATASHEETS, |rows| {
        passes::apply_datasheets(&mut catalog, rows, &images)
    })?;
    record(&mut report, progress, stats);

    progress.on_phase("Enriching units");
    let stats = profile_pass(dir, &mut catalog);
    record(&mut report, progress, stats);

    let stats = optional_pass(dir, tables::WARGEAR, |rows| {
        passes::apply_wargear(&mut catalog, rows)
    });
    record(&mut report, progress, stats);

    let mut reference = AbilityCatalog::default();
    let stats = optional_pass(dir, tables::ABILITY_CATALOG, |rows| {
        let (loaded, stats) = passes::load_ability_catalog(rows);
        reference = loaded;
        stats
    });
    record(&mut report, progress, stats);

    let stats = optional_pass(dir, tables::ABILITIES, |rows| {
        passes::apply_abilities(&mut catalog, rows, &reference)
    });
    record(&mut report, progress, stats);

    let stats = optional_pass(dir, tables::KEYWORDS, |rows| {
        passes::apply_keywords(&mut catalog, rows)
    });
    record(&mut report, progress, stats);

    let stats = optional_pass(dir, tables::OPTIONS, |rows| {
        passes::apply_options(&mut catalog, rows)
    });
    record(&mut report, progress, stats);

    let stats = optional_pass(dir, tables::COMPOSITIONS, |rows| {
        passes::apply_compositions(&mut catalog, rows)
    });
    record(&mut report, progress, stats);

    let stats = optional_pass(dir, tables::COSTS, |rows| {
        passes::apply_costs(&mut catalog, rows)
    });
    record(&mut report, progress, stats);

    progress.on_phase("Collecting faction rules");
    let stats = optional_pass(dir, tables::STRATAGEMS, |rows| {
        passes::apply_stratagems(&mut catalog, rows)
    });
    record(&mut report, progress, stats);

    let stats = optional_pass(dir, tables::DETACHMENT_ABILITIES, |rows| {
        passes::apply_detachment_abilities(&mut catalog, rows)
    });
    record(&mut report, progress, stats);

    // Leader references copy names and images, so this runs last.
    progress.on_phase("Linking leaders");
    let stats = optional_pass(dir, tables::LEADERS, |rows| {
        passes::apply_leaders(&mut catalog, rows)
    });
    record(&mut report, progress, stats);

    report.factions = catalog.faction_count();
    report.units = catalog.unit_count();
    Ok((catalog, report))
}

fn required_pass(
    dir: &Path,
    source: SourceTable,
    pass: impl FnOnce(&mut SourceRows) -> PassStats,
) -> Result<PassStats, CompileError> {
    let mut rows = SourceRows::open(&dir.join(source.file_name), source.schema)?;
    let mut stats = pass(&mut rows);
    stats.malformed += rows.malformed();
    Ok(stats)
}

fn optional_pass(
    dir: &Path,
    source: SourceTable,
    pass: impl FnOnce(&mut SourceRows) -> PassStats,
) -> PassStats {
    match SourceRows::open(&dir.join(source.file_name), source.schema) {
        Ok(mut rows) => {
            let mut stats = pass(&mut rows);
            stats.malformed += rows.malformed();
            stats
        }
        Err(e) => {
            log::warn!("{e}; continuing without {}", source.schema.table);
            PassStats::unavailable(source.schema.table)
        }
    }
}

/// Profiles are read with the raw-buffer strategy.
fn profile_pass(dir: &Path, catalog: &mut Catalog) -> PassStats {
    let source = tables::MODELS;
    match read_raw_rows(
        &dir.join(source.file_name),
        source.schema,
        tables::MODELS_ROW_SEPARATOR,
    ) {
        Ok(mut rows) => {
            let mut stats = passes::apply_profiles(catalog, &mut rows);
            stats.malformed += rows.malformed();
            stats
        }
        Err(e) => {
            log::warn!("{e}; continuing without {}", source.schema.table);
            PassStats::unavailable(source.schema.table)
        }
    }
}

fn record(report: &mut CompileReport, progress: &dyn CompileProgress, stats: PassStats) {
    progress.on_pass(&stats);
    report.passes.push(stats);
}
