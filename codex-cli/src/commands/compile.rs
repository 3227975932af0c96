use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use codex_import::{CompileOptions, CompileProgress, CompileReport, PassStats};

use crate::config::Settings;
use crate::error::CliError;

/// Spinner showing the current phase; pass summaries are logged above it.
struct SpinnerProgress {
    pb: ProgressBar,
}

impl SpinnerProgress {
    fn new(quiet: bool) -> Self {
        let pb = ProgressBar::new_spinner();
        if quiet {
            pb.set_draw_target(ProgressDrawTarget::hidden());
        }
        let style = ProgressStyle::with_template("  {spinner:.cyan} {msg}")
            .map(|s| s.tick_chars("/-\\|"))
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        pb.set_style(style);
        pb.enable_steady_tick(Duration::from_millis(100));
        Self { pb }
    }

    fn finish(&self) {
        self.pb.disable_steady_tick();
        self.pb.finish_and_clear();
    }
}

impl CompileProgress for SpinnerProgress {
    fn on_phase(&self, message: &str) {
        self.pb.set_message(message.to_string());
        self.pb.suspend(|| log::debug!("{}", message));
    }

    fn on_pass(&self, stats: &PassStats) {
        self.pb.suspend(|| stats.log_summary());
    }

    fn on_complete(&self, message: &str) {
        self.finish();
        log::debug!("{}", message);
    }
}

/// Run the compile pipeline and print a per-pass report.
pub(crate) fn run_compile(
    settings: &Settings,
    no_preserve: bool,
    dry_run: bool,
    quiet: bool,
) -> Result<(), CliError> {
    let options = CompileOptions {
        source_dir: settings.source_dir.value.clone(),
        output_dir: settings.output_dir.value.clone(),
        summary_file: settings.summary_file.value.clone(),
        preserve_images: !no_preserve,
        dry_run,
    };

    if !options.source_dir.is_dir() {
        return Err(CliError::other(format!(
            "Source directory not found: {} (set with --source or ${})",
            options.source_dir.display(),
            crate::config::SOURCE_DIR_VAR,
        )));
    }

    log::info!(
        "{} {} {} {}",
        "Compiling".if_supports_color(Stdout, |t| t.bold()),
        options
            .source_dir
            .display()
            .if_supports_color(Stdout, |t| t.cyan()),
        "->".if_supports_color(Stdout, |t| t.dimmed()),
        options
            .output_dir
            .display()
            .if_supports_color(Stdout, |t| t.cyan()),
    );
    if no_preserve {
        log::info!(
            "  {}",
            "Image preservation disabled".if_supports_color(Stdout, |t| t.yellow()),
        );
    }

    let progress = SpinnerProgress::new(quiet);
    let result = codex_import::compile(&options, Some(&progress));
    progress.finish();
    let report = result?;

    print_report(&report);
    Ok(())
}

fn print_report(report: &CompileReport) {
    log::info!("");
    log::info!("{}", "Passes:".if_supports_color(Stdout, |t| t.bold()));
    for stats in &report.passes {
        if stats.source_unavailable {
            log::info!(
                "  {:<30} {}",
                stats.table,
                "source unavailable".if_supports_color(Stdout, |t| t.yellow()),
            );
            continue;
        }
        let skipped = stats.skipped();
        let skipped_str = format!("{} skipped", skipped);
        log::info!(
            "  {:<30} {:>6} rows  {:>6} applied  {}",
            stats.table,
            stats.rows,
            stats.applied,
            if skipped == 0 {
                format!("{}", skipped_str.if_supports_color(Stdout, |t| t.dimmed()))
            } else {
                format!("{}", skipped_str.if_supports_color(Stdout, |t| t.yellow()))
            },
        );
    }

    log::info!("");
    log::info!(
        "{} {} faction(s), {} unit(s), {} image(s) recovered",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        report.factions,
        report.units,
        report.images_recovered,
    );
    match &report.written {
        Some(written) => {
            for path in &written.faction_documents {
                log::debug!("  wrote {}", path.display());
            }
            log::info!(
                "  Wrote {} document(s) and {}",
                written.faction_documents.len(),
                written
                    .summary_document
                    .display()
                    .if_supports_color(Stdout, |t| t.cyan()),
            );
        }
        None => log::info!(
            "  {}",
            "Dry run: nothing written".if_supports_color(Stdout, |t| t.dimmed()),
        ),
    }
}
