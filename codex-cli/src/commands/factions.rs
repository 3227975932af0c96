use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use codex_catalog::{document_file_name, load_summary};

use crate::config::Settings;
use crate::error::CliError;

/// List the factions in the summary document.
pub(crate) fn run_factions(settings: &Settings) -> Result<(), CliError> {
    let dir = &settings.output_dir.value;
    let summary_path = dir.join(&settings.summary_file.value);
    if !summary_path.exists() {
        log::info!(
            "{}",
            format!("No summary document at {}.", summary_path.display())
                .if_supports_color(Stdout, |t| t.dimmed()),
        );
        log::info!("Run 'codex compile' first.");
        return Ok(());
    }

    let mut factions = load_summary(dir, &settings.summary_file.value)?;
    factions.sort_by(|a, b| a.name.cmp(&b.name));

    log::info!("{}", "Factions:".if_supports_color(Stdout, |t| t.bold()));
    log::info!("");
    for faction in &factions {
        let document = document_file_name(&faction.name);
        let present = dir.join(&document).exists();
        log::info!(
            "  {:<8} {} [{}]{}",
            faction.id.if_supports_color(Stdout, |t| t.bold()),
            faction.name,
            document.if_supports_color(Stdout, |t| t.cyan()),
            if present {
                String::new()
            } else {
                format!(" {}", "(missing)".if_supports_color(Stdout, |t| t.red()))
            },
        );
    }
    log::info!("");
    log::info!("Total: {} faction(s)", factions.len());
    Ok(())
}
