use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::config::{Setting, Settings, config_path};
use crate::error::CliError;

/// Show effective settings and their sources.
pub(crate) fn run_config_show(settings: &Settings) {
    log::info!(
        "{}",
        "Codex Configuration".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("");

    match &settings.config_file {
        Some(p) if p.exists() => {
            log::info!(
                "  Config file: {} {}",
                p.display().if_supports_color(Stdout, |t| t.cyan()),
                "(exists)".if_supports_color(Stdout, |t| t.green()),
            );
        }
        Some(p) => {
            log::info!(
                "  Config file: {} {}",
                p.display().if_supports_color(Stdout, |t| t.cyan()),
                "(not found)".if_supports_color(Stdout, |t| t.dimmed()),
            );
        }
        None => {
            log::info!(
                "  Config file: {}",
                "could not determine path".if_supports_color(Stdout, |t| t.red()),
            );
        }
    }
    log::info!("");

    show_setting("source_dir", &settings.source_dir, |v| v.display().to_string());
    show_setting("output_dir", &settings.output_dir, |v| v.display().to_string());
    show_setting("summary_file", &settings.summary_file, |v| v.clone());
}

fn show_setting<T>(name: &str, setting: &Setting<T>, render: impl Fn(&T) -> String) {
    let source_str = format!("({})", setting.source);
    log::info!(
        "  {} {} {}",
        format!("{}:", name).if_supports_color(Stdout, |t| t.cyan()),
        render(&setting.value),
        source_str.if_supports_color(Stdout, |t| t.dimmed()),
    );
}

/// Print the config file path.
pub(crate) fn run_config_path(explicit: Option<&std::path::Path>) -> Result<(), CliError> {
    let path = explicit
        .map(|p| p.to_path_buf())
        .or_else(config_path)
        .ok_or_else(|| CliError::config("Could not determine config directory"))?;
    println!("{}", path.display());
    Ok(())
}
