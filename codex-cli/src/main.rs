//! codex CLI
//!
//! Command-line interface for compiling rules tables into faction documents.

mod cli_types;
mod commands;
mod config;
mod error;

use std::fs::File;
use std::io::{self, IsTerminal, Write};
use std::path::Path;

use clap::Parser;
use env_logger::{Target, WriteStyle};
use log::LevelFilter;

use cli_types::{Cli, Commands, ConfigAction, OutputArgs};
use config::{Overrides, Settings};
use error::CliError;

/// Log sink that writes to stderr and to a file with ANSI escapes removed.
struct TeeWriter {
    file: strip_ansi_escapes::Writer<File>,
}

impl Write for TeeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stderr().write_all(buf)?;
        self.file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()?;
        self.file.flush()
    }
}

fn init_logging(quiet: bool, verbose: bool, logfile: Option<&Path>) -> Result<(), CliError> {
    let level = if verbose {
        LevelFilter::Debug
    } else if quiet {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    };

    let mut builder = env_logger::Builder::new();
    builder.filter_level(level).parse_default_env();

    if verbose {
        builder.format_timestamp_millis();
    } else {
        builder.format(|buf, record| match record.level() {
            log::Level::Info => writeln!(buf, "{}", record.args()),
            level => writeln!(buf, "{}: {}", level, record.args()),
        });
    }

    if let Some(path) = logfile {
        let file = File::create(path).map_err(|e| {
            CliError::other(format!("Cannot create log file {}: {}", path.display(), e))
        })?;
        let style = if io::stderr().is_terminal() {
            WriteStyle::Always
        } else {
            WriteStyle::Never
        };
        builder
            .target(Target::Pipe(Box::new(TeeWriter {
                file: strip_ansi_escapes::Writer::new(file),
            })))
            .write_style(style);
    }

    builder
        .try_init()
        .map_err(|e| CliError::other(format!("Cannot initialize logging: {}", e)))
}

fn load_settings(
    config: Option<&Path>,
    source: Option<std::path::PathBuf>,
    output: OutputArgs,
) -> Result<Settings, CliError> {
    Settings::load(
        config,
        Overrides {
            source_dir: source,
            output_dir: output.output,
            summary_file: output.summary_file,
        },
    )
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = cli.config.as_deref();
    match cli.command {
        Commands::Compile {
            source,
            output,
            no_preserve,
            dry_run,
        } => {
            let settings = load_settings(config, source, output)?;
            commands::compile::run_compile(&settings, no_preserve, dry_run, cli.quiet)
        }
        Commands::Factions { output } => {
            let settings = load_settings(config, None, output)?;
            commands::factions::run_factions(&settings)
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => {
                let settings = load_settings(config, None, OutputArgs::default())?;
                commands::config::run_config_show(&settings);
                Ok(())
            }
            ConfigAction::Path => commands::config::run_config_path(config),
        },
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.quiet, cli.verbose, cli.logfile.as_deref()) {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(cli) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
