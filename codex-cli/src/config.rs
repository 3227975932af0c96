//! Settings resolution.
//!
//! Priority: CLI flag > env var > config file > built-in default.

use std::fmt;
use std::path::{Path, PathBuf};

use codex_catalog::SUMMARY_FILE;

use crate::error::CliError;

pub(crate) const DEFAULT_SOURCE_DIR: &str = "warhammer-csvs";
pub(crate) const DEFAULT_OUTPUT_DIR: &str = "40kJsonData";

pub(crate) const SOURCE_DIR_VAR: &str = "CODEX_SOURCE_DIR";
pub(crate) const OUTPUT_DIR_VAR: &str = "CODEX_OUTPUT_DIR";

/// TOML config file format.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    paths: PathsConfig,
    #[serde(default)]
    output: OutputConfig,
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct PathsConfig {
    source_dir: Option<PathBuf>,
    output_dir: Option<PathBuf>,
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct OutputConfig {
    summary_file: Option<String>,
}

/// Where a setting's value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SettingSource {
    Flag,
    EnvVar(&'static str),
    ConfigFile,
    Default,
}

impl fmt::Display for SettingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag => write!(f, "command line"),
            Self::EnvVar(var) => write!(f, "env ${}", var),
            Self::ConfigFile => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Setting<T> {
    pub value: T,
    pub source: SettingSource,
}

impl<T> Setting<T> {
    fn pick(
        flag: Option<T>,
        env: Option<(T, &'static str)>,
        file: Option<T>,
        default: impl FnOnce() -> T,
    ) -> Self {
        if let Some(value) = flag {
            Self {
                value,
                source: SettingSource::Flag,
            }
        } else if let Some((value, var)) = env {
            Self {
                value,
                source: SettingSource::EnvVar(var),
            }
        } else if let Some(value) = file {
            Self {
                value,
                source: SettingSource::ConfigFile,
            }
        } else {
            Self {
                value: default(),
                source: SettingSource::Default,
            }
        }
    }
}

/// Values given on the command line.
#[derive(Debug, Clone, Default)]
pub(crate) struct Overrides {
    pub source_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub summary_file: Option<String>,
}

/// Effective settings of one invocation.
#[derive(Debug, Clone)]
pub(crate) struct Settings {
    pub source_dir: Setting<PathBuf>,
    pub output_dir: Setting<PathBuf>,
    pub summary_file: Setting<String>,
    /// The config file consulted, if any path could be determined.
    pub config_file: Option<PathBuf>,
}

/// Return the path to the default config file.
pub(crate) fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("codex-forge").join("config.toml"))
}

impl Settings {
    /// Resolve settings from the process environment and a config file.
    ///
    /// `explicit` is a `--config` path; it must exist. The default config
    /// file is optional.
    pub(crate) fn load(explicit: Option<&Path>, overrides: Overrides) -> Result<Self, CliError> {
        let (config_file, file) = match explicit {
            Some(path) => {
                if !path.is_file() {
                    return Err(CliError::config(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                (Some(path.to_path_buf()), read_config_file(path)?)
            }
            None => match config_path() {
                Some(path) if path.is_file() => {
                    let file = read_config_file(&path)?;
                    (Some(path), file)
                }
                other => (other, ConfigFile::default()),
            },
        };

        let mut settings = resolve(file, |var| std::env::var(var).ok(), overrides);
        settings.config_file = config_file;
        Ok(settings)
    }
}

fn read_config_file(path: &Path) -> Result<ConfigFile, CliError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
        .map_err(|e| CliError::config(format!("Invalid config file {}: {}", path.display(), e)))
}

fn parse_config(content: &str) -> Result<ConfigFile, toml::de::Error> {
    toml::from_str(content)
}

fn resolve(
    file: ConfigFile,
    env: impl Fn(&'static str) -> Option<String>,
    overrides: Overrides,
) -> Settings {
    let env_path = |var: &'static str| {
        env(var)
            .filter(|v| !v.trim().is_empty())
            .map(|v| (PathBuf::from(v), var))
    };

    Settings {
        source_dir: Setting::pick(
            overrides.source_dir,
            env_path(SOURCE_DIR_VAR),
            file.paths.source_dir,
            || PathBuf::from(DEFAULT_SOURCE_DIR),
        ),
        output_dir: Setting::pick(
            overrides.output_dir,
            env_path(OUTPUT_DIR_VAR),
            file.paths.output_dir,
            || PathBuf::from(DEFAULT_OUTPUT_DIR),
        ),
        summary_file: Setting::pick(overrides.summary_file, None, file.output.summary_file, || {
            SUMMARY_FILE.to_string()
        }),
        config_file: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn no_env(_: &'static str) -> Option<String> {
        None
    }

    #[test]
    fn defaults_apply_without_any_input() {
        let settings = resolve(ConfigFile::default(), no_env, Overrides::default());
        assert_eq!(settings.source_dir.value, PathBuf::from(DEFAULT_SOURCE_DIR));
        assert_eq!(settings.output_dir.value, PathBuf::from(DEFAULT_OUTPUT_DIR));
        assert_eq!(settings.summary_file.value, SUMMARY_FILE);
        assert_eq!(settings.source_dir.source, SettingSource::Default);
    }

    #[test]
    fn config_file_values_are_read() {
        let file = parse_config(
            r#"
            [paths]
            source_dir = "/data/csv"

            [output]
            summary_file = "index.json"
            "#,
        )
        .unwrap();
        let settings = resolve(file, no_env, Overrides::default());
        assert_eq!(settings.source_dir.value, PathBuf::from("/data/csv"));
        assert_eq!(settings.source_dir.source, SettingSource::ConfigFile);
        assert_eq!(settings.output_dir.source, SettingSource::Default);
        assert_eq!(settings.summary_file.value, "index.json");
    }

    #[test]
    fn env_beats_file_and_flag_beats_env() {
        let file = parse_config(
            r#"
            [paths]
            source_dir = "/from/file"
            output_dir = "/from/file/out"
            "#,
        )
        .unwrap();
        let env = |var: &'static str| match var {
            SOURCE_DIR_VAR => Some("/from/env".to_string()),
            OUTPUT_DIR_VAR => Some("/from/env/out".to_string()),
            _ => None,
        };
        let overrides = Overrides {
            output_dir: Some(PathBuf::from("/from/flag")),
            ..Default::default()
        };

        let settings = resolve(file, env, overrides);
        assert_eq!(settings.source_dir.value, PathBuf::from("/from/env"));
        assert_eq!(settings.source_dir.source, SettingSource::EnvVar(SOURCE_DIR_VAR));
        assert_eq!(settings.output_dir.value, PathBuf::from("/from/flag"));
        assert_eq!(settings.output_dir.source, SettingSource::Flag);
    }

    #[test]
    fn blank_env_value_is_ignored() {
        let env = |_: &'static str| Some("  ".to_string());
        let settings = resolve(ConfigFile::default(), env, Overrides::default());
        assert_eq!(settings.source_dir.source, SettingSource::Default);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(parse_config("[paths]\nsource = \"x\"\n").is_err());
    }

    #[test]
    fn explicit_config_file_must_exist() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("missing.toml");
        let err = Settings::load(Some(&missing), Overrides::default()).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn explicit_config_file_is_loaded() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("codex.toml");
        std::fs::write(&path, "[output]\nsummary_file = \"all.json\"\n").unwrap();

        let settings = Settings::load(Some(&path), Overrides::default()).unwrap();
        assert_eq!(settings.summary_file.value, "all.json");
        assert_eq!(settings.summary_file.source, SettingSource::ConfigFile);
        assert_eq!(settings.config_file.as_deref(), Some(path.as_path()));
    }
}
