//! JSON document I/O for compiled catalogs.
//!
//! Each faction is written to its own document named after the faction, and a
//! summary document lists every faction's `{id, name}`. The same directory is
//! read back on the next run to recover curator-owned fields.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::types::{Faction, FactionSummary};

/// Default file name of the summary document.
pub const SUMMARY_FILE: &str = "factions.json";

#[derive(Debug, Error)]
pub enum JsonError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("JSON error in {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
    #[error("Not a directory: {0}")]
    DirNotFound(String),
    #[error("{first} and {second} would both be written to {file}")]
    DocumentCollision {
        file: String,
        first: String,
        second: String,
    },
}

/// Paths written by [`write_catalog`].
#[derive(Debug, Default)]
pub struct WriteReport {
    pub faction_documents: Vec<PathBuf>,
    pub summary_document: PathBuf,
}

/// File name of a faction's document: the faction name with all whitespace
/// removed, plus `.json`.
pub fn document_file_name(faction_name: &str) -> String {
    let stem: String = faction_name.chars().filter(|c| !c.is_whitespace()).collect();
    format!("{stem}.json")
}

/// Write one document per faction plus the summary document.
///
/// Creates `dir` if it does not exist. Fails before writing anything when
/// two documents, or a document and the summary, share a file name.
pub fn write_catalog(
    dir: &Path,
    factions: &[Faction],
    summary_file: &str,
) -> Result<WriteReport, JsonError> {
    let file_names = document_file_names(factions, summary_file)?;

    std::fs::create_dir_all(dir).map_err(|e| JsonError::Io {
        path: dir.display().to_string(),
        source: e,
    })?;

    let mut report = WriteReport::default();
    for (faction, file_name) in factions.iter().zip(file_names) {
        let path = dir.join(file_name);
        write_document(&path, faction)?;
        report.faction_documents.push(path);
    }

    let summary: Vec<FactionSummary> = factions.iter().map(Faction::summary).collect();
    let summary_path = dir.join(summary_file);
    write_document(&summary_path, &summary)?;
    report.summary_document = summary_path;

    Ok(report)
}

fn document_file_names(factions: &[Faction], summary_file: &str) -> Result<Vec<String>, JsonError> {
    let mut owners: HashMap<String, String> = HashMap::new();
    owners.insert(summary_file.to_string(), "the summary".to_string());

    let mut names = Vec::with_capacity(factions.len());
    for faction in factions {
        let file_name = document_file_name(&faction.name);
        let owner = format!("faction {} ({})", faction.id, faction.name);
        if let Some(first) = owners.get(&file_name) {
            return Err(JsonError::DocumentCollision {
                file: file_name,
                first: first.clone(),
                second: owner,
            });
        }
        owners.insert(file_name.clone(), owner);
        names.push(file_name);
    }
    Ok(names)
}

/// Serialize `value` as pretty-printed JSON to `path`.
pub fn write_document<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), JsonError> {
    let contents = serde_json::to_string_pretty(value).map_err(|e| JsonError::Parse {
        path: path.display().to_string(),
        source: e,
    })?;
    std::fs::write(path, contents).map_err(|e| JsonError::Io {
        path: path.display().to_string(),
        source: e,
    })
}

/// Read and deserialize one JSON document.
pub fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T, JsonError> {
    let contents = std::fs::read_to_string(path).map_err(|e| JsonError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    serde_json::from_str(&contents).map_err(|e| JsonError::Parse {
        path: path.display().to_string(),
        source: e,
    })
}

/// List `.json` files in a directory, sorted by file name.
///
/// A missing directory is treated as empty.
pub fn document_paths(dir: &Path) -> Result<Vec<PathBuf>, JsonError> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    if !dir.is_dir() {
        return Err(JsonError::DirNotFound(dir.display().to_string()));
    }

    let mut entries: Vec<_> = std::fs::read_dir(dir)
        .map_err(|e| JsonError::Io {
            path: dir.display().to_string(),
            source: e,
        })?
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "json"))
        .collect();
    entries.sort_by_key(|e| e.file_name());

    Ok(entries.into_iter().map(|e| e.path()).collect())
}

/// Load the summary document from an output directory.
pub fn load_summary(dir: &Path, summary_file: &str) -> Result<Vec<FactionSummary>, JsonError> {
    read_document(&dir.join(summary_file))
}
