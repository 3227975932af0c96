use thiserror::Error;

/// A source table could not be opened.
///
/// Problems inside an opened table are row-level: the reader skips and
/// counts them.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

/// A row could not be linked into the entity graph.
///
/// These are row-level problems: the row is skipped and the run goes on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkError {
    #[error("{table}: no entity for {field} '{id}'")]
    MissingForeignKey {
        table: &'static str,
        field: &'static str,
        id: String,
    },
    #[error("{table}: empty {field}")]
    EmptyField {
        table: &'static str,
        field: &'static str,
    },
    #[error("unit '{id}' is already registered")]
    DuplicateUnit { id: String },
    #[error("unit '{id}' belongs to faction '{owner}', not '{requested}'")]
    FactionMismatch {
        id: String,
        owner: String,
        requested: String,
    },
}

impl LinkError {
    pub fn missing(table: &'static str, field: &'static str, id: impl Into<String>) -> Self {
        Self::MissingForeignKey {
            table,
            field,
            id: id.into(),
        }
    }

    pub fn empty(table: &'static str, field: &'static str) -> Self {
        Self::EmptyField { table, field }
    }
}

/// Errors that abort a compile run.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("Required source unavailable: {0}")]
    Source(#[from] SourceError),
    #[error("Failed to write documents: {0}")]
    Write(#[from] codex_catalog::JsonError),
}
