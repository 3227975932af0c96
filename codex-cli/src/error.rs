use thiserror::Error;

use codex_catalog::JsonError;
use codex_import::CompileError;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// I/O error
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// Compile run aborted
    #[error(transparent)]
    Compile(#[from] CompileError),

    /// Existing documents could not be read
    #[error("Document error: {0}")]
    Documents(#[from] JsonError),

    /// Catch-all for other errors
    #[error("{0}")]
    Other(String),
}

impl CliError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub(crate) fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}
