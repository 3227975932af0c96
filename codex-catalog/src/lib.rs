//! Rules catalog document model and JSON I/O.
//!
//! This crate defines the per-faction document schema without any knowledge
//! of the relational source it is compiled from. Consumers can deserialize
//! emitted documents with these types directly.

pub mod json;
pub mod types;

pub use json::{
    JsonError, SUMMARY_FILE, WriteReport, document_file_name, document_paths, load_summary,
    read_document, write_catalog,
};
pub use types::*;
