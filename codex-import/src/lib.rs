//! Compile pipe-delimited rules tables into per-faction catalog documents.
//!
//! This crate owns the whole ETL path: reading source tables, building the
//! faction/unit graph, running the enrichment passes, recovering images from
//! a previous run and handing the result to the JSON writer.

pub mod error;
pub mod graph;
pub mod passes;
pub mod pipeline;
pub mod preserve;
pub mod progress;
pub mod source;
pub mod tables;
pub mod text;

pub use error::{CompileError, LinkError, SourceError};
pub use graph::Catalog;
pub use passes::PassStats;
pub use pipeline::{CompileOptions, CompileReport, build_catalog, compile};
pub use preserve::{ImageIndex, merge_image};
pub use progress::{CompileProgress, LogProgress, SilentProgress};
pub use source::{Record, Schema, SourceRows, parse_raw, read_raw_rows};
pub use tables::SourceTable;
pub use text::{normalize, parse_weapon_text, split_stratagem};
