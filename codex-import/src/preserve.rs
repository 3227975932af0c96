//! Recovery of curator-owned fields from previously written documents.
//!
//! Unit artwork is never present in the relational source. Before units are
//! materialized, the output directory is scanned and every non-empty unit
//! image is indexed by unit id so a regenerated document keeps it.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

/// Just enough of a faction document to recover images.
#[derive(Debug, Deserialize)]
struct PriorDocument {
    #[serde(default)]
    units: Vec<PriorUnit>,
}

#[derive(Debug, Deserialize)]
struct PriorUnit {
    #[serde(default)]
    id: String,
    #[serde(default, alias = "unit_img")]
    image: String,
}

/// Unit id → image recovered from a previous run.
#[derive(Debug, Clone, Default)]
pub struct ImageIndex {
    images: HashMap<String, String>,
}

impl ImageIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index images from every faction document in `dir`.
    ///
    /// A missing or empty directory gives an empty index. Documents that
    /// cannot be read or parsed are logged and skipped.
    pub fn load(dir: &Path, summary_file: &str) -> Self {
        let mut index = Self::new();

        let paths = match codex_catalog::document_paths(dir) {
            Ok(paths) => paths,
            Err(e) => {
                log::warn!("Cannot scan previous output for images: {e}");
                return index;
            }
        };
        if paths.is_empty() {
            log::info!(
                "No previous documents in {}; starting with blank images",
                dir.display()
            );
            return index;
        }

        for path in paths {
            if path.file_name().is_some_and(|n| n == summary_file) {
                continue;
            }
            match codex_catalog::read_document::<PriorDocument>(&path) {
                Ok(doc) => {
                    for unit in doc.units {
                        index.insert(&unit.id, &unit.image);
                    }
                }
                Err(e) => log::warn!("Skipping previous document: {e}"),
            }
        }

        log::info!(
            "Recovered {} unit image(s) from {}",
            index.len(),
            dir.display()
        );
        index
    }

    /// Record an image. Empty ids and images are ignored.
    pub fn insert(&mut self, unit_id: &str, image: &str) {
        let image = image.trim();
        if unit_id.is_empty() || image.is_empty() {
            return;
        }
        self.images.insert(unit_id.to_string(), image.to_string());
    }

    pub fn get(&self, unit_id: &str) -> Option<&str> {
        self.images.get(unit_id).map(String::as_str)
    }

    /// Image for `unit_id` given a freshly computed value and the value
    /// already on the in-memory unit. See [`merge_image`].
    pub fn resolve(&self, unit_id: &str, computed: &str, current: &str) -> String {
        merge_image(computed, self.get(unit_id), current)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// Prefer a non-empty computed value, then the preserved value, then the
/// current one; otherwise empty.
pub fn merge_image(computed: &str, preserved: Option<&str>, current: &str) -> String {
    [Some(computed), preserved, Some(current)]
        .into_iter()
        .flatten()
        .find(|v| !v.is_empty())
        .unwrap_or("")
        .to_string()
}
