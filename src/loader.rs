//! Document loader
//!
//! Reads the product data directory into in-memory documents, one per
//! readable file. Unsupported file types are skipped silently; a missing
//! or unreadable directory fails the load. Documents exist only until
//! the index is built from them.

use crate::errors::{CommsError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// File extensions the loader will ingest as plain text
const SUPPORTED_EXTENSIONS: &[&str] = &["txt", "md", "markdown", "text", "csv"];

/// A loaded source document
#[derive(Debug, Clone)]
pub struct Document {
    pub id: Uuid,
    pub path: PathBuf,
    pub text: String,
}

/// Loads documents from a flat directory
#[derive(Debug, Clone)]
pub struct DocumentLoader {
    data_dir: PathBuf,
}

impl DocumentLoader {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load every supported file in the data directory.
    ///
    /// An empty directory produces an empty Vec; downstream indexing
    /// treats that as a valid (empty) index. No ordering is guaranteed.
    pub fn load(&self) -> Result<Vec<Document>> {
        if !self.data_dir.is_dir() {
            return Err(CommsError::Load(format!(
                "data directory '{}' is missing or not a directory",
                self.data_dir.display()
            )));
        }

        let entries = fs::read_dir(&self.data_dir).map_err(|e| {
            CommsError::Load(format!(
                "cannot read data directory '{}': {}",
                self.data_dir.display(),
                e
            ))
        })?;

        let mut documents = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|e| {
                CommsError::Load(format!("cannot read directory entry: {}", e))
            })?;
            let path = entry.path();

            if !path.is_file() || !Self::is_supported(&path) {
                continue;
            }

            let text = fs::read_to_string(&path).map_err(|e| {
                CommsError::Load(format!("cannot read file '{}': {}", path.display(), e))
            })?;

            documents.push(Document {
                id: Uuid::new_v4(),
                path,
                text,
            });
        }

        Ok(documents)
    }

    fn is_supported(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                let ext = ext.to_ascii_lowercase();
                SUPPORTED_EXTENSIONS.contains(&ext.as_str())
            })
            .unwrap_or(false)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
