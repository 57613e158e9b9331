//! Static engine-maintenance reference dataset
//!
//! Loaded once at startup and passed through opaquely as grounding context
//! for open-ended questions. The bundled copy can be replaced with a file.

use std::path::{Path, PathBuf};
use thiserror::Error;

const BUNDLED: &str = include_str!("../data/engine_maintenance.json");

#[derive(Debug, Error)]
pub enum ReferenceDataError {
    #[error("failed to read reference data from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("reference data is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Immutable reference dataset, rendered once for prompt inclusion
#[derive(Debug, Clone)]
pub struct ReferenceData {
    rendered: String,
}

impl ReferenceData {
    /// The dataset compiled into the binary
    pub fn bundled() -> Result<Self, ReferenceDataError> {
        Self::from_json(BUNDLED)
    }

    pub fn load(path: &Path) -> Result<Self, ReferenceDataError> {
        let text = std::fs::read_to_string(path).map_err(|source| ReferenceDataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Validate the JSON and normalize it into a compact prompt string
    pub fn from_json(text: &str) -> Result<Self, ReferenceDataError> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        Ok(Self {
            rendered: value.to_string(),
        })
    }

    pub fn as_prompt_text(&self) -> &str {
        &self.rendered
    }
}
