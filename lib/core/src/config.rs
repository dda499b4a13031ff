//! Pipeline configuration
//!
//! Loaded from an optional JSON file; every field has a default so a
//! partial file (or none at all) is valid.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default embedding dimension (matches all-MiniLM-L6-v2)
pub const DEFAULT_EMBEDDING_DIM: usize = 384;

/// Default number of ranked tables kept for download
pub const DEFAULT_MAX_RETAINED_RESULTS: usize = 16;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Name of the score column appended to ranked tables
    pub similarity_column: String,
    /// Column name used when candidates arrive as a plain list of texts
    pub text_list_column: String,
    /// Dimension of the embedding vectors
    pub embedding_dim: usize,
    /// Maximum number of ranked tables retained for retrieval
    pub max_retained_results: usize,
    /// Additional column names to treat as PII without a dedicated token
    pub extra_pii_columns: Vec<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            similarity_column: "similarity".to_string(),
            text_list_column: "resume_text".to_string(),
            embedding_dim: DEFAULT_EMBEDDING_DIM,
            max_retained_results: DEFAULT_MAX_RETAINED_RESULTS,
            extra_pii_columns: Vec::new(),
        }
    }
}

impl PipelineConfig {
    /// Load a config file and validate it
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config: PipelineConfig =
            serde_json::from_str(&text).map_err(|e| Error::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.similarity_column.trim().is_empty() {
            return Err(Error::InvalidConfig("similarity_column must not be empty".into()));
        }
        if self.text_list_column.trim().is_empty() {
            return Err(Error::InvalidConfig("text_list_column must not be empty".into()));
        }
        if self.embedding_dim == 0 {
            return Err(Error::InvalidConfig("embedding_dim must be positive".into()));
        }
        if self.max_retained_results == 0 {
            return Err(Error::InvalidConfig("max_retained_results must be positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"embedding_dim": 64, "extra_pii_columns": ["ssn"]}}"#).unwrap();

        let config = PipelineConfig::from_path(file.path()).unwrap();
        assert_eq!(config.embedding_dim, 64);
        assert_eq!(config.extra_pii_columns, vec!["ssn"]);
        assert_eq!(config.similarity_column, "similarity");
    }

    #[test]
    fn test_invalid_config() {
        let config = PipelineConfig {
            embedding_dim: 0,
            ..PipelineConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }
}
