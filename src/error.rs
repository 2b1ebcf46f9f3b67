use crate::types::SpeciesId;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogueError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("json parse failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("yaml parse failed: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("unsupported catalogue extension '{0}'; expected .yaml/.yml/.json")]
    UnsupportedExtension(String),

    #[error("species id {0} appears more than once")]
    DuplicateSpecies(SpeciesId),

    #[error("species '{0}' has id 0; ids must be positive")]
    InvalidSpeciesId(String),
}

/// Failure of the external record set behind an audit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    #[error("failed to read records: {0}")]
    Io(String),

    #[error("failed to parse records: {0}")]
    Parse(String),

    #[error("record source unavailable: {0}")]
    Unavailable(String),
}
