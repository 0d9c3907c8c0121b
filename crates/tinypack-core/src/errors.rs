use std::path::PathBuf;
use thiserror::Error;

use crate::module_id::ModuleId;

#[derive(Debug, Error)]
pub enum BundleError {
    #[error("IO error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Syntax error in {module}: {message}")]
    Parse { module: ModuleId, message: String },

    #[error("Invalid JSON in {module}: {source}")]
    Json {
        module: ModuleId,
        #[source]
        source: serde_json::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Circular dependency: {}", format_cycle(.cycle))]
    CircularDependency { cycle: Vec<ModuleId> },

    #[error("Template error: {0}")]
    Template(String),
}

impl BundleError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BundleError::Io {
            path: path.into(),
            source,
        }
    }
}

pub(crate) fn format_cycle(cycle: &[ModuleId]) -> String {
    cycle
        .iter()
        .map(ModuleId::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}

pub type Result<T> = std::result::Result<T, BundleError>;
