//! Error types for stack assembly and synthesis.

use std::path::PathBuf;

use thiserror::Error;
use tide_autoscale::ApplyError;
use tide_core::ConfigError;

/// Result type alias for stack operations.
pub type StackResult<T> = Result<T, StackError>;

#[derive(Debug, Error)]
pub enum StackError {
    #[error("invalid stack id {0:?}: must start with a letter and contain only letters, digits and '-'")]
    InvalidStackId(String),

    #[error("stack {0:?} is already defined in this app")]
    DuplicateStack(String),

    #[error("stack {stack}: {source}")]
    Apply {
        stack: String,
        #[source]
        source: ApplyError,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("no stack named {0:?}")]
    UnknownStack(String),

    #[error("failed to read config {path}: {source}")]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    ParseConfig(#[from] toml::de::Error),

    #[error("failed to render config: {0}")]
    RenderConfig(#[from] toml::ser::Error),

    #[error("failed to serialize template: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
