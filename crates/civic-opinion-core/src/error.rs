use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OpinionError {
    #[error("Opinion not found: {id}")]
    OpinionNotFound { id: String },

    #[error("Category registry is empty")]
    EmptyRegistry,

    #[error("Category registry has no catch-all category (a category with no keywords)")]
    MissingCatchAll,

    #[error("Category registry has more than one catch-all category: {names:?}")]
    MultipleCatchAll { names: Vec<String> },

    #[error("Catch-all category must be the last entry: '{name}'")]
    CatchAllNotLast { name: String },

    #[error("Duplicate category name: '{name}'")]
    DuplicateCategory { name: String },

    #[error("Category '{category}' contains an empty keyword")]
    EmptyKeyword { category: String },

    #[error("Failed to parse config file {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("Unknown config key: {key}")]
    ConfigKeyNotFound { key: String },

    #[error("Invalid value for {key}: '{value}'")]
    InvalidConfigValue { key: String, value: String },

    #[error("Failed to parse opinion store {path}: {message}")]
    StoreParse { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, OpinionError>;

impl OpinionError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::OpinionNotFound { .. } => 2,
            Self::EmptyRegistry
            | Self::MissingCatchAll
            | Self::MultipleCatchAll { .. }
            | Self::CatchAllNotLast { .. }
            | Self::DuplicateCategory { .. }
            | Self::EmptyKeyword { .. } => 3,
            Self::ConfigParse { .. }
            | Self::ConfigKeyNotFound { .. }
            | Self::InvalidConfigValue { .. } => 4,
            Self::StoreParse { .. } => 5,
            _ => 1,
        }
    }
}
