use std::path::PathBuf;

use thiserror::Error;

use crate::core::types::EntityId;

#[derive(Error, Debug)]
pub enum SkirmishError {
    #[error("Coordinates must be in range 0-500, got ({x}, {y})")]
    InvalidCoordinate { x: i64, y: i64 },

    #[error("Unknown NPC kind code: {0}")]
    UnknownKind(i64),

    #[error("Roster unavailable at {path}: {source}")]
    PersistenceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed roster: {0}")]
    MalformedRoster(String),

    #[error("Entity already registered: {0:?}")]
    DuplicateEntity(EntityId),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SkirmishError>;
