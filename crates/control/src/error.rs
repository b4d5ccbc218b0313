//! Command Error Types

use rule_model::ValidationError;
use storage::StorageError;
use thiserror::Error;

/// Errors produced while decoding or executing a command
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommandError {
    /// Required field missing or invalid
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Command targets a rule that does not exist
    #[error("Rule not found: {0}")]
    NotFound(String),

    /// controlType not recognized
    #[error("Unknown control command: {0}")]
    UnknownCommand(String),

    /// Payload could not be decoded
    #[error("Malformed command payload: {0}")]
    Malformed(String),

    /// Store failure unrelated to the request
    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<StorageError> for CommandError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Validation(e) => CommandError::Validation(e),
            StorageError::NotFound(id) => CommandError::NotFound(id),
            other => CommandError::Storage(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for CommandError {
    fn from(err: serde_json::Error) -> Self {
        CommandError::Malformed(err.to_string())
    }
}
