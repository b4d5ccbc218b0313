//! Storage Layer
//!
//! Holds the authoritative AML rule collection behind a single lock and
//! produces export snapshots of it.

mod id;
mod repository;
mod seed;
mod snapshot;

pub use id::IdStrategy;
pub use repository::{RuleFilter, RuleStore, RuleSummary};
pub use seed::demo_rules;
pub use snapshot::RuleSnapshot;

use rule_model::ValidationError;
use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),
    #[error("Rule not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("Lock error: {0}")]
    LockError(String),
}
