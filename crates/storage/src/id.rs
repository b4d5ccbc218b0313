//! Rule Id Generation

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Prefix shared by every generated rule id
const ID_PREFIX: &str = "rule_";

/// How the store assigns ids to rules created without one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdStrategy {
    /// `rule_1`, `rule_2`, ... from a per-store counter
    #[default]
    Sequential,
    /// `rule_<uuid v4>` in simple (unhyphenated) form
    Uuid,
}

impl IdStrategy {
    /// Produce a candidate id. `sequence` is the store's next counter value.
    pub(crate) fn candidate(&self, sequence: u64) -> String {
        match self {
            IdStrategy::Sequential => format!("{ID_PREFIX}{sequence}"),
            IdStrategy::Uuid => format!("{ID_PREFIX}{}", Uuid::new_v4().simple()),
        }
    }
}
