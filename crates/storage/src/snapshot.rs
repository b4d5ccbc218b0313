//! Export Snapshots

use chrono::{DateTime, NaiveDate, Utc};
use rule_model::Rule;
use serde::{Deserialize, Serialize};

use crate::StorageError;

/// Full serialized copy of the rule collection at one point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleSnapshot {
    /// Suggested download name, `aml-rules-<YYYY-MM-DD>.json`
    pub file_name: String,
    pub exported_at: DateTime<Utc>,
    pub rule_count: usize,
    /// Pretty-printed JSON array of the rules
    pub content: String,
}

impl RuleSnapshot {
    pub(crate) fn capture(rules: &[Rule], exported_at: DateTime<Utc>) -> Result<Self, StorageError> {
        let content = serde_json::to_string_pretty(rules)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;

        Ok(Self {
            file_name: file_name_for(exported_at.date_naive()),
            exported_at,
            rule_count: rules.len(),
            content,
        })
    }

    /// Parse the snapshot content back into rules
    pub fn rules(&self) -> Result<Vec<Rule>, StorageError> {
        serde_json::from_str(&self.content)
            .map_err(|e| StorageError::SerializationError(e.to_string()))
    }
}

/// Export file name for a given day
pub fn file_name_for(date: NaiveDate) -> String {
    format!("aml-rules-{}.json", date.format("%Y-%m-%d"))
}
