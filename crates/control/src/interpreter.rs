//! Command Dispatch

use crate::command::Command;
use crate::error::CommandError;
use chrono::{DateTime, Utc};
use rule_model::{ControlType, Rule, ValidationError};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Mutex;
use storage::{RuleSnapshot, RuleStore};
use tracing::{info, warn};

/// Default number of control actions kept in history
const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Result of a successfully executed command
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    Saved(Rule),
    Deleted(String),
    Exported(RuleSnapshot),
    Cleared { removed: usize },
}

impl CommandOutcome {
    fn describe(&self) -> String {
        match self {
            CommandOutcome::Saved(rule) => format!("saved {}", rule.rule_id),
            CommandOutcome::Deleted(rule_id) => format!("deleted {rule_id}"),
            CommandOutcome::Exported(snapshot) => {
                format!("exported {} rules to {}", snapshot.rule_count, snapshot.file_name)
            }
            CommandOutcome::Cleared { removed } => format!("removed {removed} rules"),
        }
    }
}

/// One executed control command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlAction {
    pub control_type: ControlType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<String>,
    pub executed_at: DateTime<Utc>,
    pub succeeded: bool,
    pub detail: String,
}

/// Executes commands against a [`RuleStore`] and remembers recent control
/// actions, newest first.
pub struct ControlInterpreter {
    history: Mutex<VecDeque<ControlAction>>,
    history_limit: usize,
}

impl ControlInterpreter {
    pub fn new(history_limit: usize) -> Self {
        Self {
            history: Mutex::new(VecDeque::new()),
            history_limit,
        }
    }

    /// Execute a command. Control commands are recorded in history whether
    /// or not they succeed; rule writes are not.
    pub fn execute(&self, store: &RuleStore, command: Command) -> Result<CommandOutcome, CommandError> {
        let control_type = command.control_type();
        let target = match &command {
            Command::DeleteById(rule_id) => Some(rule_id.clone()),
            _ => None,
        };

        let result = Self::dispatch(store, command);

        if let Some(control_type) = control_type {
            match &result {
                Ok(outcome) => info!("Control command {} succeeded: {}", control_type, outcome.describe()),
                Err(err) => warn!("Control command {} rejected: {}", control_type, err),
            }
            self.record(control_type, target, &result);
        }

        result
    }

    fn dispatch(store: &RuleStore, command: Command) -> Result<CommandOutcome, CommandError> {
        match command {
            Command::Upsert(input) => Ok(CommandOutcome::Saved(store.upsert(input)?)),
            Command::Delete(rule_id) => {
                store.delete(&rule_id)?;
                Ok(CommandOutcome::Deleted(rule_id.trim().to_string()))
            }
            Command::ExportAll => Ok(CommandOutcome::Exported(store.export_all()?)),
            Command::DeleteAll => Ok(CommandOutcome::Cleared {
                removed: store.clear()?,
            }),
            Command::DeleteById(rule_id) => {
                let rule_id = rule_id.trim();
                if rule_id.is_empty() {
                    return Err(ValidationError::MissingField("ruleId").into());
                }
                store.delete(rule_id)?;
                Ok(CommandOutcome::Deleted(rule_id.to_string()))
            }
        }
    }

    fn record(
        &self,
        control_type: ControlType,
        rule_id: Option<String>,
        result: &Result<CommandOutcome, CommandError>,
    ) {
        if self.history_limit == 0 {
            return;
        }

        let action = ControlAction {
            control_type,
            rule_id: rule_id.filter(|id| !id.trim().is_empty()),
            executed_at: Utc::now(),
            succeeded: result.is_ok(),
            detail: match result {
                Ok(outcome) => outcome.describe(),
                Err(err) => err.to_string(),
            },
        };

        if let Ok(mut history) = self.history.lock() {
            while history.len() >= self.history_limit {
                history.pop_back();
            }
            history.push_front(action);
        }
    }

    /// Recent control actions, newest first
    pub fn history(&self) -> Vec<ControlAction> {
        self.history
            .lock()
            .map(|h| h.iter().cloned().collect())
            .unwrap_or_default()
    }
}

impl Default for ControlInterpreter {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}
