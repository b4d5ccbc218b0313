//! Command Decoding

use crate::error::CommandError;
use rule_model::{ControlType, RuleInput, RuleState, ValidationError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Every write the store accepts, as one tagged variant
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Create or replace a rule
    Upsert(RuleInput),
    /// Remove a rule by id
    Delete(String),
    /// EXPORT_RULES_CURRENT
    ExportAll,
    /// DELETE_RULES_ALL
    DeleteAll,
    /// DELETE_RULE_BY_ID
    DeleteById(String),
}

/// Body of a control request: the command name and an optional target
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlRequest {
    #[serde(default)]
    pub control_type: Option<String>,
    #[serde(default)]
    pub rule_id: Option<String>,
}

impl TryFrom<ControlRequest> for Command {
    type Error = CommandError;

    fn try_from(request: ControlRequest) -> Result<Self, Self::Error> {
        let name = request
            .control_type
            .ok_or(ValidationError::MissingField("controlType"))?;
        let control_type = ControlType::from_wire(name.trim())
            .ok_or_else(|| CommandError::UnknownCommand(name.clone()))?;

        Ok(Command::from_control(control_type, request.rule_id))
    }
}

/// Decode a plain rule record. A `controlType` is only meaningful on
/// CONTROL records and is rejected here.
pub fn decode_rule_input(payload: Value) -> Result<RuleInput, CommandError> {
    match payload.get("controlType") {
        Some(Value::Null) | None => {}
        Some(Value::String(name)) => {
            return Err(ValidationError::UnexpectedControlType(name.clone()).into())
        }
        Some(other) => return Err(ValidationError::UnexpectedControlType(other.to_string()).into()),
    }

    Ok(RuleInput::deserialize(&payload)?)
}

impl Command {
    /// Build the command for a control type. The target id is only kept for
    /// DELETE_RULE_BY_ID; other commands carry placeholder ids.
    pub fn from_control(control_type: ControlType, rule_id: Option<String>) -> Self {
        match control_type {
            ControlType::ExportRulesCurrent => Command::ExportAll,
            ControlType::DeleteRulesAll => Command::DeleteAll,
            ControlType::DeleteRuleById => Command::DeleteById(rule_id.unwrap_or_default()),
        }
    }

    /// Decode a rule-shaped record.
    ///
    /// `ruleState: CONTROL` turns the record into a control command and the
    /// placeholder rule fields are ignored. Anything else is a rule upsert.
    pub fn from_payload(payload: Value) -> Result<Self, CommandError> {
        let state = match payload.get("ruleState") {
            Some(value) => Some(RuleState::deserialize(value)?),
            None => None,
        };

        if state == Some(RuleState::Control) {
            let request = ControlRequest::deserialize(&payload)?;
            return Command::try_from(request);
        }

        Ok(Command::Upsert(decode_rule_input(payload)?))
    }

    /// Control type for administrative commands, `None` for plain rule writes
    pub fn control_type(&self) -> Option<ControlType> {
        match self {
            Command::ExportAll => Some(ControlType::ExportRulesCurrent),
            Command::DeleteAll => Some(ControlType::DeleteRulesAll),
            Command::DeleteById(_) => Some(ControlType::DeleteRuleById),
            Command::Upsert(_) | Command::Delete(_) => None,
        }
    }
}
