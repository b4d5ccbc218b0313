//! Rule Types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleState {
    /// Rule is evaluated
    Active,
    /// Rule is kept but not evaluated
    Pause,
    /// Terminal marker, only used as a filter value
    Delete,
    /// Record carries a control command, never a rule
    Control,
}

impl RuleState {
    /// Wire name of the state
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleState::Active => "ACTIVE",
            RuleState::Pause => "PAUSE",
            RuleState::Delete => "DELETE",
            RuleState::Control => "CONTROL",
        }
    }

    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            RuleState::Active => "Active",
            RuleState::Pause => "Paused",
            RuleState::Delete => "Deleted",
            RuleState::Control => "Control",
        }
    }
}

impl fmt::Display for RuleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregate applied to `aggregateFieldName` within the window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AggregateFunction {
    Sum,
    Avg,
    Min,
    Max,
}

impl AggregateFunction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AggregateFunction::Sum => "SUM",
            AggregateFunction::Avg => "AVG",
            AggregateFunction::Min => "MIN",
            AggregateFunction::Max => "MAX",
        }
    }
}

impl fmt::Display for AggregateFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Comparison between the aggregate and the rule limit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LimitOperator {
    #[serde(rename = "=")]
    Equal,
    #[serde(rename = "!=")]
    NotEqual,
    #[serde(rename = ">")]
    Greater,
    #[serde(rename = "<")]
    Less,
    #[serde(rename = "<=")]
    LessOrEqual,
    #[serde(rename = ">=")]
    GreaterOrEqual,
}

impl LimitOperator {
    /// Operator symbol as used on the wire
    pub fn symbol(&self) -> &'static str {
        match self {
            LimitOperator::Equal => "=",
            LimitOperator::NotEqual => "!=",
            LimitOperator::Greater => ">",
            LimitOperator::Less => "<",
            LimitOperator::LessOrEqual => "<=",
            LimitOperator::GreaterOrEqual => ">=",
        }
    }
}

impl fmt::Display for LimitOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Administrative command carried by a CONTROL record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ControlType {
    DeleteRulesAll,
    ExportRulesCurrent,
    DeleteRuleById,
}

impl ControlType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlType::DeleteRulesAll => "DELETE_RULES_ALL",
            ControlType::ExportRulesCurrent => "EXPORT_RULES_CURRENT",
            ControlType::DeleteRuleById => "DELETE_RULE_BY_ID",
        }
    }

    /// Parse the wire name; `None` for anything unrecognized
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "DELETE_RULES_ALL" => Some(ControlType::DeleteRulesAll),
            "EXPORT_RULES_CURRENT" => Some(ControlType::ExportRulesCurrent),
            "DELETE_RULE_BY_ID" => Some(ControlType::DeleteRuleById),
            _ => None,
        }
    }
}

impl fmt::Display for ControlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored AML monitoring rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    pub rule_id: String,
    pub rule_state: RuleState,
    pub grouping_key_names: Vec<String>,
    #[serde(default)]
    pub unique: Vec<String>,
    pub aggregate_field_name: String,
    pub aggregate_function_type: AggregateFunction,
    pub limit_operator_type: LimitOperator,
    pub limit: f64,
    pub window_minutes: u32,
}

impl Rule {
    /// Build a rule from validated input and its final id
    pub fn from_input(rule_id: String, input: RuleInput) -> Self {
        Self {
            rule_id,
            rule_state: input.rule_state,
            grouping_key_names: input.grouping_key_names,
            unique: input.unique,
            aggregate_field_name: input.aggregate_field_name,
            aggregate_function_type: input.aggregate_function_type,
            limit_operator_type: input.limit_operator_type,
            limit: input.limit,
            window_minutes: input.window_minutes,
        }
    }

    /// One-line summary, e.g. `SUM(amount) > 10000 over 60m by [customer_id]`
    pub fn describe(&self) -> String {
        format!(
            "{}({}) {} {} over {}m by [{}]",
            self.aggregate_function_type,
            self.aggregate_field_name,
            self.limit_operator_type,
            self.limit,
            self.window_minutes,
            self.grouping_key_names.join(", ")
        )
    }
}

/// Rule as submitted for create or update; `ruleId` may be absent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<String>,
    pub rule_state: RuleState,
    pub grouping_key_names: Vec<String>,
    #[serde(default)]
    pub unique: Vec<String>,
    pub aggregate_field_name: String,
    pub aggregate_function_type: AggregateFunction,
    pub limit_operator_type: LimitOperator,
    pub limit: f64,
    pub window_minutes: u32,
}

impl RuleInput {
    /// Requested id, `None` when absent or blank
    pub fn requested_id(&self) -> Option<&str> {
        self.rule_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

impl From<Rule> for RuleInput {
    fn from(rule: Rule) -> Self {
        Self {
            rule_id: Some(rule.rule_id),
            rule_state: rule.rule_state,
            grouping_key_names: rule.grouping_key_names,
            unique: rule.unique,
            aggregate_field_name: rule.aggregate_field_name,
            aggregate_function_type: rule.aggregate_function_type,
            limit_operator_type: rule.limit_operator_type,
            limit: rule.limit,
            window_minutes: rule.window_minutes,
        }
    }
}
