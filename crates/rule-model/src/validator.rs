//! Rule Validation

use crate::error::ValidationError;
use crate::rule::{RuleInput, RuleState};
use tracing::debug;

/// Trim key names and drop the blank ones, keeping order
pub fn normalize_keys(keys: Vec<String>) -> Vec<String> {
    keys.into_iter()
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
        .collect()
}

/// Normalize and validate a rule before it is written.
///
/// Blank grouping and unique keys are dropped and the aggregate field name
/// is trimmed. Fails when nothing usable remains for a required field.
pub fn validate_input(mut input: RuleInput) -> Result<RuleInput, ValidationError> {
    if input.rule_state == RuleState::Control {
        return Err(ValidationError::ControlNotStorable);
    }

    let field = input.aggregate_field_name.trim();
    if field.is_empty() {
        return Err(if input.aggregate_field_name.is_empty() {
            ValidationError::MissingField("aggregateFieldName")
        } else {
            ValidationError::BlankField("aggregateFieldName")
        });
    }
    input.aggregate_field_name = field.to_string();

    input.grouping_key_names = normalize_keys(input.grouping_key_names);
    if input.grouping_key_names.is_empty() {
        return Err(ValidationError::MissingField("groupingKeyNames"));
    }
    input.unique = normalize_keys(input.unique);

    if input.window_minutes == 0 {
        return Err(ValidationError::OutOfRange {
            field: "windowMinutes",
            value: 0.0,
            reason: "must be at least 1",
        });
    }

    if !input.limit.is_finite() {
        return Err(ValidationError::OutOfRange {
            field: "limit",
            value: input.limit,
            reason: "must be a finite number",
        });
    }

    debug!(
        "Validated rule input for field {} ({} grouping keys)",
        input.aggregate_field_name,
        input.grouping_key_names.len()
    );
    Ok(input)
}
