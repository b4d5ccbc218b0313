//! Validation Error Types

use thiserror::Error;

/// Errors raised while validating a rule before it is stored
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Required field absent or empty
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Required text field contains only whitespace
    #[error("Field {0} must not be blank")]
    BlankField(&'static str),

    /// Numeric field outside its allowed range
    #[error("{field} value {value} is out of range: {reason}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// CONTROL records are commands and cannot be stored as rules
    #[error("Records with ruleState CONTROL cannot be stored as rules")]
    ControlNotStorable,

    /// controlType supplied on a record that is not a CONTROL record
    #[error("controlType {0} is only allowed when ruleState is CONTROL")]
    UnexpectedControlType(String),
}
