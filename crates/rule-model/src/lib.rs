//! AML Rule Model
//!
//! Rule definitions, the enums they are built from, and the validation
//! applied before a rule is written to the store.

mod error;
mod rule;
mod validator;

pub use error::ValidationError;
pub use rule::{
    AggregateFunction, ControlType, LimitOperator, Rule, RuleInput, RuleState,
};
pub use validator::{normalize_keys, validate_input};
