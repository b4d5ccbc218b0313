//! Control Command Interpreter
//!
//! Decodes rule writes and one-shot administrative commands into a single
//! tagged [`Command`] and executes them against the rule store.

mod command;
mod error;
mod interpreter;

pub use command::{decode_rule_input, Command, ControlRequest};
pub use error::CommandError;
pub use interpreter::{CommandOutcome, ControlAction, ControlInterpreter};
