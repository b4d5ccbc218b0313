//! Alerting
//!
//! Alerts raised by AML rules, with search, severity/status filtering,
//! summary counts and acknowledge/resolve transitions.

mod feed;

pub use feed::{Alert, AlertError, AlertFeed, AlertFilter, AlertStatus, AlertSummary, Severity};
