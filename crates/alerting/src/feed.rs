//! Alert Feed Implementation

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Alert feed errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AlertError {
    #[error("Alert not found: {0}")]
    NotFound(String),
    #[error("Alert {id} cannot move from {from} to {to}")]
    InvalidTransition {
        id: String,
        from: AlertStatus,
        to: AlertStatus,
    },
}

/// Alert severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    High,
    Medium,
    Low,
}

/// Where an alert is in its review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AlertStatus {
    New,
    Acknowledged,
    Resolved,
}

impl std::fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            AlertStatus::New => "NEW",
            AlertStatus::Acknowledged => "ACKNOWLEDGED",
            AlertStatus::Resolved => "RESOLVED",
        })
    }
}

/// A rule violation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: String,
    pub rule_id: String,
    pub severity: Severity,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub status: AlertStatus,
    pub trigger_value: f64,
    pub threshold: f64,
}

/// Filter applied when listing alerts
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AlertFilter {
    /// Case-insensitive substring of `ruleId` or `message`
    pub search: Option<String>,
    pub severity: Option<Severity>,
    pub status: Option<AlertStatus>,
}

impl AlertFilter {
    fn matches(&self, alert: &Alert) -> bool {
        let matches_search = match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => {
                let term = term.to_lowercase();
                alert.rule_id.to_lowercase().contains(&term)
                    || alert.message.to_lowercase().contains(&term)
            }
            _ => true,
        };

        matches_search
            && self.severity.map_or(true, |s| alert.severity == s)
            && self.status.map_or(true, |s| alert.status == s)
    }
}

/// Counts shown above the alert table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertSummary {
    pub total: usize,
    pub high_severity: usize,
    pub pending: usize,
    pub acknowledged: usize,
    pub resolved: usize,
}

/// In-memory alert feed
#[derive(Debug, Default)]
pub struct AlertFeed {
    alerts: Vec<Alert>,
}

impl AlertFeed {
    /// Create an empty feed
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed pre-loaded with sample alerts
    pub fn with_demo_alerts() -> Self {
        let at = |hour, minute| {
            Utc.with_ymd_and_hms(2024, 1, 15, hour, minute, 0)
                .single()
                .unwrap_or_default()
        };

        let mut feed = Self::new();
        feed.push(Alert {
            id: "alert-001".to_string(),
            rule_id: "rule_001".to_string(),
            severity: Severity::High,
            message: "Transaction amount exceeded threshold".to_string(),
            timestamp: at(10, 30),
            status: AlertStatus::New,
            trigger_value: 15000.0,
            threshold: 10000.0,
        });
        feed.push(Alert {
            id: "alert-002".to_string(),
            rule_id: "rule_003".to_string(),
            severity: Severity::Medium,
            message: "Unusual transaction pattern detected".to_string(),
            timestamp: at(9, 15),
            status: AlertStatus::Acknowledged,
            trigger_value: 7500.0,
            threshold: 5000.0,
        });
        feed.push(Alert {
            id: "alert-003".to_string(),
            rule_id: "rule_002".to_string(),
            severity: Severity::Low,
            message: "Velocity threshold exceeded".to_string(),
            timestamp: at(8, 45),
            status: AlertStatus::Resolved,
            trigger_value: 3200.0,
            threshold: 3000.0,
        });
        info!("Alert feed seeded with {} demo alerts", feed.len());
        feed
    }

    /// Append an alert
    pub fn push(&mut self, alert: Alert) {
        debug!("Alert {} raised by rule {}", alert.id, alert.rule_id);
        self.alerts.push(alert);
    }

    /// Matching alerts, newest first
    pub fn list(&self, filter: &AlertFilter) -> Vec<Alert> {
        let mut alerts: Vec<Alert> = self
            .alerts
            .iter()
            .filter(|alert| filter.matches(alert))
            .cloned()
            .collect();
        alerts.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        alerts
    }

    pub fn summary(&self) -> AlertSummary {
        let mut summary = AlertSummary {
            total: self.alerts.len(),
            ..Default::default()
        };
        for alert in &self.alerts {
            if alert.severity == Severity::High {
                summary.high_severity += 1;
            }
            match alert.status {
                AlertStatus::New => summary.pending += 1,
                AlertStatus::Acknowledged => summary.acknowledged += 1,
                AlertStatus::Resolved => summary.resolved += 1,
            }
        }
        summary
    }

    /// Mark a new alert as seen. Acknowledging twice is a no-op.
    pub fn acknowledge(&mut self, id: &str) -> Result<Alert, AlertError> {
        self.transition(id, AlertStatus::Acknowledged)
    }

    /// Close an alert from any state
    pub fn resolve(&mut self, id: &str) -> Result<Alert, AlertError> {
        self.transition(id, AlertStatus::Resolved)
    }

    fn transition(&mut self, id: &str, to: AlertStatus) -> Result<Alert, AlertError> {
        let alert = self
            .alerts
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| AlertError::NotFound(id.to_string()))?;

        if alert.status == AlertStatus::Resolved && to != AlertStatus::Resolved {
            return Err(AlertError::InvalidTransition {
                id: id.to_string(),
                from: alert.status,
                to,
            });
        }

        if alert.status != to {
            info!("Alert {} moved from {} to {}", id, alert.status, to);
            alert.status = to;
        }
        Ok(alert.clone())
    }

    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }
}
