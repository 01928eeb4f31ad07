use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::domain::ConditionId;
use super::engine::ReadinessEngine;

const CRITICAL_READINESS: f64 = 90.0;
const HIGH_READINESS: f64 = 85.0;
const RAPID_ACCELERATION: f64 = 3.0;
const WINDOW_EXIT_NOTICE_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    CriticalReadiness,
    HighReadiness,
    RapidAcceleration,
    WindowExit,
}

/// Notification payload handed to an [`AlertPublisher`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadinessAlert {
    pub kind: AlertKind,
    pub title: String,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<ConditionId>,
}

/// Outbound delivery hook (push notifications, chat, e-mail).
pub trait AlertPublisher: Send + Sync {
    fn publish(&self, alert: ReadinessAlert) -> Result<(), AlertError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AlertError {
    #[error("alert transport unavailable: {0}")]
    Transport(String),
}

/// Publisher that only writes alerts to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAlertPublisher;

impl AlertPublisher for TracingAlertPublisher {
    fn publish(&self, alert: ReadinessAlert) -> Result<(), AlertError> {
        info!(kind = ?alert.kind, title = %alert.title, body = %alert.body, "readiness alert");
        Ok(())
    }
}

/// Watches the published score and the catalog for notable changes.
#[derive(Clone)]
pub struct ConditionMonitor {
    publisher: Arc<dyn AlertPublisher>,
}

impl std::fmt::Debug for ConditionMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConditionMonitor").finish_non_exhaustive()
    }
}

impl ConditionMonitor {
    pub fn new(publisher: Arc<dyn AlertPublisher>) -> Self {
        Self { publisher }
    }

    /// Alerts warranted by the engine's current state. Publishes nothing.
    pub fn evaluate(engine: &ReadinessEngine, today: NaiveDate) -> Vec<ReadinessAlert> {
        let score = engine.current_score();
        let mut alerts = Vec::new();

        if score.percentage > CRITICAL_READINESS {
            alerts.push(ReadinessAlert {
                kind: AlertKind::CriticalReadiness,
                title: "Critical Readiness Level".to_string(),
                body: format!(
                    "Readiness has reached {}% - highest level recorded",
                    score.percentage as i64
                ),
                condition: None,
            });
        } else if score.percentage > HIGH_READINESS {
            alerts.push(ReadinessAlert {
                kind: AlertKind::HighReadiness,
                title: "High Alert".to_string(),
                body: format!(
                    "Readiness at {}% - approaching critical convergence",
                    score.percentage as i64
                ),
                condition: None,
            });
        }

        if score.acceleration > RAPID_ACCELERATION {
            alerts.push(ReadinessAlert {
                kind: AlertKind::RapidAcceleration,
                title: "Rapid Acceleration Detected".to_string(),
                body: format!(
                    "Readiness increasing at {:.1}% per year",
                    score.acceleration
                ),
                condition: None,
            });
        }

        let window_years = engine.config().window_years;
        for condition in engine.conditions() {
            if !condition.is_active_in_window(today, window_years) {
                continue;
            }
            let Some(exit) = condition.window_exit_date(window_years) else {
                continue;
            };
            let days = (exit - today).num_days();
            if days > 0 && days <= WINDOW_EXIT_NOTICE_DAYS {
                alerts.push(ReadinessAlert {
                    kind: AlertKind::WindowExit,
                    title: "Condition Expiring Soon".to_string(),
                    body: format!(
                        "{} will exit the {window_years}-year window in {days} days",
                        condition.scripture_reference
                    ),
                    condition: Some(condition.id.clone()),
                });
            }
        }

        alerts
    }

    /// Evaluates and publishes; delivery failures are logged and skipped.
    pub fn check(&self, engine: &ReadinessEngine, today: NaiveDate) -> Vec<ReadinessAlert> {
        let alerts = Self::evaluate(engine, today);
        for alert in &alerts {
            if let Err(error) = self.publisher.publish(alert.clone()) {
                warn!(kind = ?alert.kind, %error, "alert delivery failed");
            }
        }
        alerts
    }
}
