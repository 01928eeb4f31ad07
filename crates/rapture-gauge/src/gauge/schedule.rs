use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use super::alerts::ConditionMonitor;
use super::engine::SharedEngine;

/// Source of wall-clock time for the recompute loop.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Virtual clock advanced by hand.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn set(&self, instant: DateTime<Utc>) {
        *self.now.lock().expect("clock mutex poisoned") = instant;
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut now = self.now.lock().expect("clock mutex poisoned");
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().expect("clock mutex poisoned")
    }
}

/// Work owed on a given tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledWork {
    pub refresh_score: bool,
    pub rebuild_history: bool,
    pub check_alerts: bool,
}

/// Cadences of the background loop: the clock face refreshes every tick,
/// the historical series every recalculation period, alerts hourly.
#[derive(Debug, Clone)]
pub struct RecomputeSchedule {
    pub tick: Duration,
    pub recalculation: Duration,
    pub alert_check: Duration,
    last_rebuild: Option<DateTime<Utc>>,
    last_alert_check: Option<DateTime<Utc>>,
}

impl Default for RecomputeSchedule {
    fn default() -> Self {
        Self::new(
            Duration::from_secs(60),
            Duration::from_secs(4 * 60 * 60),
            Duration::from_secs(60 * 60),
        )
    }
}

impl RecomputeSchedule {
    pub fn new(tick: Duration, recalculation: Duration, alert_check: Duration) -> Self {
        Self {
            tick,
            recalculation,
            alert_check,
            last_rebuild: None,
            last_alert_check: None,
        }
    }

    pub fn due(&self, now: DateTime<Utc>) -> ScheduledWork {
        ScheduledWork {
            refresh_score: true,
            rebuild_history: elapsed_at_least(self.last_rebuild, now, self.recalculation),
            check_alerts: elapsed_at_least(self.last_alert_check, now, self.alert_check),
        }
    }

    pub fn record(&mut self, work: ScheduledWork, now: DateTime<Utc>) {
        if work.rebuild_history {
            self.last_rebuild = Some(now);
        }
        if work.check_alerts {
            self.last_alert_check = Some(now);
        }
    }
}

fn elapsed_at_least(last: Option<DateTime<Utc>>, now: DateTime<Utc>, period: Duration) -> bool {
    match last {
        None => true,
        Some(last) => (now - last)
            .to_std()
            .map(|elapsed| elapsed >= period)
            .unwrap_or(false),
    }
}

/// Applies one tick's work to the shared engine.
pub async fn run_scheduled_work(
    engine: &SharedEngine,
    monitor: Option<&ConditionMonitor>,
    work: ScheduledWork,
    today: NaiveDate,
) {
    let mut guard = engine.write().await;
    if work.rebuild_history {
        guard.invalidate_history();
    }
    if work.refresh_score || work.rebuild_history {
        guard.refresh(today);
    }
    if work.check_alerts {
        if let Some(monitor) = monitor {
            let alerts = monitor.check(&guard, today);
            debug!(alerts = alerts.len(), "condition monitor pass complete");
        }
    }
}

/// Drives the engine until `shutdown` flips to `true` or its sender drops.
pub async fn run_schedule(
    engine: SharedEngine,
    clock: Arc<dyn Clock>,
    mut schedule: RecomputeSchedule,
    monitor: Option<ConditionMonitor>,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut interval = tokio::time::interval(schedule.tick);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    info!(
        tick_secs = schedule.tick.as_secs(),
        recalculation_secs = schedule.recalculation.as_secs(),
        "recompute schedule started"
    );

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let now = clock.now();
                let work = schedule.due(now);
                run_scheduled_work(&engine, monitor.as_ref(), work, now.date_naive()).await;
                schedule.record(work, now);
            }
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    info!("recompute schedule stopped");
                    break;
                }
            }
        }
    }
}
