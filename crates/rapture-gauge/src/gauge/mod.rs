//! Readiness gauge: a weighted catalog of conditions reduced to a single
//! percentage, a clock reading and a trend over a rolling window.

pub mod alerts;
pub mod catalog;
pub mod domain;
pub mod engine;
pub mod enrichment;
pub mod prediction;
pub mod router;
pub mod schedule;

pub use alerts::{AlertError, AlertKind, AlertPublisher, ConditionMonitor, ReadinessAlert};
pub use catalog::{
    CatalogError, ConditionSource, ConditionStore, CsvCatalog, JsonCatalog, SeedCatalog,
};
pub use domain::{Category, Condition, ConditionId, ConditionStatus, ReadinessScore, Trend};
pub use engine::{EngineConfig, EngineError, ReadinessEngine, SharedEngine};
pub use prediction::{ConfidenceLevel, Prediction, Projection};
pub use router::{readiness_router, GaugeState};
pub use schedule::{run_schedule, Clock, ManualClock, RecomputeSchedule, SystemClock};
