use serde::{Deserialize, Serialize};

/// Tunables for the readiness formula.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Length of the rolling relevance horizon.
    pub window_years: u32,
    /// Number of yearly samples in the historical series.
    pub lookback_years: u32,
    pub history_sample_month: u32,
    pub history_sample_day: u32,
    /// Conditions at or above this weight count as critical.
    pub critical_weight: f64,
    /// Emerging conditions below this progress are reported as critical missing.
    pub critical_emerging_ceiling: f64,
    /// Damping applied to open-ended emerging conditions.
    pub emerging_damping: f64,
    /// Points above/below the recent average before the trend moves off stable.
    pub trend_threshold: f64,
    pub trend_sample_size: usize,
    pub critical_active_limit: usize,
}

impl EngineConfig {
    /// Longest rolling window the date arithmetic is allowed to span.
    pub const MAX_WINDOW_YEARS: u32 = 10_000;
    /// Upper bound on yearly samples kept in the historical series.
    pub const MAX_LOOKBACK_YEARS: u32 = 1_000;
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window_years: 100,
            lookback_years: 50,
            history_sample_month: 6,
            history_sample_day: 15,
            critical_weight: 8.0,
            critical_emerging_ceiling: 0.5,
            emerging_damping: 0.5,
            trend_threshold: 2.0,
            trend_sample_size: 5,
            critical_active_limit: 5,
        }
    }
}
