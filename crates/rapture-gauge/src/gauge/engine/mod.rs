mod clock;
mod config;
mod history;
mod rules;

#[cfg(test)]
mod tests;

pub use clock::clock_reading;
pub use config::EngineConfig;
pub use history::{HistoricalSample, HistoricalSeries};
pub use rules::age_multiplier;

use super::catalog::{CatalogError, ConditionStore};
use super::domain::{Category, Condition, ConditionId, ConditionStatus, ReadinessScore};
use super::enrichment::ScoreAdjustments;
use super::prediction::{generate_prediction, Prediction};
use chrono::{Datelike, NaiveDate};
use rules::{clamp_percentage, effective_confidence, score_conditions};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Engine handle shared between the scheduler, enrichment passes and request handlers.
pub type SharedEngine = Arc<RwLock<ReadinessEngine>>;

/// Reduces the condition catalog into a readiness score.
///
/// Scoring is a pure function of the catalog, the accumulated evidence, the
/// historical series and the requested date. The only cached state is the
/// last published score and the series itself, both refreshed on request.
#[derive(Debug, Clone)]
pub struct ReadinessEngine {
    store: ConditionStore,
    config: EngineConfig,
    evidence: ScoreAdjustments,
    history: HistoricalSeries,
    history_stale: bool,
    current_score: ReadinessScore,
}

impl ReadinessEngine {
    pub fn new(store: ConditionStore, config: EngineConfig) -> Self {
        Self {
            store,
            config,
            evidence: ScoreAdjustments::default(),
            history: HistoricalSeries::default(),
            history_stale: true,
            current_score: ReadinessScore::placeholder(),
        }
    }

    pub fn into_shared(self) -> SharedEngine {
        Arc::new(RwLock::new(self))
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn conditions(&self) -> &[Condition] {
        self.store.conditions()
    }

    pub fn condition(&self, id: &ConditionId) -> Option<&Condition> {
        self.store.get(id)
    }

    pub fn current_score(&self) -> &ReadinessScore {
        &self.current_score
    }

    pub fn history(&self) -> &HistoricalSeries {
        &self.history
    }

    pub fn history_is_stale(&self) -> bool {
        self.history_stale
    }

    pub fn evidence(&self) -> &ScoreAdjustments {
        &self.evidence
    }

    /// Forces the next `refresh` to resample the historical series.
    pub fn invalidate_history(&mut self) {
        self.history_stale = true;
    }

    pub fn calculate_readiness(&self, as_of: NaiveDate) -> ReadinessScore {
        let tally = score_conditions(self.store.conditions(), &self.evidence, as_of, &self.config);
        let percentage = tally.percentage();

        ReadinessScore {
            percentage,
            clock_reading: clock_reading(percentage),
            trend: self.history.trend(
                percentage,
                self.config.trend_sample_size,
                self.config.trend_threshold,
            ),
            acceleration: self.history.acceleration(),
            active_conditions: tally.active_count,
            critical_missing: tally.critical_missing,
        }
    }

    /// Samples the score once per year, mid-year, over the lookback span ending at `reference`'s year.
    pub fn build_historical_series(&mut self, reference: NaiveDate) -> &HistoricalSeries {
        let current_year = reference.year();
        let lookback_years = self
            .config
            .lookback_years
            .min(EngineConfig::MAX_LOOKBACK_YEARS);
        let lookback = lookback_years as i32;
        let mut samples = Vec::with_capacity(lookback_years as usize);

        for year in (current_year - lookback + 1)..=current_year {
            let Some(sample_date) = NaiveDate::from_ymd_opt(
                year,
                self.config.history_sample_month,
                self.config.history_sample_day,
            ) else {
                continue;
            };
            let tally = score_conditions(
                self.store.conditions(),
                &self.evidence,
                sample_date,
                &self.config,
            );
            samples.push(HistoricalSample {
                year,
                percentage: tally.percentage(),
            });
        }

        debug!(samples = samples.len(), %reference, "historical series rebuilt");
        self.history = HistoricalSeries::new(samples);
        self.history_stale = false;
        &self.history
    }

    /// Rebuilds the series if catalog state changed, then publishes a fresh score.
    pub fn refresh(&mut self, as_of: NaiveDate) -> &ReadinessScore {
        if self.history_stale {
            self.build_historical_series(as_of);
        }
        let score = self.calculate_readiness(as_of);
        info!(
            percentage = score.percentage,
            clock = %score.clock_reading,
            trend = score.trend.label(),
            active = score.active_conditions,
            "readiness recalculated"
        );
        self.current_score = score;
        &self.current_score
    }

    /// Per-category share of achievable weight, ignoring the age multiplier.
    pub fn category_scores(&self, as_of: NaiveDate) -> BTreeMap<Category, f64> {
        let mut totals: BTreeMap<Category, (f64, f64)> = Category::ordered()
            .into_iter()
            .map(|category| (category, (0.0, 0.0)))
            .collect();

        for condition in self.store.conditions() {
            let entry = totals.entry(condition.category).or_insert((0.0, 0.0));
            entry.1 += condition.weight;
            if condition.is_active_in_window(as_of, self.config.window_years) {
                entry.0 += condition.weight
                    * condition.current_status.score_multiplier()
                    * effective_confidence(condition, &self.evidence);
            }
        }

        totals
            .into_iter()
            .map(|(category, (score, max))| {
                let percentage = if max > 0.0 {
                    clamp_percentage(score / max * 100.0)
                } else {
                    0.0
                };
                (category, percentage)
            })
            .collect()
    }

    pub fn active_conditions_for_category(
        &self,
        category: Category,
        as_of: NaiveDate,
    ) -> Vec<&Condition> {
        self.store
            .conditions()
            .iter()
            .filter(|condition| {
                condition.category == category
                    && condition.is_active_in_window(as_of, self.config.window_years)
            })
            .collect()
    }

    /// Heaviest in-window critical conditions; ties keep catalog order.
    pub fn critical_active_conditions(&self, as_of: NaiveDate) -> Vec<&Condition> {
        let mut critical: Vec<&Condition> = self
            .store
            .conditions()
            .iter()
            .filter(|condition| {
                condition.weight >= self.config.critical_weight
                    && condition.is_active_in_window(as_of, self.config.window_years)
            })
            .collect();
        critical.sort_by(|a, b| b.weight.total_cmp(&a.weight));
        critical.truncate(self.config.critical_active_limit);
        critical
    }

    pub fn generate_prediction(&self, as_of: NaiveDate) -> Prediction {
        generate_prediction(
            &self.current_score,
            self.history.acceleration(),
            self.store.conditions(),
            as_of,
            &self.config,
        )
    }

    pub fn update_condition_status(
        &mut self,
        id: &ConditionId,
        status: ConditionStatus,
    ) -> Result<(), EngineError> {
        self.ensure_known(id)?;
        self.store.set_status(id, status)?;
        self.history_stale = true;
        debug!(condition = %id, status = status.label(), "condition status updated");
        Ok(())
    }

    pub fn update_condition_confidence(
        &mut self,
        id: &ConditionId,
        confidence: f64,
    ) -> Result<(), EngineError> {
        self.ensure_known(id)?;
        if !(0.0..=1.0).contains(&confidence) {
            return Err(EngineError::InvalidConfidence(confidence));
        }
        self.store.set_confidence(id, confidence)?;
        self.history_stale = true;
        debug!(condition = %id, confidence, "condition confidence updated");
        Ok(())
    }

    /// Adds incremental evidence for a condition. Never recomputes the score.
    pub fn apply_score_adjustment(&mut self, id: &ConditionId, delta: f64) -> Result<(), EngineError> {
        self.ensure_known(id)?;
        if !delta.is_finite() {
            return Err(EngineError::InvalidAdjustment(delta));
        }
        self.evidence.record(id.clone(), delta);
        self.history_stale = true;
        debug!(condition = %id, delta, "score adjustment accumulated");
        Ok(())
    }

    fn ensure_known(&self, id: &ConditionId) -> Result<(), EngineError> {
        if self.store.contains(id) {
            Ok(())
        } else {
            Err(EngineError::UnknownCondition(id.clone()))
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("unknown condition {0}")]
    UnknownCondition(ConditionId),
    #[error("confidence {0} outside [0, 1]")]
    InvalidConfidence(f64),
    #[error("score adjustment {0} is not a finite number")]
    InvalidAdjustment(f64),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}
