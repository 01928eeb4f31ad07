use super::config::EngineConfig;
use crate::gauge::domain::{full_years_between, window_start, Condition, ConditionStatus};
use crate::gauge::enrichment::ScoreAdjustments;
use chrono::NaiveDate;

/// Running sums produced by one pass over the catalog.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct ReadinessTally {
    pub total: f64,
    pub max_possible: f64,
    pub active_count: usize,
    pub critical_missing: Vec<String>,
}

impl ReadinessTally {
    /// Normalized score in [0, 100]; an empty catalog scores zero.
    pub fn percentage(&self) -> f64 {
        if self.max_possible <= 0.0 {
            return 0.0;
        }
        clamp_percentage(self.total / self.max_possible * 100.0)
    }
}

pub(crate) fn clamp_percentage(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

/// Step function rewarding fulfillments that have had time to settle.
pub fn age_multiplier(fulfilled_on: NaiveDate, as_of: NaiveDate) -> f64 {
    match full_years_between(fulfilled_on, as_of) {
        years if years < 5 => 0.6,
        5..=9 => 0.7,
        10..=24 => 0.85,
        25..=49 => 0.95,
        _ => 1.0,
    }
}

/// Confidence after folding in accumulated evidence, kept within [0, 1].
pub(crate) fn effective_confidence(condition: &Condition, evidence: &ScoreAdjustments) -> f64 {
    (condition.confidence_score + evidence.get(&condition.id)).clamp(0.0, 1.0)
}

pub(crate) fn score_conditions(
    conditions: &[Condition],
    evidence: &ScoreAdjustments,
    as_of: NaiveDate,
    config: &EngineConfig,
) -> ReadinessTally {
    let window_start = window_start(as_of, config.window_years);
    let mut tally = ReadinessTally::default();

    for condition in conditions {
        tally.max_possible += condition.weight;
        if matches!(condition.current_status, ConditionStatus::Expired) {
            continue;
        }
        let confidence = effective_confidence(condition, evidence);

        match condition.fulfillment_date {
            Some(fulfilled_on) => {
                if fulfilled_on >= window_start && fulfilled_on <= as_of {
                    tally.active_count += 1;
                    tally.total += condition.weight
                        * condition.current_status.score_multiplier()
                        * age_multiplier(fulfilled_on, as_of)
                        * confidence;
                }
            }
            None => match condition.current_status {
                ConditionStatus::Emerging { percentage } => {
                    if percentage > 0.0 {
                        tally.active_count += 1;
                        tally.total +=
                            condition.weight * percentage * config.emerging_damping * confidence;
                    }
                    if condition.weight >= config.critical_weight
                        && percentage < config.critical_emerging_ceiling
                    {
                        tally
                            .critical_missing
                            .push(condition.scripture_reference.clone());
                    }
                }
                ConditionStatus::NotMet if condition.weight >= config.critical_weight => {
                    tally
                        .critical_missing
                        .push(condition.scripture_reference.clone());
                }
                _ => {}
            },
        }
    }

    tally
}
