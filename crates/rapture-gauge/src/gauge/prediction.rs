use super::domain::{Condition, ConditionStatus, ReadinessScore};
use super::engine::EngineConfig;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Points of further readiness the projection estimates time for.
const PROJECTION_SPAN: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    VeryHigh,
    High,
    Moderate,
}

impl ConfidenceLevel {
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage > 85.0 {
            Self::VeryHigh
        } else if percentage > 70.0 {
            Self::High
        } else {
            Self::Moderate
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::VeryHigh => "Very High",
            Self::High => "High",
            Self::Moderate => "Moderate",
        }
    }
}

/// Years until readiness gains another twenty points at the current rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "years", rename_all = "snake_case")]
pub enum Projection {
    Years(u32),
    Unbounded,
}

impl Projection {
    pub fn from_acceleration(acceleration: f64) -> Self {
        if acceleration > 0.0 && acceleration.is_finite() {
            Self::Years((PROJECTION_SPAN / acceleration) as u32)
        } else {
            Self::Unbounded
        }
    }

    pub fn describe(self) -> String {
        match self {
            Projection::Years(years) => format!("within {years} years"),
            Projection::Unbounded => "with no projected horizon".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub current_reading: String,
    pub confidence: ConfidenceLevel,
    pub critical_missing: Vec<Condition>,
    pub projection: String,
    pub projected_years: Projection,
    pub analysis: String,
}

pub fn generate_prediction(
    score: &ReadinessScore,
    acceleration: f64,
    conditions: &[Condition],
    as_of: NaiveDate,
    config: &EngineConfig,
) -> Prediction {
    let critical_missing: Vec<Condition> = conditions
        .iter()
        .filter(|condition| {
            condition.weight >= config.critical_weight
                && !condition.is_active_in_window(as_of, config.window_years)
        })
        .cloned()
        .collect();

    let projected_years = Projection::from_acceleration(acceleration);
    let analysis = compose_analysis(
        score,
        acceleration,
        projected_years,
        conditions,
        &critical_missing,
        as_of,
        config,
    );

    Prediction {
        current_reading: score.clock_reading.clone(),
        confidence: ConfidenceLevel::from_percentage(score.percentage),
        critical_missing,
        projection: format!("Convergence accelerating at {acceleration:.1}% annually"),
        projected_years,
        analysis,
    }
}

fn compose_analysis(
    score: &ReadinessScore,
    acceleration: f64,
    projected_years: Projection,
    conditions: &[Condition],
    critical_missing: &[Condition],
    as_of: NaiveDate,
    config: &EngineConfig,
) -> String {
    let fulfilled: Vec<String> = conditions
        .iter()
        .filter(|condition| {
            matches!(condition.current_status, ConditionStatus::Fulfilled { .. })
                && condition.is_active_in_window(as_of, config.window_years)
        })
        .map(|condition| match condition.fulfillment_date {
            Some(date) => format!("{} ({})", condition.scripture_reference, date.format("%Y")),
            None => condition.scripture_reference.clone(),
        })
        .collect();

    let emerging: Vec<&str> = conditions
        .iter()
        .filter(|condition| {
            matches!(
                condition.current_status,
                ConditionStatus::Emerging { percentage } if percentage >= config.critical_emerging_ceiling
            )
        })
        .map(|condition| condition.scripture_reference.as_str())
        .collect();

    let developing: Vec<&str> = critical_missing
        .iter()
        .map(|condition| condition.scripture_reference.as_str())
        .collect();

    let list = |items: &[&str]| {
        if items.is_empty() {
            "none".to_string()
        } else {
            items.join(", ")
        }
    };
    let fulfilled_refs: Vec<&str> = fulfilled.iter().map(String::as_str).collect();

    format!(
        "Based on {active} active conditions within the current {window}-year window, \
         convergence is at {percentage:.1}%.\n\n\
         Critical fulfilled: {fulfilled}\n\n\
         Emerging rapidly: {emerging}\n\n\
         Still developing: {developing}\n\n\
         At current acceleration rate of {acceleration:.1}% per year, full convergence possible {horizon}.",
        active = score.active_conditions,
        window = config.window_years,
        percentage = score.percentage,
        fulfilled = list(&fulfilled_refs),
        emerging = list(&emerging),
        developing = list(&developing),
        horizon = projected_years.describe(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_labels_follow_thresholds() {
        assert_eq!(ConfidenceLevel::from_percentage(85.1), ConfidenceLevel::VeryHigh);
        assert_eq!(ConfidenceLevel::from_percentage(85.0), ConfidenceLevel::High);
        assert_eq!(ConfidenceLevel::from_percentage(70.0), ConfidenceLevel::Moderate);
        assert_eq!(ConfidenceLevel::VeryHigh.label(), "Very High");
    }

    #[test]
    fn projection_truncates_years_and_handles_flat_rate() {
        assert_eq!(Projection::from_acceleration(3.0), Projection::Years(6));
        assert_eq!(Projection::from_acceleration(0.5), Projection::Years(40));
        assert_eq!(Projection::from_acceleration(0.0), Projection::Unbounded);
        assert_eq!(Projection::from_acceleration(-4.0), Projection::Unbounded);
    }
}
