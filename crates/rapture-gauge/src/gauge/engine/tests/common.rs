use chrono::NaiveDate;

use crate::gauge::catalog::ConditionStore;
use crate::gauge::domain::{Category, Condition, ConditionId, ConditionStatus};
use crate::gauge::engine::{EngineConfig, ReadinessEngine};

pub(super) fn date(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").expect("valid date")
}

pub(super) fn fulfilled(id: &str, weight: f64, on: &str, confidence: f64) -> Condition {
    let on = date(on);
    Condition {
        id: ConditionId::new(id),
        category: Category::IsraelJerusalem,
        scripture_reference: format!("Ref {id}"),
        scripture_quote: String::new(),
        weight,
        current_status: ConditionStatus::Fulfilled { date: on },
        fulfillment_date: Some(on),
        confidence_score: confidence,
        data_source: "fixture".to_string(),
    }
}

pub(super) fn active(id: &str, weight: f64, since: &str, confidence: f64) -> Condition {
    let since = date(since);
    Condition {
        current_status: ConditionStatus::Active { since },
        fulfillment_date: Some(since),
        ..fulfilled(id, weight, "2000-01-01", confidence)
    }
}

pub(super) fn emerging(id: &str, weight: f64, percentage: f64, confidence: f64) -> Condition {
    Condition {
        current_status: ConditionStatus::Emerging { percentage },
        fulfillment_date: None,
        category: Category::Technology,
        ..fulfilled(id, weight, "2000-01-01", confidence)
    }
}

pub(super) fn not_met(id: &str, weight: f64) -> Condition {
    Condition {
        current_status: ConditionStatus::NotMet,
        fulfillment_date: None,
        category: Category::TemplePreparation,
        ..fulfilled(id, weight, "2000-01-01", 0.0)
    }
}

pub(super) fn engine_with(conditions: Vec<Condition>) -> ReadinessEngine {
    let store = ConditionStore::from_conditions(conditions).expect("valid fixture catalog");
    ReadinessEngine::new(store, EngineConfig::default())
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
