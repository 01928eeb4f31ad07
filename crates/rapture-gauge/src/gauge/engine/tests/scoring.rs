use super::common::*;
use crate::gauge::catalog::{ConditionStore, SeedCatalog};
use crate::gauge::domain::{ConditionId, ConditionStatus};
use crate::gauge::engine::{age_multiplier, EngineConfig, EngineError, ReadinessEngine};

#[test]
fn all_not_met_scores_zero() {
    let engine = engine_with(vec![not_met("a", 9.0), not_met("b", 6.0), not_met("c", 10.0)]);

    let score = engine.calculate_readiness(date("2024-01-01"));

    assert_eq!(score.percentage, 0.0);
    assert_eq!(score.active_conditions, 0);
    assert_eq!(score.clock_reading, "9:00 PM");
    assert_eq!(score.critical_missing, vec!["Ref a", "Ref c"]);
}

#[test]
fn settled_fulfillments_reach_one_hundred() {
    let engine = engine_with(vec![
        fulfilled("a", 10.0, "1948-05-14", 1.0),
        fulfilled("b", 7.0, "1960-01-01", 1.0),
        fulfilled("c", 5.5, "1967-06-07", 1.0),
    ]);

    let score = engine.calculate_readiness(date("2024-01-01"));

    assert_eq!(score.percentage, 100.0);
    assert_eq!(score.active_conditions, 3);
    assert_eq!(score.clock_reading, "11:59 PM");
    assert!(score.critical_missing.is_empty());
}

#[test]
fn israel_scenario_scores_full_marks() {
    let engine = engine_with(vec![fulfilled("israel", 10.0, "1948-05-14", 1.0)]);

    let score = engine.calculate_readiness(date("2024-01-01"));

    assert_eq!(score.active_conditions, 1);
    assert_eq!(score.percentage, 100.0);
}

#[test]
fn open_ended_emerging_condition_is_damped() {
    let engine = engine_with(vec![emerging("mark", 9.0, 0.75, 0.8)]);

    let score = engine.calculate_readiness(date("2024-01-01"));

    // 9 * 0.75 * 0.5 * 0.8 = 2.7 of a possible 9.
    assert_close(score.percentage, 30.0);
    assert_eq!(score.active_conditions, 1);
    assert!(score.critical_missing.is_empty());
}

#[test]
fn empty_catalog_scores_zero_instead_of_nan() {
    let engine = engine_with(Vec::new());

    let score = engine.calculate_readiness(date("2024-01-01"));

    assert_eq!(score.percentage, 0.0);
    assert_eq!(score.clock_reading, "9:00 PM");
    assert_eq!(score.active_conditions, 0);
}

#[test]
fn age_multiplier_steps_exactly_on_anniversaries() {
    let cases = [
        ("2019-01-01", "2023-12-31", 0.6),
        ("2019-01-01", "2024-01-01", 0.7),
        ("2014-01-01", "2023-12-31", 0.7),
        ("2014-01-01", "2024-01-01", 0.85),
        ("1999-01-01", "2023-12-31", 0.85),
        ("1999-01-01", "2024-01-01", 0.95),
        ("1974-01-01", "2023-12-31", 0.95),
        ("1974-01-01", "2024-01-01", 1.0),
    ];

    for (fulfilled_on, as_of, expected) in cases {
        assert_eq!(
            age_multiplier(date(fulfilled_on), date(as_of)),
            expected,
            "{fulfilled_on} -> {as_of}"
        );

        let engine = engine_with(vec![fulfilled("x", 10.0, fulfilled_on, 1.0)]);
        let score = engine.calculate_readiness(date(as_of));
        assert_close(score.percentage, expected * 100.0);
    }
}

#[test]
fn window_start_is_inclusive() {
    let as_of = date("2024-01-01");

    let on_boundary = engine_with(vec![fulfilled("edge", 10.0, "1924-01-01", 1.0)]);
    let score = on_boundary.calculate_readiness(as_of);
    assert_eq!(score.active_conditions, 1);
    assert_eq!(score.percentage, 100.0);

    let day_before = engine_with(vec![fulfilled("edge", 10.0, "1923-12-31", 1.0)]);
    let score = day_before.calculate_readiness(as_of);
    assert_eq!(score.active_conditions, 0);
    assert_eq!(score.percentage, 0.0);
    assert!(
        score.critical_missing.is_empty(),
        "dated conditions leaving the window are not reported missing"
    );
}

#[test]
fn future_fulfillment_does_not_count_yet() {
    let engine = engine_with(vec![fulfilled("later", 10.0, "2030-01-01", 1.0)]);

    let score = engine.calculate_readiness(date("2024-01-01"));

    assert_eq!(score.active_conditions, 0);
    assert_eq!(score.percentage, 0.0);
}

#[test]
fn active_status_uses_point_eight_multiplier() {
    let engine = engine_with(vec![active("zech", 9.0, "1967-06-07", 0.95)]);

    let score = engine.calculate_readiness(date("2024-01-01"));

    // 9 * 0.8 * 1.0 (age 56) * 0.95 of 9.
    assert_close(score.percentage, 76.0);
}

#[test]
fn critical_missing_tracks_high_weight_open_conditions() {
    let engine = engine_with(vec![
        not_met("covenant", 9.0),
        not_met("minor", 7.0),
        emerging("temple", 9.0, 0.3, 0.4),
        emerging("governance", 8.0, 0.5, 0.6),
        emerging("stalled", 8.0, 0.0, 0.6),
    ]);

    let score = engine.calculate_readiness(date("2024-01-01"));

    assert_eq!(
        score.critical_missing,
        vec!["Ref covenant", "Ref temple", "Ref stalled"]
    );
    assert_eq!(score.active_conditions, 2);
}

#[test]
fn calculation_is_bit_identical_across_calls() {
    let store = ConditionStore::load(&SeedCatalog).expect("seed catalog");
    let engine = ReadinessEngine::new(store, EngineConfig::default());
    let as_of = date("2025-07-04");

    let first = engine.calculate_readiness(as_of);
    let second = engine.calculate_readiness(as_of);

    assert_eq!(first.percentage.to_bits(), second.percentage.to_bits());
    assert_eq!(first, second);
}

#[test]
fn seed_catalog_reference_reading() {
    let store = ConditionStore::load(&SeedCatalog).expect("seed catalog");
    let engine = ReadinessEngine::new(store, EngineConfig::default());

    let score = engine.calculate_readiness(date("2024-01-01"));

    assert_eq!(score.active_conditions, 20);
    assert_eq!(
        score.critical_missing,
        vec!["Daniel 9:27", "2 Thessalonians 2:4"]
    );
    assert!(score.percentage > 0.0 && score.percentage < 100.0);
}

#[test]
fn evidence_raises_effective_confidence_without_recomputing() {
    let mut engine = engine_with(vec![fulfilled("a", 10.0, "1948-05-14", 0.5)]);
    let as_of = date("2024-01-01");
    let id = ConditionId::new("a");

    engine.refresh(as_of);
    assert_close(engine.current_score().percentage, 50.0);

    engine.apply_score_adjustment(&id, 0.25).expect("known condition");
    engine.apply_score_adjustment(&id, 0.125).expect("known condition");

    assert_close(engine.current_score().percentage, 50.0);
    assert!(engine.history_is_stale());
    assert_eq!(engine.condition(&id).map(|c| c.confidence_score), Some(0.5));

    engine.refresh(as_of);
    assert_close(engine.current_score().percentage, 87.5);

    engine.apply_score_adjustment(&id, 4.0).expect("known condition");
    engine.refresh(as_of);
    assert_eq!(engine.current_score().percentage, 100.0);
}

#[test]
fn evidence_cannot_lift_zero_multiplier_conditions() {
    let mut engine = engine_with(vec![not_met("covenant", 9.0)]);
    engine
        .apply_score_adjustment(&ConditionId::new("covenant"), 0.9)
        .expect("known condition");

    let score = engine.calculate_readiness(date("2024-01-01"));

    assert_eq!(score.percentage, 0.0);
}

#[test]
fn adjustments_are_rejected_for_unknown_or_non_finite_input() {
    let mut engine = engine_with(vec![not_met("covenant", 9.0)]);

    let err = engine
        .apply_score_adjustment(&ConditionId::new("missing"), 0.1)
        .expect_err("unknown id");
    assert!(matches!(err, EngineError::UnknownCondition(_)));

    let err = engine
        .apply_score_adjustment(&ConditionId::new("covenant"), f64::NAN)
        .expect_err("nan rejected");
    assert!(matches!(err, EngineError::InvalidAdjustment(_)));
}

#[test]
fn status_and_confidence_updates_flow_through_scoring() {
    let mut engine = engine_with(vec![not_met("covenant", 10.0)]);
    let id = ConditionId::new("covenant");
    let as_of = date("2024-01-01");

    engine
        .update_condition_status(&id, ConditionStatus::Emerging { percentage: 0.4 })
        .expect("valid status");
    engine
        .update_condition_confidence(&id, 1.0)
        .expect("valid confidence");

    let score = engine.calculate_readiness(as_of);
    assert_close(score.percentage, 20.0);
    assert_eq!(score.critical_missing, vec!["Ref covenant"]);

    assert!(matches!(
        engine.update_condition_confidence(&id, 1.5),
        Err(EngineError::InvalidConfidence(_))
    ));
    assert!(engine
        .update_condition_status(&id, ConditionStatus::Emerging { percentage: -0.1 })
        .is_err());
}

#[test]
fn expired_condition_keeps_weight_but_stops_counting() {
    let mut engine = engine_with(vec![
        fulfilled("kept", 10.0, "1948-05-14", 1.0),
        fulfilled("retired", 10.0, "1948-05-14", 1.0),
    ]);
    let as_of = date("2024-01-01");
    let retired = ConditionId::new("retired");

    engine
        .update_condition_status(&retired, ConditionStatus::Expired)
        .expect("known condition");

    let score = engine.calculate_readiness(as_of);
    assert_eq!(score.active_conditions, 1);
    assert_close(score.percentage, 50.0);
    assert!(score.critical_missing.is_empty());

    let expired = engine.condition(&retired).expect("still catalogued");
    assert_eq!(expired.fulfillment_date, Some(date("1948-05-14")));
    assert!(!expired.is_active_in_window(as_of, 100));
    assert_eq!(engine.critical_active_conditions(as_of).len(), 1);
}
