use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use rapture_gauge::gauge::catalog::{ConditionStore, SeedCatalog};
use rapture_gauge::gauge::domain::{Condition, ConditionId};
use rapture_gauge::gauge::engine::{EngineConfig, ReadinessEngine, SharedEngine};
use rapture_gauge::gauge::enrichment::{
    Earthquake, EarthquakeFeed, EnrichmentError, EnrichmentPipeline, EnrichmentSettings,
    NewsArticle, NewsSource, RelevanceAssessment, RelevanceClassifier,
};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
}

fn article(title: &str, url: &str, hours_old: i64) -> NewsArticle {
    NewsArticle {
        title: title.to_string(),
        description: String::new(),
        content: None,
        url: url.to_string(),
        published_at: now() - Duration::hours(hours_old),
        source: "Wire".to_string(),
    }
}

struct FixtureNews;

#[async_trait]
impl NewsSource for FixtureNews {
    async fn search(&self, query: &str) -> Result<Vec<NewsArticle>, EnrichmentError> {
        let fresh = article(
            "Israel and Jerusalem tensions at the Temple Mount",
            "https://news.example/temple-mount",
            1,
        );
        match query {
            "Israel Jerusalem" => Ok(vec![
                fresh,
                article(
                    "Israel and Jerusalem weekly roundup",
                    "https://news.example/roundup",
                    72,
                ),
                article("Local elections in Israel", "https://news.example/elections", 2),
            ]),
            "Temple Mount" => Ok(vec![fresh]),
            _ => Err(EnrichmentError::Transport("connection reset".into())),
        }
    }
}

struct FixtureClassifier;

#[async_trait]
impl RelevanceClassifier for FixtureClassifier {
    async fn classify(
        &self,
        _article: &NewsArticle,
        condition: &Condition,
    ) -> Result<RelevanceAssessment, EnrichmentError> {
        let (relevance_score, confidence, is_advancement) = match condition.id.as_str() {
            "zechariah-12-3" => (0.9, 0.8, true),
            "isaiah-66-8" => (0.8, 0.9, false),
            "numbers-19" => return Err(EnrichmentError::QuotaExhausted),
            _ => (0.3, 0.9, true),
        };
        Ok(RelevanceAssessment {
            relevance_score,
            confidence,
            key_indicators: vec!["Jerusalem".to_string()],
            is_advancement,
            temporal_proximity: "near-term".to_string(),
            summary: format!("assessment for {}", condition.id),
        })
    }
}

struct FixtureQuakes;

#[async_trait]
impl EarthquakeFeed for FixtureQuakes {
    async fn recent(&self, _min_magnitude: f64, _days: u32) -> Result<Vec<Earthquake>, EnrichmentError> {
        let quake = |id: &str, magnitude: f64, location: &str, latitude: f64, longitude: f64| {
            Earthquake {
                id: id.to_string(),
                magnitude,
                location: location.to_string(),
                latitude,
                longitude,
                depth_km: 10.0,
                time: now() - Duration::days(1),
            }
        };
        Ok(vec![
            quake("us1", 5.5, "Chile", -33.0, -71.0),
            quake("us2", 7.2, "Japan", 36.0, 140.0),
            quake("us3", 4.6, "Nevada", 38.0, -117.0),
        ])
    }
}

fn seed_engine() -> SharedEngine {
    let store = ConditionStore::load(&SeedCatalog).expect("seed catalog");
    let mut engine = ReadinessEngine::new(store, EngineConfig::default());
    engine.refresh(now().date_naive());
    engine.into_shared()
}

fn settings() -> EnrichmentSettings {
    EnrichmentSettings {
        queries: vec![
            "Israel Jerusalem".to_string(),
            "earthquake".to_string(),
            "Temple Mount".to_string(),
        ],
        ..EnrichmentSettings::default()
    }
}

#[tokio::test]
async fn pipeline_accumulates_gated_evidence_without_recomputing() {
    let engine = seed_engine();
    let before = engine.read().await.current_score().clone();

    let pipeline = EnrichmentPipeline::new(
        Arc::new(FixtureNews),
        Arc::new(FixtureClassifier),
        settings(),
    )
    .with_earthquake_feed(Arc::new(FixtureQuakes));

    let report = pipeline.run(&engine, now()).await;

    assert_eq!(report.articles_fetched, 4);
    assert_eq!(report.articles_analyzed, 1);
    assert_eq!(report.classifications, 14);
    assert_eq!(report.relevant_assessments, 2);
    assert_eq!(report.adapter_failures, 2);
    assert_eq!(report.earthquakes, 3);
    assert_eq!(report.major_earthquakes, 1);

    let zechariah = ConditionId::new("zechariah-12-3");
    let quakes = ConditionId::new("matthew-24-7-famines");
    assert!((report.adjustments.get(&zechariah) - 0.072).abs() < 1e-12);
    assert!((report.adjustments.get(&quakes) - 0.0004).abs() < 1e-12);
    assert_eq!(report.adjustments.get(&ConditionId::new("isaiah-66-8")), 0.0);

    let mut guard = engine.write().await;
    assert_eq!(guard.current_score(), &before);
    assert!(guard.history_is_stale());
    assert!((guard.evidence().get(&zechariah) - 0.072).abs() < 1e-12);

    guard.refresh(now().date_naive());
    assert!(guard.current_score().percentage > before.percentage);
}

#[tokio::test]
async fn adjustments_for_unknown_conditions_are_dropped() {
    let engine = seed_engine();
    let pipeline = EnrichmentPipeline::new(
        Arc::new(FixtureNews),
        Arc::new(FixtureClassifier),
        EnrichmentSettings {
            queries: Vec::new(),
            seismic_condition: ConditionId::new("retired-condition"),
            ..EnrichmentSettings::default()
        },
    )
    .with_earthquake_feed(Arc::new(FixtureQuakes));

    let report = pipeline.run(&engine, now()).await;

    assert_eq!(report.articles_fetched, 0);
    assert_eq!(report.adjustments.len(), 1);
    let guard = engine.read().await;
    assert!(guard.evidence().is_empty());
    assert!(!guard.history_is_stale());
}

#[tokio::test]
async fn seismic_evidence_raises_readiness_after_refresh() {
    let engine = seed_engine();
    let before = engine.read().await.current_score().percentage;

    let pipeline = EnrichmentPipeline::new(
        Arc::new(FixtureNews),
        Arc::new(FixtureClassifier),
        EnrichmentSettings {
            queries: Vec::new(),
            ..EnrichmentSettings::default()
        },
    )
    .with_earthquake_feed(Arc::new(FixtureQuakes));

    let report = pipeline.run(&engine, now()).await;
    assert_eq!(report.adjustments.len(), 1);

    let mut guard = engine.write().await;
    let target = EnrichmentSettings::default().seismic_condition;
    assert!(guard
        .condition(&target)
        .is_some_and(|condition| condition.is_active_in_window(now().date_naive(), 100)));
    assert!(guard.evidence().get(&target) > 0.0);

    let after = guard.refresh(now().date_naive()).percentage;
    assert!(after > before, "seismic evidence left the score at {before}");
}
