use super::evidence::{filter_relevant_articles, is_article_relevant_to, EVIDENCE_SCALE, SEARCH_QUERIES};
use super::seismic::activity_score;
use super::{
    EarthquakeFeed, EnrichmentError, NewsArticle, NewsSource, RelevanceAssessment,
    RelevanceClassifier, ScoreAdjustments,
};
use crate::gauge::domain::{Condition, ConditionId};
use crate::gauge::engine::SharedEngine;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct EnrichmentSettings {
    pub queries: Vec<String>,
    /// Condition receiving the seismic activity adjustment. It must be dated
    /// inside the window (or undated) for the evidence to move the score.
    pub seismic_condition: ConditionId,
    pub earthquake_min_magnitude: f64,
    pub earthquake_days: u32,
}

impl Default for EnrichmentSettings {
    fn default() -> Self {
        Self {
            queries: SEARCH_QUERIES.iter().map(|q| q.to_string()).collect(),
            seismic_condition: ConditionId::new("matthew-24-7-famines"),
            earthquake_min_magnitude: 5.0,
            earthquake_days: 7,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct EnrichmentReport {
    pub articles_fetched: usize,
    pub articles_analyzed: usize,
    pub classifications: usize,
    pub relevant_assessments: usize,
    pub earthquakes: usize,
    pub major_earthquakes: usize,
    pub adapter_failures: usize,
    pub adjustments: ScoreAdjustments,
}

/// Gathers external evidence and hands it to the engine as score adjustments.
///
/// Adapter failures are logged and counted; they never reach the engine. The
/// pipeline does not recompute the score.
pub struct EnrichmentPipeline {
    news: Arc<dyn NewsSource>,
    classifier: Arc<dyn RelevanceClassifier>,
    earthquakes: Option<Arc<dyn EarthquakeFeed>>,
    settings: EnrichmentSettings,
}

impl EnrichmentPipeline {
    pub fn new(
        news: Arc<dyn NewsSource>,
        classifier: Arc<dyn RelevanceClassifier>,
        settings: EnrichmentSettings,
    ) -> Self {
        Self {
            news,
            classifier,
            earthquakes: None,
            settings,
        }
    }

    pub fn with_earthquake_feed(mut self, feed: Arc<dyn EarthquakeFeed>) -> Self {
        self.earthquakes = Some(feed);
        self
    }

    pub async fn run(&self, engine: &SharedEngine, now: DateTime<Utc>) -> EnrichmentReport {
        let mut report = EnrichmentReport::default();

        let articles = self.fetch_articles(&mut report).await;
        let articles = filter_relevant_articles(articles, now);
        report.articles_analyzed = articles.len();

        let conditions: Vec<Condition> = engine.read().await.conditions().to_vec();
        for (condition_id, assessment) in self.classify(articles, &conditions, &mut report).await {
            if !assessment.is_relevant() {
                continue;
            }
            report.relevant_assessments += 1;
            if let Some(increase) = assessment.score_increase() {
                report.adjustments.record(condition_id, increase);
            }
        }

        if let Some(feed) = &self.earthquakes {
            self.fold_seismic_activity(feed.as_ref(), &mut report).await;
        }

        let mut guard = engine.write().await;
        for (id, delta) in report.adjustments.iter() {
            if let Err(err) = guard.apply_score_adjustment(id, delta) {
                warn!(condition = %id, error = %err, "dropping score adjustment");
            }
        }
        drop(guard);

        info!(
            fetched = report.articles_fetched,
            analyzed = report.articles_analyzed,
            relevant = report.relevant_assessments,
            adjusted = report.adjustments.len(),
            failures = report.adapter_failures,
            "enrichment pass complete"
        );
        report
    }

    async fn fetch_articles(&self, report: &mut EnrichmentReport) -> Vec<NewsArticle> {
        let mut seen = HashSet::new();
        let mut articles = Vec::new();

        for query in &self.settings.queries {
            match self.news.search(query).await {
                Ok(found) => {
                    report.articles_fetched += found.len();
                    articles.extend(
                        found
                            .into_iter()
                            .filter(|article| seen.insert(article.url.clone())),
                    );
                }
                Err(err) => {
                    report.adapter_failures += 1;
                    warn!(%query, error = %err, "news search failed");
                }
            }
        }

        articles
    }

    async fn classify(
        &self,
        articles: Vec<NewsArticle>,
        conditions: &[Condition],
        report: &mut EnrichmentReport,
    ) -> Vec<(ConditionId, RelevanceAssessment)> {
        let mut tasks: JoinSet<(ConditionId, Result<RelevanceAssessment, EnrichmentError>)> =
            JoinSet::new();

        for article in articles {
            let article = Arc::new(article);
            for condition in conditions
                .iter()
                .filter(|condition| is_article_relevant_to(&article, condition))
            {
                let classifier = Arc::clone(&self.classifier);
                let article = Arc::clone(&article);
                let condition = condition.clone();
                tasks.spawn(async move {
                    let result = classifier.classify(&article, &condition).await;
                    (condition.id, result)
                });
            }
        }

        let mut assessments = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((id, Ok(assessment))) => {
                    report.classifications += 1;
                    assessments.push((id, assessment));
                }
                Ok((id, Err(err))) => {
                    report.adapter_failures += 1;
                    debug!(condition = %id, error = %err, "classification failed");
                }
                Err(err) => {
                    report.adapter_failures += 1;
                    warn!(error = %err, "classification task aborted");
                }
            }
        }

        assessments
    }

    async fn fold_seismic_activity(&self, feed: &dyn EarthquakeFeed, report: &mut EnrichmentReport) {
        match feed
            .recent(
                self.settings.earthquake_min_magnitude,
                self.settings.earthquake_days,
            )
            .await
        {
            Ok(quakes) => {
                report.earthquakes = quakes.len();
                report.major_earthquakes = quakes.iter().filter(|q| q.is_major()).count();
                let activity = activity_score(&quakes);
                debug!(activity, quakes = quakes.len(), "earthquake activity scored");
                if activity > 0.0 {
                    report
                        .adjustments
                        .record(self.settings.seismic_condition.clone(), activity * EVIDENCE_SCALE);
                }
            }
            Err(err) => {
                report.adapter_failures += 1;
                warn!(error = %err, "earthquake feed failed");
            }
        }
    }
}
