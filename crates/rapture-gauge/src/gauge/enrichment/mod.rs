//! Contracts for the optional evidence adapters (news, relevance model,
//! earthquake feed) and the pipeline that folds their output into the
//! engine. Network clients live outside this crate; they only need to
//! implement the traits below.

mod adjustments;
pub mod evidence;
mod pipeline;
pub mod seismic;

pub use adjustments::ScoreAdjustments;
pub use evidence::{NewsArticle, RelevanceAssessment};
pub use pipeline::{EnrichmentPipeline, EnrichmentReport, EnrichmentSettings};
pub use seismic::{Earthquake, EarthquakeFrequency};

use super::domain::Condition;
use async_trait::async_trait;

#[async_trait]
pub trait NewsSource: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<NewsArticle>, EnrichmentError>;
}

/// External relevance model (typically an LLM) scoring an article against a condition.
#[async_trait]
pub trait RelevanceClassifier: Send + Sync {
    async fn classify(
        &self,
        article: &NewsArticle,
        condition: &Condition,
    ) -> Result<RelevanceAssessment, EnrichmentError>;
}

#[async_trait]
pub trait EarthquakeFeed: Send + Sync {
    async fn recent(&self, min_magnitude: f64, days: u32) -> Result<Vec<Earthquake>, EnrichmentError>;
}

#[derive(Debug, thiserror::Error)]
pub enum EnrichmentError {
    #[error("adapter transport failed: {0}")]
    Transport(String),
    #[error("classification failed: {0}")]
    Classification(String),
    #[error("adapter quota exhausted")]
    QuotaExhausted,
}
