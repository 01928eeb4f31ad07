use crate::gauge::domain::{Category, Condition};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Relevance below or at this score is discarded.
pub const RELEVANCE_THRESHOLD: f64 = 0.7;
/// Classifier confidence required before an advancement moves the score.
pub const ADVANCEMENT_CONFIDENCE: f64 = 0.6;
/// Caps how far a single article can move a condition.
pub const EVIDENCE_SCALE: f64 = 0.1;

const ARTICLE_MAX_AGE_HOURS: i64 = 48;
const MIN_KEYWORD_MATCHES: usize = 2;

pub const PROPHECY_KEYWORDS: [&str; 16] = [
    "Israel",
    "Jerusalem",
    "Temple",
    "Iran",
    "Russia",
    "Turkey",
    "earthquake",
    "CBDC",
    "digital currency",
    "persecution",
    "Christian",
    "peace",
    "treaty",
    "covenant",
    "red heifer",
    "sacrifice",
];

pub const SEARCH_QUERIES: [&str; 10] = [
    "Israel Jerusalem",
    "Temple Mount",
    "digital currency CBDC",
    "Russia Iran alliance",
    "Christian persecution",
    "earthquake",
    "red heifer",
    "Third Temple",
    "peace treaty Middle East",
    "cashless society",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsArticle {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub content: Option<String>,
    pub url: String,
    pub published_at: DateTime<Utc>,
    pub source: String,
}

impl NewsArticle {
    fn searchable_text(&self) -> String {
        format!(
            "{} {} {}",
            self.title,
            self.description,
            self.content.as_deref().unwrap_or_default()
        )
        .to_lowercase()
    }
}

/// Opaque classification produced by an external relevance model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelevanceAssessment {
    pub relevance_score: f64,
    pub confidence: f64,
    #[serde(default)]
    pub key_indicators: Vec<String>,
    pub is_advancement: bool,
    #[serde(default)]
    pub temporal_proximity: String,
    pub summary: String,
}

impl RelevanceAssessment {
    pub fn is_relevant(&self) -> bool {
        self.relevance_score > RELEVANCE_THRESHOLD
    }

    /// Score delta this assessment contributes, if any.
    pub fn score_increase(&self) -> Option<f64> {
        if self.is_relevant() && self.is_advancement && self.confidence > ADVANCEMENT_CONFIDENCE {
            Some(self.relevance_score * self.confidence * EVIDENCE_SCALE)
        } else {
            None
        }
    }
}

/// Recent articles mentioning at least two prophecy keywords.
pub fn filter_relevant_articles(articles: Vec<NewsArticle>, now: DateTime<Utc>) -> Vec<NewsArticle> {
    let cutoff = now - Duration::hours(ARTICLE_MAX_AGE_HOURS);
    articles
        .into_iter()
        .filter(|article| article.published_at > cutoff)
        .filter(|article| {
            let text = article.searchable_text();
            PROPHECY_KEYWORDS
                .iter()
                .filter(|keyword| text.contains(&keyword.to_lowercase()))
                .count()
                >= MIN_KEYWORD_MATCHES
        })
        .collect()
}

/// Cheap keyword gate deciding whether an article is worth classifying against a condition.
pub fn is_article_relevant_to(article: &NewsArticle, condition: &Condition) -> bool {
    let text = format!("{} {}", article.title, article.description).to_lowercase();
    let any = |words: &[&str]| words.iter().any(|word| text.contains(word));

    match condition.category {
        Category::IsraelJerusalem => any(&["israel", "jerusalem", "temple"]),
        Category::Technology => any(&["digital", "cbdc", "ai", "surveillance"]),
        Category::Geopolitical => any(&["russia", "iran", "turkey", "china"]),
        Category::NaturalDisasters => any(&["earthquake", "disaster", "famine"]),
        Category::Persecution => any(&["christian", "persecution", "church"]),
        _ => true,
    }
}
