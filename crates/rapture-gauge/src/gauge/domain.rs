use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of a catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConditionId(pub String);

impl ConditionId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConditionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    IsraelJerusalem,
    Technology,
    Geopolitical,
    NaturalDisasters,
    MoralDecline,
    GospelReach,
    Persecution,
    Deception,
    TemplePreparation,
    GlobalSigns,
}

impl Category {
    pub const fn ordered() -> [Self; 10] {
        [
            Self::IsraelJerusalem,
            Self::Technology,
            Self::Geopolitical,
            Self::NaturalDisasters,
            Self::MoralDecline,
            Self::GospelReach,
            Self::Persecution,
            Self::Deception,
            Self::TemplePreparation,
            Self::GlobalSigns,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::IsraelJerusalem => "Israel & Jerusalem",
            Self::Technology => "Technology & Control",
            Self::Geopolitical => "Geopolitical",
            Self::NaturalDisasters => "Natural Disasters",
            Self::MoralDecline => "Moral Decline",
            Self::GospelReach => "Gospel Reach",
            Self::Persecution => "Persecution",
            Self::Deception => "False Prophets",
            Self::TemplePreparation => "Temple Preparation",
            Self::GlobalSigns => "Global Signs",
        }
    }

    /// Display/grouping weight of the category. Not used by the scoring formula.
    pub const fn weight(self) -> u8 {
        match self {
            Self::IsraelJerusalem | Self::TemplePreparation => 10,
            Self::Technology => 9,
            Self::Geopolitical | Self::GospelReach => 8,
            Self::NaturalDisasters | Self::GlobalSigns => 7,
            Self::MoralDecline | Self::Deception => 6,
            Self::Persecution => 5,
        }
    }

    pub const fn color(self) -> &'static str {
        match self {
            Self::IsraelJerusalem => "blue",
            Self::Technology => "purple",
            Self::Geopolitical | Self::Persecution => "red",
            Self::NaturalDisasters => "orange",
            Self::MoralDecline => "gray",
            Self::GospelReach => "green",
            Self::Deception => "yellow",
            Self::TemplePreparation => "indigo",
            Self::GlobalSigns => "cyan",
        }
    }

    /// Snake-case key matching the serde representation.
    pub const fn key(self) -> &'static str {
        match self {
            Self::IsraelJerusalem => "israel_jerusalem",
            Self::Technology => "technology",
            Self::Geopolitical => "geopolitical",
            Self::NaturalDisasters => "natural_disasters",
            Self::MoralDecline => "moral_decline",
            Self::GospelReach => "gospel_reach",
            Self::Persecution => "persecution",
            Self::Deception => "deception",
            Self::TemplePreparation => "temple_preparation",
            Self::GlobalSigns => "global_signs",
        }
    }

    /// Accepts either the display label or the snake-case key.
    pub fn from_label(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        let normalized = trimmed.to_ascii_lowercase().replace([' ', '-'], "_");
        Self::ordered()
            .into_iter()
            .find(|category| {
                category.label().eq_ignore_ascii_case(trimmed) || category.key() == normalized
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ConditionStatus {
    NotMet,
    Emerging { percentage: f64 },
    Active { since: NaiveDate },
    Fulfilled { date: NaiveDate },
    Expired,
}

impl ConditionStatus {
    pub fn score_multiplier(&self) -> f64 {
        match self {
            ConditionStatus::NotMet | ConditionStatus::Expired => 0.0,
            ConditionStatus::Emerging { percentage } => *percentage,
            ConditionStatus::Active { .. } => 0.8,
            ConditionStatus::Fulfilled { .. } => 1.0,
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            ConditionStatus::NotMet => "Not Met",
            ConditionStatus::Emerging { .. } => "Emerging",
            ConditionStatus::Active { .. } => "Active",
            ConditionStatus::Fulfilled { .. } => "Fulfilled",
            ConditionStatus::Expired => "Expired",
        }
    }
}

/// A single prophetic claim tracked over time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub id: ConditionId,
    pub category: Category,
    pub scripture_reference: String,
    pub scripture_quote: String,
    pub weight: f64,
    pub current_status: ConditionStatus,
    #[serde(default)]
    pub fulfillment_date: Option<NaiveDate>,
    pub confidence_score: f64,
    #[serde(default)]
    pub data_source: String,
}

impl Condition {
    /// True when the fulfillment date lies in `[as_of - window, as_of]`.
    /// Expired conditions never count, whatever date they still carry.
    pub fn is_active_in_window(&self, as_of: NaiveDate, window_years: u32) -> bool {
        if matches!(self.current_status, ConditionStatus::Expired) {
            return false;
        }
        match self.fulfillment_date {
            Some(fulfilled) => fulfilled >= window_start(as_of, window_years) && fulfilled <= as_of,
            None => false,
        }
    }

    /// First day on which the fulfillment no longer counts toward the score.
    pub fn window_exit_date(&self, window_years: u32) -> Option<NaiveDate> {
        self.fulfillment_date
            .and_then(|date| date.checked_add_months(Months::new(window_years.saturating_mul(12))))
            .and_then(|date| date.succ_opt())
    }
}

/// Start of the rolling relevance horizon for `as_of`.
pub fn window_start(as_of: NaiveDate, window_years: u32) -> NaiveDate {
    as_of
        .checked_sub_months(Months::new(window_years.saturating_mul(12)))
        .unwrap_or(NaiveDate::MIN)
}

/// Whole calendar years elapsed between two dates.
pub fn full_years_between(from: NaiveDate, to: NaiveDate) -> i32 {
    let mut years = to.year() - from.year();
    if (to.month(), to.day()) < (from.month(), from.day()) {
        years -= 1;
    }
    years
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Rising,
    Falling,
    Stable,
}

impl Trend {
    pub const fn symbol(self) -> &'static str {
        match self {
            Trend::Rising => "↑",
            Trend::Falling => "↓",
            Trend::Stable => "→",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Trend::Rising => "rising",
            Trend::Falling => "falling",
            Trend::Stable => "stable",
        }
    }
}

/// Engine output for a given instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadinessScore {
    pub percentage: f64,
    pub clock_reading: String,
    pub trend: Trend,
    pub acceleration: f64,
    pub active_conditions: usize,
    pub critical_missing: Vec<String>,
}

impl ReadinessScore {
    pub fn placeholder() -> Self {
        Self {
            percentage: 0.0,
            clock_reading: "12:00 AM".to_string(),
            trend: Trend::Stable,
            acceleration: 0.0,
            active_conditions: 0,
            critical_missing: Vec::new(),
        }
    }
}
