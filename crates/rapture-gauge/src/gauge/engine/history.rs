use crate::gauge::domain::Trend;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoricalSample {
    pub year: i32,
    pub percentage: f64,
}

/// Yearly readiness samples, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoricalSeries {
    samples: Vec<HistoricalSample>,
}

impl HistoricalSeries {
    pub fn new(samples: Vec<HistoricalSample>) -> Self {
        Self { samples }
    }

    pub fn samples(&self) -> &[HistoricalSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn latest(&self) -> Option<&HistoricalSample> {
        self.samples.last()
    }

    /// Mean of the last `count` samples.
    pub fn recent_average(&self, count: usize) -> Option<f64> {
        let take = count.min(self.samples.len());
        if take == 0 {
            return None;
        }
        let recent = &self.samples[self.samples.len() - take..];
        let sum: f64 = recent.iter().map(|sample| sample.percentage).sum();
        Some(sum / take as f64)
    }

    pub fn trend(&self, current: f64, sample_size: usize, threshold: f64) -> Trend {
        match self.recent_average(sample_size) {
            Some(average) if current > average + threshold => Trend::Rising,
            Some(average) if current < average - threshold => Trend::Falling,
            _ => Trend::Stable,
        }
    }

    /// Year-over-year delta of the two most recent samples. Unsmoothed.
    pub fn acceleration(&self) -> f64 {
        match self.samples.as_slice() {
            [.., previous, last] => last.percentage - previous.percentage,
            _ => 0.0,
        }
    }
}
