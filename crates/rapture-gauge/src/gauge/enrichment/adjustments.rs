use crate::gauge::domain::ConditionId;
use serde::Serialize;
use std::collections::BTreeMap;

/// Per-condition evidence accumulator.
///
/// Deltas are summed independently per condition, so adapters may report in
/// any order or interleaving.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScoreAdjustments {
    deltas: BTreeMap<ConditionId, f64>,
}

impl ScoreAdjustments {
    pub fn record(&mut self, id: ConditionId, delta: f64) {
        *self.deltas.entry(id).or_insert(0.0) += delta;
    }

    pub fn get(&self, id: &ConditionId) -> f64 {
        self.deltas.get(id).copied().unwrap_or(0.0)
    }

    pub fn merge(&mut self, other: &ScoreAdjustments) {
        for (id, delta) in &other.deltas {
            self.record(id.clone(), *delta);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ConditionId, f64)> {
        self.deltas.iter().map(|(id, delta)| (id, *delta))
    }

    pub fn len(&self) -> usize {
        self.deltas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deltas.is_empty()
    }
}
