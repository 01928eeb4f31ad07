mod import;
mod seed;

pub use import::{CsvCatalog, JsonCatalog};
pub use seed::SeedCatalog;

use super::domain::{Condition, ConditionId, ConditionStatus};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Anything able to produce condition records. Storage format is the source's concern.
pub trait ConditionSource {
    fn load(&self) -> Result<Vec<Condition>, CatalogError>;
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid catalog CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("condition {id}: {reason}")]
    Invalid { id: String, reason: String },
    #[error("duplicate condition id {0}")]
    DuplicateId(ConditionId),
}

impl CatalogError {
    fn invalid(id: &ConditionId, reason: impl Into<String>) -> Self {
        Self::Invalid {
            id: id.0.clone(),
            reason: reason.into(),
        }
    }
}

/// Validated, ordered collection of conditions owned by the composition root.
#[derive(Debug, Clone, Default)]
pub struct ConditionStore {
    conditions: Vec<Condition>,
    index: HashMap<ConditionId, usize>,
}

impl ConditionStore {
    pub fn load<S: ConditionSource + ?Sized>(source: &S) -> Result<Self, CatalogError> {
        let conditions = source.load()?;
        Self::from_conditions(conditions)
    }

    pub fn from_conditions(conditions: Vec<Condition>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(conditions.len());
        for (position, condition) in conditions.iter().enumerate() {
            validate(condition)?;
            if index.insert(condition.id.clone(), position).is_some() {
                return Err(CatalogError::DuplicateId(condition.id.clone()));
            }
        }

        debug!(conditions = conditions.len(), "condition catalog loaded");
        Ok(Self { conditions, index })
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn get(&self, id: &ConditionId) -> Option<&Condition> {
        self.index.get(id).map(|&position| &self.conditions[position])
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn contains(&self, id: &ConditionId) -> bool {
        self.index.contains_key(id)
    }

    pub fn set_status(
        &mut self,
        id: &ConditionId,
        status: ConditionStatus,
    ) -> Result<(), CatalogError> {
        let position = self.position(id)?;
        let condition = &mut self.conditions[position];
        if let ConditionStatus::Emerging { percentage } = status {
            if !(0.0..=1.0).contains(&percentage) {
                return Err(CatalogError::invalid(
                    id,
                    format!("emerging percentage {percentage} outside [0, 1]"),
                ));
            }
        }
        match status {
            ConditionStatus::Fulfilled { date } | ConditionStatus::Active { since: date } => {
                condition.fulfillment_date = Some(date);
            }
            _ => {}
        }
        condition.current_status = status;
        Ok(())
    }

    pub fn set_confidence(&mut self, id: &ConditionId, confidence: f64) -> Result<(), CatalogError> {
        let position = self.position(id)?;
        if !(0.0..=1.0).contains(&confidence) {
            return Err(CatalogError::invalid(
                id,
                format!("confidence {confidence} outside [0, 1]"),
            ));
        }
        self.conditions[position].confidence_score = confidence;
        Ok(())
    }

    fn position(&self, id: &ConditionId) -> Result<usize, CatalogError> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| CatalogError::invalid(id, "unknown condition"))
    }
}

fn validate(condition: &Condition) -> Result<(), CatalogError> {
    let id = &condition.id;
    if id.0.trim().is_empty() {
        return Err(CatalogError::invalid(id, "identifier must not be empty"));
    }
    if !condition.weight.is_finite() || condition.weight <= 0.0 {
        return Err(CatalogError::invalid(
            id,
            format!("weight {} must be positive", condition.weight),
        ));
    }
    if !(0.0..=1.0).contains(&condition.confidence_score) {
        return Err(CatalogError::invalid(
            id,
            format!("confidence {} outside [0, 1]", condition.confidence_score),
        ));
    }
    match condition.current_status {
        ConditionStatus::Emerging { percentage } if !(0.0..=1.0).contains(&percentage) => {
            return Err(CatalogError::invalid(
                id,
                format!("emerging percentage {percentage} outside [0, 1]"),
            ));
        }
        ConditionStatus::Fulfilled { date } => {
            if condition.fulfillment_date != Some(date) {
                warn!(
                    condition = %id,
                    status_date = %date,
                    fulfillment_date = ?condition.fulfillment_date,
                    "fulfilled status date disagrees with fulfillment date"
                );
            }
        }
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gauge::domain::Category;

    fn condition(id: &str, weight: f64, confidence: f64) -> Condition {
        Condition {
            id: ConditionId::new(id),
            category: Category::Technology,
            scripture_reference: "Daniel 12:4".to_string(),
            scripture_quote: "Knowledge shall be increased".to_string(),
            weight,
            current_status: ConditionStatus::NotMet,
            fulfillment_date: None,
            confidence_score: confidence,
            data_source: String::new(),
        }
    }

    #[test]
    fn rejects_non_positive_weight() {
        let err = ConditionStore::from_conditions(vec![condition("a", 0.0, 0.5)])
            .expect_err("zero weight rejected");
        assert!(matches!(err, CatalogError::Invalid { ref id, .. } if id == "a"));

        let err = ConditionStore::from_conditions(vec![condition("b", -3.0, 0.5)])
            .expect_err("negative weight rejected");
        assert!(err.to_string().contains("must be positive"));
    }

    #[test]
    fn rejects_out_of_range_confidence_and_percentage() {
        assert!(ConditionStore::from_conditions(vec![condition("a", 5.0, 1.2)]).is_err());

        let mut emerging = condition("b", 5.0, 0.5);
        emerging.current_status = ConditionStatus::Emerging { percentage: 1.5 };
        assert!(ConditionStore::from_conditions(vec![emerging]).is_err());
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = ConditionStore::from_conditions(vec![
            condition("dup", 5.0, 0.5),
            condition("dup", 6.0, 0.5),
        ])
        .expect_err("duplicate rejected");
        assert!(matches!(err, CatalogError::DuplicateId(ref id) if id.as_str() == "dup"));
    }

    #[test]
    fn empty_store_is_allowed() {
        let store = ConditionStore::from_conditions(Vec::new()).expect("empty store");
        assert!(store.is_empty());
    }

    #[test]
    fn mutation_surface_validates_ranges() {
        let mut store =
            ConditionStore::from_conditions(vec![condition("a", 5.0, 0.5)]).expect("valid");
        let id = ConditionId::new("a");

        store.set_confidence(&id, 0.9).expect("in range");
        assert_eq!(store.get(&id).map(|c| c.confidence_score), Some(0.9));
        assert!(store.set_confidence(&id, -0.1).is_err());

        store
            .set_status(&id, ConditionStatus::Emerging { percentage: 0.4 })
            .expect("valid status");
        assert!(store
            .set_status(&id, ConditionStatus::Emerging { percentage: 2.0 })
            .is_err());
        assert!(store
            .set_status(&ConditionId::new("missing"), ConditionStatus::Expired)
            .is_err());
    }
}
