use super::{CatalogError, ConditionSource};
use crate::gauge::domain::{Category, Condition, ConditionId, ConditionStatus};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use std::io::Read;
use std::path::{Path, PathBuf};

/// JSON array of conditions using the domain field names.
#[derive(Debug, Clone)]
pub enum JsonCatalog {
    Path(PathBuf),
    Inline(String),
}

impl JsonCatalog {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        Self::Path(path.as_ref().to_path_buf())
    }

    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, CatalogError> {
        let mut raw = String::new();
        reader.read_to_string(&mut raw)?;
        Ok(Self::Inline(raw))
    }
}

impl ConditionSource for JsonCatalog {
    fn load(&self) -> Result<Vec<Condition>, CatalogError> {
        let conditions = match self {
            JsonCatalog::Path(path) => {
                let file = std::fs::File::open(path)?;
                serde_json::from_reader(std::io::BufReader::new(file))?
            }
            JsonCatalog::Inline(raw) => serde_json::from_str(raw)?,
        };
        Ok(conditions)
    }
}

/// Flat CSV export, one condition per row.
///
/// Columns: `id, category, reference, quote, weight, status, status_value,
/// fulfillment_date, confidence, data_source`. `status_value` carries the
/// emerging percentage or the active/fulfilled date.
#[derive(Debug, Clone)]
pub enum CsvCatalog {
    Path(PathBuf),
    Inline(Vec<u8>),
}

impl CsvCatalog {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        Self::Path(path.as_ref().to_path_buf())
    }

    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, CatalogError> {
        let mut raw = Vec::new();
        reader.read_to_end(&mut raw)?;
        Ok(Self::Inline(raw))
    }
}

impl ConditionSource for CsvCatalog {
    fn load(&self) -> Result<Vec<Condition>, CatalogError> {
        match self {
            CsvCatalog::Path(path) => parse_rows(std::fs::File::open(path)?),
            CsvCatalog::Inline(raw) => parse_rows(raw.as_slice()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CatalogRow {
    id: String,
    category: String,
    reference: String,
    #[serde(default)]
    quote: String,
    weight: f64,
    status: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    status_value: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    fulfillment_date: Option<String>,
    confidence: f64,
    #[serde(default)]
    data_source: String,
}

fn parse_rows<R: Read>(reader: R) -> Result<Vec<Condition>, CatalogError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut conditions = Vec::new();

    for record in csv_reader.deserialize::<CatalogRow>() {
        let row = record?;
        conditions.push(row.into_condition()?);
    }

    Ok(conditions)
}

impl CatalogRow {
    fn into_condition(self) -> Result<Condition, CatalogError> {
        let id = ConditionId::new(self.id);
        let invalid = |reason: String| CatalogError::Invalid {
            id: id.0.clone(),
            reason,
        };

        let category = Category::from_label(&self.category)
            .ok_or_else(|| invalid(format!("unknown category '{}'", self.category)))?;

        let fulfillment_date = self
            .fulfillment_date
            .as_deref()
            .map(|raw| parse_date(raw).ok_or_else(|| invalid(format!("bad date '{raw}'"))))
            .transpose()?;

        let value = self.status_value.as_deref();
        let status = match self.status.trim().to_ascii_lowercase().as_str() {
            "not_met" | "notmet" | "not met" => ConditionStatus::NotMet,
            "expired" => ConditionStatus::Expired,
            "emerging" => {
                let percentage = value
                    .and_then(|raw| raw.trim().parse::<f64>().ok())
                    .ok_or_else(|| invalid("emerging status requires a percentage".into()))?;
                ConditionStatus::Emerging { percentage }
            }
            "active" => {
                let since = value
                    .and_then(parse_date)
                    .or(fulfillment_date)
                    .ok_or_else(|| invalid("active status requires a date".into()))?;
                ConditionStatus::Active { since }
            }
            "fulfilled" => {
                let date = value
                    .and_then(parse_date)
                    .or(fulfillment_date)
                    .ok_or_else(|| invalid("fulfilled status requires a date".into()))?;
                ConditionStatus::Fulfilled { date }
            }
            other => return Err(invalid(format!("unknown status '{other}'"))),
        };

        Ok(Condition {
            id,
            category,
            scripture_reference: self.reference,
            scripture_quote: self.quote,
            weight: self.weight,
            current_status: status,
            fulfillment_date,
            confidence_score: self.confidence,
            data_source: self.data_source,
        })
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}
