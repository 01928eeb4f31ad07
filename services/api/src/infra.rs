use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use rapture_gauge::config::GaugeConfig;
use rapture_gauge::error::AppError;
use rapture_gauge::gauge::catalog::{
    ConditionSource, ConditionStore, CsvCatalog, JsonCatalog, SeedCatalog,
};
use rapture_gauge::gauge::engine::ReadinessEngine;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Picks the catalog reader from the file extension; no path means the seed catalog.
pub(crate) fn catalog_source(path: Option<&Path>) -> Box<dyn ConditionSource> {
    match path {
        Some(path) => {
            let is_csv = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
            if is_csv {
                Box::new(CsvCatalog::from_path(path))
            } else {
                Box::new(JsonCatalog::from_path(path))
            }
        }
        None => Box::new(SeedCatalog),
    }
}

pub(crate) fn build_engine(
    gauge: &GaugeConfig,
    catalog_override: Option<&Path>,
) -> Result<ReadinessEngine, AppError> {
    let path = catalog_override.or(gauge.catalog_path.as_deref());
    let store = ConditionStore::load(catalog_source(path).as_ref())?;
    info!(
        conditions = store.len(),
        catalog = %path.map(|p| p.display().to_string()).unwrap_or_else(|| "seed".to_string()),
        "condition catalog ready"
    );
    Ok(ReadinessEngine::new(store, gauge.engine_config()))
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
