use crate::infra::build_engine;
use chrono::{Local, NaiveDate};
use clap::Args;
use rapture_gauge::config::GaugeConfig;
use rapture_gauge::error::AppError;
use rapture_gauge::gauge::domain::{Category, Condition};
use rapture_gauge::gauge::engine::{HistoricalSeries, ReadinessEngine};
use std::fmt::Write as _;
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct ReportArgs {
    /// Evaluation date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
    /// JSON or CSV catalog overriding GAUGE_CATALOG_PATH
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
    /// Include every condition with its status and window membership
    #[arg(long)]
    pub(crate) list_conditions: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct HistoryArgs {
    /// Reference date whose year ends the series. Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
    /// JSON or CSV catalog overriding GAUGE_CATALOG_PATH
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
}

pub(crate) fn run_report(gauge: &GaugeConfig, args: ReportArgs) -> Result<(), AppError> {
    let as_of = args.as_of.unwrap_or_else(|| Local::now().date_naive());
    let mut engine = build_engine(gauge, args.catalog.as_deref())?;
    engine.refresh(as_of);
    print!("{}", render_report(&engine, as_of, args.list_conditions));
    Ok(())
}

pub(crate) fn run_history(gauge: &GaugeConfig, args: HistoryArgs) -> Result<(), AppError> {
    let as_of = args.as_of.unwrap_or_else(|| Local::now().date_naive());
    let mut engine = build_engine(gauge, args.catalog.as_deref())?;
    let series = engine.build_historical_series(as_of);
    print!("{}", render_history(series));
    Ok(())
}

pub(crate) fn render_report(engine: &ReadinessEngine, as_of: NaiveDate, list_conditions: bool) -> String {
    let score = engine.current_score();
    let window_years = engine.config().window_years;
    let mut out = String::new();

    let _ = writeln!(out, "Readiness report as of {as_of}");
    let _ = writeln!(
        out,
        "- {:.1}% | clock {} | trend {} {} | acceleration {:+.1} pts/yr",
        score.percentage,
        score.clock_reading,
        score.trend.symbol(),
        score.trend.label(),
        score.acceleration
    );
    let _ = writeln!(
        out,
        "- {} active conditions within the {window_years}-year window",
        score.active_conditions
    );
    if score.critical_missing.is_empty() {
        let _ = writeln!(out, "- Critical missing: none");
    } else {
        let _ = writeln!(out, "- Critical missing: {}", score.critical_missing.join(", "));
    }

    let _ = writeln!(out, "\nCategories");
    let categories = engine.category_scores(as_of);
    for category in Category::ordered() {
        let value = categories.get(&category).copied().unwrap_or(0.0);
        let _ = writeln!(
            out,
            "  {:<22} {:>5.1}%  (weight {})",
            category.label(),
            value,
            category.weight()
        );
    }

    let critical = engine.critical_active_conditions(as_of);
    if !critical.is_empty() {
        let _ = writeln!(out, "\nHeaviest active conditions");
        for condition in critical {
            let _ = writeln!(
                out,
                "  - {} (weight {:.0}, {})",
                condition.scripture_reference,
                condition.weight,
                condition.current_status.label()
            );
        }
    }

    let prediction = engine.generate_prediction(as_of);
    let _ = writeln!(
        out,
        "\nPrediction: {} confidence | {}",
        prediction.confidence.label(),
        prediction.projection
    );
    let _ = writeln!(out, "{}", prediction.analysis);

    if list_conditions {
        let _ = writeln!(out, "\nConditions");
        for condition in engine.conditions() {
            let _ = writeln!(out, "  {}", condition_line(condition, as_of, window_years));
        }
    }

    out
}

fn condition_line(condition: &Condition, as_of: NaiveDate, window_years: u32) -> String {
    let marker = if condition.is_active_in_window(as_of, window_years) {
        "*"
    } else {
        " "
    };
    let dated = condition
        .fulfillment_date
        .map(|date| format!(" since {date}"))
        .unwrap_or_default();
    format!(
        "[{marker}] {:<24} {:<22} {}{} (w {:.0}, conf {:.2})",
        condition.id.as_str(),
        condition.scripture_reference,
        condition.current_status.label(),
        dated,
        condition.weight,
        condition.confidence_score
    )
}

pub(crate) fn render_history(series: &HistoricalSeries) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Historical readiness ({} samples)", series.len());
    for sample in series.samples() {
        let bar = "#".repeat((sample.percentage / 2.0).round() as usize);
        let _ = writeln!(out, "  {} {:>5.1}% {}", sample.year, sample.percentage, bar);
    }
    let _ = writeln!(out, "Acceleration: {:+.1} pts/yr", series.acceleration());
    out
}
