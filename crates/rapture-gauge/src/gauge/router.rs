use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{Category, ConditionId};
use super::engine::SharedEngine;
use super::schedule::Clock;
use crate::error::AppError;

/// Handles shared by the readiness routes.
#[derive(Clone)]
pub struct GaugeState {
    pub engine: SharedEngine,
    pub clock: Arc<dyn Clock>,
}

impl GaugeState {
    fn resolve(&self, query: &AsOfQuery) -> NaiveDate {
        query.as_of.unwrap_or_else(|| self.clock.today())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AsOfQuery {
    pub as_of: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct AdjustmentRequest {
    pub delta: f64,
}

#[derive(Debug, Serialize)]
pub struct AdjustmentAccepted {
    pub condition_id: ConditionId,
    pub accumulated: f64,
}

#[derive(Debug, Serialize)]
pub struct CategoryView {
    pub key: &'static str,
    pub label: &'static str,
    pub color: &'static str,
    pub weight: u8,
    pub score: f64,
    pub active_conditions: usize,
}

/// Router builder exposing the readiness score and its breakdowns.
pub fn readiness_router(state: GaugeState) -> Router {
    Router::new()
        .route("/api/v1/readiness", get(readiness_handler))
        .route("/api/v1/readiness/recompute", post(recompute_handler))
        .route("/api/v1/categories", get(categories_handler))
        .route("/api/v1/conditions/critical", get(critical_handler))
        .route(
            "/api/v1/conditions/:condition_id/adjustments",
            post(adjustment_handler),
        )
        .route("/api/v1/prediction", get(prediction_handler))
        .route("/api/v1/history", get(history_handler))
        .with_state(state)
}

/// Published score, or a fresh calculation when `as_of` is given.
///
/// A dated request resamples history on a snapshot ending at `as_of`, so its
/// trend and acceleration describe that date. The published score is untouched.
pub(crate) async fn readiness_handler(
    State(state): State<GaugeState>,
    Query(query): Query<AsOfQuery>,
) -> Response {
    let score = match query.as_of {
        Some(as_of) => {
            let mut snapshot = state.engine.read().await.clone();
            snapshot.build_historical_series(as_of);
            snapshot.calculate_readiness(as_of)
        }
        None => state.engine.read().await.current_score().clone(),
    };
    (StatusCode::OK, Json(score)).into_response()
}

pub(crate) async fn recompute_handler(
    State(state): State<GaugeState>,
    Query(query): Query<AsOfQuery>,
) -> Response {
    let as_of = state.resolve(&query);
    let mut engine = state.engine.write().await;
    engine.invalidate_history();
    let score = engine.refresh(as_of).clone();
    (StatusCode::OK, Json(score)).into_response()
}

pub(crate) async fn categories_handler(
    State(state): State<GaugeState>,
    Query(query): Query<AsOfQuery>,
) -> Response {
    let as_of = state.resolve(&query);
    let engine = state.engine.read().await;
    let scores = engine.category_scores(as_of);
    let views: Vec<CategoryView> = Category::ordered()
        .into_iter()
        .map(|category| CategoryView {
            key: category.key(),
            label: category.label(),
            color: category.color(),
            weight: category.weight(),
            score: scores.get(&category).copied().unwrap_or(0.0),
            active_conditions: engine.active_conditions_for_category(category, as_of).len(),
        })
        .collect();
    (StatusCode::OK, Json(views)).into_response()
}

pub(crate) async fn critical_handler(
    State(state): State<GaugeState>,
    Query(query): Query<AsOfQuery>,
) -> Response {
    let as_of = state.resolve(&query);
    let engine = state.engine.read().await;
    let critical: Vec<_> = engine
        .critical_active_conditions(as_of)
        .into_iter()
        .cloned()
        .collect();
    (StatusCode::OK, Json(critical)).into_response()
}

pub(crate) async fn prediction_handler(
    State(state): State<GaugeState>,
    Query(query): Query<AsOfQuery>,
) -> Response {
    let as_of = state.resolve(&query);
    let prediction = state.engine.read().await.generate_prediction(as_of);
    (StatusCode::OK, Json(prediction)).into_response()
}

pub(crate) async fn history_handler(State(state): State<GaugeState>) -> Response {
    let engine = state.engine.read().await;
    (StatusCode::OK, Json(engine.history().samples().to_vec())).into_response()
}

/// Accumulates evidence; the score moves on the next recompute.
pub(crate) async fn adjustment_handler(
    State(state): State<GaugeState>,
    Path(condition_id): Path<String>,
    Json(request): Json<AdjustmentRequest>,
) -> Result<Response, AppError> {
    let id = ConditionId::new(condition_id);
    let mut engine = state.engine.write().await;
    engine.apply_score_adjustment(&id, request.delta)?;
    let accepted = AdjustmentAccepted {
        accumulated: engine.evidence().get(&id),
        condition_id: id,
    };
    Ok((StatusCode::ACCEPTED, Json(accepted)).into_response())
}
