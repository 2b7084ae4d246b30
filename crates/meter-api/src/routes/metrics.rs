use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use meter_types::{BillableMetric, BillableMetricSummary};

use crate::error::ApiError;
use crate::middleware::auth::AppState;

pub fn routes(_state: AppState) -> Router<AppState> {
    Router::new().route("/api/v1/metrics", get(get_metrics).post(post_metric))
}

async fn get_metrics(State(state): State<AppState>) -> Json<Vec<BillableMetricSummary>> {
    Json(state.ledger.metrics().await)
}

async fn post_metric(
    State(state): State<AppState>,
    Json(metric): Json<BillableMetric>,
) -> Result<(StatusCode, Json<BillableMetricSummary>), ApiError> {
    let summary = state.ledger.add_metric(metric).await?;
    Ok((StatusCode::CREATED, Json(summary)))
}
