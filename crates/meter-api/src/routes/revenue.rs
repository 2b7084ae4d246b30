use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use meter_types::{Period, PeriodRevenue};
use serde::Deserialize;

use crate::error::ApiError;
use crate::middleware::auth::AppState;

#[derive(Deserialize)]
struct PeriodRevenueQuery {
    period_1_start_date: NaiveDate,
    period_1_end_date: NaiveDate,
    period_2_start_date: NaiveDate,
    period_2_end_date: NaiveDate,
}

pub fn routes(_state: AppState) -> Router<AppState> {
    Router::new().route("/api/v1/period_metric_revenue", get(get_period_revenue))
}

async fn get_period_revenue(
    State(state): State<AppState>,
    Query(query): Query<PeriodRevenueQuery>,
) -> Result<Json<PeriodRevenue>, ApiError> {
    let period1 = Period::new(query.period_1_start_date, query.period_1_end_date)?;
    let period2 = Period::new(query.period_2_start_date, query.period_2_end_date)?;
    Ok(Json(state.ledger.period_revenue(period1, period2).await))
}
