use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use meter_types::{PlanComponent, UsageComponentDraft};

use crate::error::ApiError;
use crate::middleware::auth::AppState;

pub fn routes(_state: AppState) -> Router<AppState> {
    Router::new().route("/api/v1/components", get(get_components).post(post_component))
}

async fn get_components(State(state): State<AppState>) -> Json<Vec<PlanComponent>> {
    Json(state.ledger.components().await)
}

async fn post_component(
    State(state): State<AppState>,
    Json(draft): Json<UsageComponentDraft>,
) -> Result<(StatusCode, Json<PlanComponent>), ApiError> {
    let component = state.ledger.add_component(draft).await?;
    Ok((StatusCode::CREATED, Json(component)))
}
