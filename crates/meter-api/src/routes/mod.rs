pub mod components;
pub mod metrics;
pub mod revenue;

use axum::{middleware, Router};

use crate::middleware::auth::{require_api_auth, AppState};

pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(revenue::routes(state.clone()))
        .merge(metrics::routes(state.clone()))
        .merge(components::routes(state.clone()))
        .route_layer(middleware::from_fn_with_state(state, require_api_auth))
}
