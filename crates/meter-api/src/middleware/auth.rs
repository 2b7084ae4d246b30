use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
    routing::post,
    Json, Router,
};
use axum_extra::extract::CookieJar;
use meter_providers::Ledger;
use serde::Deserialize;

use crate::error::ApiError;

pub const SESSION_COOKIE: &str = "session_token";

#[derive(Clone)]
pub struct AppState {
    pub auth_token: String,
    pub ledger: Ledger,
}

#[derive(Deserialize)]
struct LoginRequest {
    token: String,
}

pub fn auth_routes(_state: AppState) -> Router<AppState> {
    Router::new().route("/api/v1/auth/login", post(handle_login))
}

async fn handle_login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    if body.token != state.auth_token {
        return Err(ApiError::InvalidToken);
    }

    let cookieValue = format!(
        "{SESSION_COOKIE}={}; HttpOnly; Secure; SameSite=Strict; Path=/; Max-Age=604800",
        body.token
    );

    let cookieHeader = HeaderValue::from_str(&cookieValue).map_err(|_| ApiError::InvalidToken)?;
    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookieHeader)],
        Json(serde_json::json!({ "ok": true })),
    )
        .into_response())
}

fn session_token(jar: &CookieJar) -> Option<&str> {
    jar.get(SESSION_COOKIE).map(|c| c.value())
}

/// Middleware for API routes: checks Authorization: Bearer <token> header.
pub async fn require_api_auth(
    State(state): State<AppState>,
    jar: CookieJar,
    request: Request<Body>,
    next: Next,
) -> Response {
    let authHeader = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    // Browser requests carry the session cookie instead
    let isAuthorized = match authHeader.and_then(|h| h.strip_prefix("Bearer ")) {
        Some(token) => token == state.auth_token,
        None => session_token(&jar) == Some(state.auth_token.as_str()),
    };

    if !isAuthorized {
        return ApiError::Unauthorized.into_response();
    }

    next.run(request).await
}

/// Middleware for page routes: checks session_token cookie, redirects to /login if missing.
pub async fn require_page_auth(
    State(state): State<AppState>,
    jar: CookieJar,
    request: Request<Body>,
    next: Next,
) -> Response {
    let path = request.uri().path();

    // The JSON API checks its own credentials; server functions under /api stay guarded
    if path == "/login"
        || path.starts_with("/pkg/")
        || path.starts_with("/public/")
        || path.starts_with("/api/v1/")
        || path.starts_with("/assets/")
    {
        return next.run(request).await;
    }

    if session_token(&jar) != Some(state.auth_token.as_str()) {
        return Redirect::to("/login").into_response();
    }

    next.run(request).await
}
