use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use meter_providers::LedgerError;
use meter_types::{FieldError, PeriodError};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("invalid token")]
    InvalidToken,
    #[error(transparent)]
    Period(#[from] PeriodError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    fields: Vec<FieldError>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, fields) = match &self {
            ApiError::Unauthorized | ApiError::InvalidToken => (StatusCode::UNAUTHORIZED, Vec::new()),
            ApiError::Period(_) => (StatusCode::BAD_REQUEST, Vec::new()),
            ApiError::Ledger(LedgerError::DuplicateMetric(_)) => (StatusCode::CONFLICT, Vec::new()),
            ApiError::Ledger(LedgerError::InvalidDraft(e)) => {
                (StatusCode::BAD_REQUEST, e.field_errors().to_vec())
            }
            ApiError::Ledger(e) => {
                error!("ledger failure: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, Vec::new())
            }
        };

        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
                fields,
            }),
        )
            .into_response()
    }
}
