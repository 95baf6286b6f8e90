//! `POST /generate`: JSON in, `{content, type, timestamp}` or `{error, details?}` out.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use contentgen_core::{ErrorReport, GenerateBody, GenerateError, GenerateResponse};

use crate::AppState;

/// Normalized failure response.
pub struct ApiError {
    status: StatusCode,
    report: ErrorReport,
}

impl ApiError {
    pub fn from_generate(err: &GenerateError, expose_details: bool) -> Self {
        Self {
            status: StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            report: err.report(expose_details),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.report)).into_response()
    }
}

pub async fn generate(
    State(state): State<AppState>,
    body: Result<Json<GenerateBody>, JsonRejection>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let expose = state.config.expose_details();

    // Unreadable bodies are treated like a missing prompt.
    let body = match body {
        Ok(Json(b)) => b,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "rejected /generate body");
            let mut err = ApiError::from_generate(&GenerateError::Validation, expose);
            if expose {
                err.report.details = Some(rejection.body_text());
            }
            return Err(err);
        }
    };

    let result = state
        .dispatcher
        .generate(body.into_request())
        .await
        .map_err(|e| ApiError::from_generate(&e, expose))?;

    Ok(Json(GenerateResponse::from(&result)))
}
