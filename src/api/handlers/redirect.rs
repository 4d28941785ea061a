//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::IntoResponse,
};
use serde_json::json;
use tracing::{debug, error};

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Errors
///
/// - 404 if the code is malformed or unknown
/// - 500 on storage failures, or if the stored URL cannot be sent as a header
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let original_url = state.url_service.resolve(&code).await?;

    let location = HeaderValue::try_from(original_url).map_err(|e| {
        error!(%code, error = %e, "Stored URL is not a valid Location header");
        AppError::internal("internal server error", json!({}))
    })?;

    debug!(%code, "Redirecting");

    Ok((StatusCode::FOUND, [(header::LOCATION, location)]))
}

/// `GET /` carries no code to resolve.
pub async fn empty_code_handler() -> AppError {
    AppError::bad_request("short code is required", json!({}))
}
