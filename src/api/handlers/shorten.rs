//! Handler for link shortening endpoint.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Creates (or returns the existing) short URL for a long URL.
///
/// # Endpoint
///
/// `POST /shorten`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com/some/long/path" }
/// ```
///
/// # Response
///
/// `201 Created`
///
/// ```json
/// { "short_url": "http://localhost:8080/47DEQpj8HB" }
/// ```
///
/// # Errors
///
/// - 400 if the body is not valid JSON, `url` is missing or empty, or the URL
///   is not an absolute `http`/`https` URL
/// - 500 on collisions and storage failures
pub async fn shorten_handler(
    State(state): State<AppState>,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ShortenResponse>), AppError> {
    let Json(payload) = payload.map_err(|rejection| {
        AppError::bad_request("invalid request body", json!({ "reason": rejection.body_text() }))
    })?;
    payload.validate()?;

    let code = state.url_service.create(&payload.url).await?;

    Ok((
        StatusCode::CREATED,
        Json(ShortenResponse {
            short_url: code.to_url(&state.base_url),
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::{MockUrlRepository, RepositoryError};
    use std::sync::Arc;

    fn state_with(mock: MockUrlRepository) -> AppState {
        AppState::new(Arc::new(mock), "http://short.test/")
    }

    #[tokio::test]
    async fn test_shorten_success() {
        let mut mock_repo = MockUrlRepository::new();
        mock_repo
            .expect_get_by_original()
            .returning(|_| Err(RepositoryError::NotFound));
        mock_repo.expect_save().times(1).returning(|_, _| Ok(()));

        let req = ShortenRequest {
            url: "https://example.com/test".to_string(),
        };

        let (status, Json(body)) = shorten_handler(State(state_with(mock_repo)), Ok(Json(req)))
            .await
            .unwrap();

        assert_eq!(status, StatusCode::CREATED);
        assert!(body.short_url.starts_with("http://short.test/"));
        assert_eq!(body.short_url.len(), "http://short.test/".len() + 10);
    }

    #[tokio::test]
    async fn test_shorten_empty_url_does_not_touch_storage() {
        let mut mock_repo = MockUrlRepository::new();
        mock_repo.expect_get_by_original().times(0);
        mock_repo.expect_save().times(0);

        let req = ShortenRequest { url: String::new() };

        let err = shorten_handler(State(state_with(mock_repo)), Ok(Json(req)))
            .await
            .unwrap_err();

        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_error_info().message, "url is required");
    }

    #[tokio::test]
    async fn test_shorten_storage_failure_is_500() {
        let mut mock_repo = MockUrlRepository::new();
        mock_repo
            .expect_get_by_original()
            .returning(|_| Err(RepositoryError::Storage("down".to_string())));

        let req = ShortenRequest {
            url: "https://example.com".to_string(),
        };

        let err = shorten_handler(State(state_with(mock_repo)), Ok(Json(req)))
            .await
            .unwrap_err();

        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
