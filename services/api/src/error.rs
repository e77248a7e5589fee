//! Custom error types for the API service

use auth::{AuthError, JwtError};
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::error::StoreError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::{sanitize::ValidationErrors, upload::UploadError};

/// Custom error type for the API service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Field-level input errors from a sanitizer
    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    #[error("{0}")]
    BadRequest(String),

    #[error("Unauthorized")]
    Unauthorized,

    /// Valid credential without admin rights
    #[error("Forbidden")]
    Forbidden,

    #[error("{0}")]
    NotFound(String),

    /// Unique constraint violation, with a message naming the field
    #[error("{0}")]
    Conflict(String),

    #[error("Too many login attempts, try again later")]
    TooManyRequests,

    #[error("Internal server error")]
    InternalServerError,

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl ApiError {
    /// Replace a duplicate-key store error with a field-specific message
    pub fn conflict_as(message: &str) -> impl FnOnce(StoreError) -> ApiError + '_ {
        move |e| {
            if e.is_duplicate_key() {
                ApiError::Conflict(message.to_string())
            } else {
                ApiError::Store(e)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, errors) = match self {
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                errors.to_string(),
                Some(errors.fields().to_vec()),
            ),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string(), None),
            ApiError::Forbidden => (StatusCode::FORBIDDEN, "Forbidden".to_string(), None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
            ApiError::Conflict(msg) => (StatusCode::BAD_REQUEST, msg, None),
            ApiError::TooManyRequests => (
                StatusCode::TOO_MANY_REQUESTS,
                "Too many login attempts, try again later".to_string(),
                None,
            ),
            ApiError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
                None,
            ),
            ApiError::Store(StoreError::DuplicateKey { constraint }) => {
                error!("Unmapped unique violation on {}", constraint);
                (
                    StatusCode::BAD_REQUEST,
                    "Duplicate value".to_string(),
                    None,
                )
            }
            ApiError::Store(e) => {
                error!("Store failure: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
        };

        let body = match errors {
            Some(errors) => json!({ "success": false, "message": message, "errors": errors }),
            None => json!({ "success": false, "message": message }),
        };

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<UploadError> for ApiError {
    fn from(e: UploadError) -> Self {
        match e {
            UploadError::Io(e) => {
                error!("Failed to store upload: {}", e);
                ApiError::InternalServerError
            }
            other => ApiError::BadRequest(other.to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::InvalidCredentials => ApiError::Unauthorized,
            AuthError::TooManyAttempts => ApiError::TooManyRequests,
            AuthError::InvalidInput(msg) => ApiError::BadRequest(msg),
            AuthError::Store(e) => ApiError::Store(e),
            AuthError::Hashing(e) => {
                error!("Password hashing failed: {}", e);
                ApiError::InternalServerError
            }
            AuthError::Token(e) => {
                error!("Token issuance failed: {}", e);
                ApiError::InternalServerError
            }
        }
    }
}

impl From<JwtError> for ApiError {
    fn from(e: JwtError) -> Self {
        match e {
            JwtError::NotAdmin => ApiError::Forbidden,
            JwtError::Expired | JwtError::Invalid(_) => ApiError::Unauthorized,
            other => {
                error!("Token verification failed: {}", other);
                ApiError::InternalServerError
            }
        }
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn body_of(err: ApiError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn validation_errors_list_fields() {
        let (status, body) =
            body_of(ValidationErrors::single("slug", "slug is required").into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "slug is required");
        assert_eq!(body["errors"][0]["field"], "slug");
    }

    #[tokio::test]
    async fn conflicts_are_bad_requests() {
        let err = ApiError::conflict_as("Slug already exists")(StoreError::DuplicateKey {
            constraint: "products_slug_key".to_string(),
        });
        let (status, body) = body_of(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Slug already exists");
        assert!(body.get("errors").is_none());
    }

    #[tokio::test]
    async fn store_failures_hide_detail() {
        let (status, body) = body_of(ApiError::Store(StoreError::Database(
            sqlx::Error::PoolTimedOut,
        )))
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Internal server error");
    }

    #[tokio::test]
    async fn auth_errors_map_to_statuses() {
        let (status, _) = body_of(AuthError::InvalidCredentials.into()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let (status, _) = body_of(AuthError::TooManyAttempts.into()).await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        let (status, _) = body_of(JwtError::NotAdmin.into()).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        let (status, _) = body_of(JwtError::Expired.into()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
