use crate::bank::{auth::AuthError, store::StoreError};
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error};
use utoipa::ToSchema;

/// Body of every error response: `{"error": "<message>"}`.
#[derive(ToSchema, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("permission denied")]
    Denied,
    #[error("{0}")]
    NotFound(String),
    #[error("method not allowed {0}")]
    MethodNotAllowed(String),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::InvalidCredentials | Self::Denied => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            Self::Internal(cause) => {
                error!("Internal error: {cause}");
                "internal server error".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(what) => Self::NotFound(format!("{what} not found")),
            StoreError::Database(e) => Self::Internal(format!("database error: {e}")),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => Self::InvalidCredentials,
            AuthError::InvalidToken => Self::Denied,
            AuthError::Hashing | AuthError::Signing | AuthError::Configuration(_) => {
                Self::Internal(err.to_string())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        debug!("Rejected request body: {rejection}");
        Self::Validation(rejection.body_text())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::{json, Value};

    async fn render(err: ApiError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn denied_body_is_fixed() {
        let (status, body) = render(ApiError::Denied).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({ "error": "permission denied" }));
    }

    #[tokio::test]
    async fn statuses() {
        let cases = [
            (ApiError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (ApiError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (ApiError::NotFound("x not found".into()), StatusCode::NOT_FOUND),
            (ApiError::MethodNotAllowed("PUT".into()), StatusCode::METHOD_NOT_ALLOWED),
            (ApiError::Internal("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, expected) in cases {
            let (status, body) = render(err).await;
            assert_eq!(status, expected);
            assert!(body["error"].is_string());
        }
    }

    #[tokio::test]
    async fn internal_cause_is_not_leaked() {
        let (_, body) = render(ApiError::Internal("password=hunter2".into())).await;
        assert_eq!(body, json!({ "error": "internal server error" }));
    }

    #[test]
    fn store_errors_map() {
        let err: ApiError = StoreError::account_id(3).into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "account with id 3 not found");

        let err: ApiError = StoreError::Database(sqlx::Error::PoolTimedOut).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn auth_errors_map() {
        assert!(matches!(
            ApiError::from(AuthError::InvalidCredentials),
            ApiError::InvalidCredentials
        ));
        assert!(matches!(
            ApiError::from(AuthError::InvalidToken),
            ApiError::Denied
        ));
        assert!(matches!(
            ApiError::from(AuthError::Hashing),
            ApiError::Internal(_)
        ));
    }

    #[tokio::test]
    async fn signing_failure_is_internal_not_denied() {
        let err = ApiError::from(AuthError::Signing);
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let (_, body) = render(err).await;
        assert_eq!(body, json!({ "error": "internal server error" }));
    }

    #[tokio::test]
    async fn method_not_allowed_names_the_method() {
        let (status, body) = render(ApiError::MethodNotAllowed("GET".into())).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body, json!({ "error": "method not allowed GET" }));
    }
}
