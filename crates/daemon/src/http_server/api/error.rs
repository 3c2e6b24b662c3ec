use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::archive::ArchiveError;
use crate::auth::AuthError;

/// Shared handler error. Archive and auth failures map onto HTTP
/// statuses here; the body always carries `{ kind, msg }`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Archive(#[from] ArchiveError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("invalid {field}: {reason}")]
    BadRequest {
        field: &'static str,
        reason: String,
    },
}

impl ApiError {
    pub fn bad_request(field: &'static str, reason: impl Into<String>) -> Self {
        ApiError::BadRequest {
            field,
            reason: reason.into(),
        }
    }

    fn status_and_kind(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Archive(err) => {
                let status = match err {
                    ArchiveError::Validation { .. } => StatusCode::BAD_REQUEST,
                    ArchiveError::NotFound => StatusCode::NOT_FOUND,
                    ArchiveError::PermissionDenied => StatusCode::FORBIDDEN,
                    ArchiveError::Conflict(_) => StatusCode::CONFLICT,
                    ArchiveError::Dependency(_) => StatusCode::BAD_GATEWAY,
                };
                (status, err.kind())
            }
            ApiError::Auth(err) => match err {
                AuthError::InvalidCredentials | AuthError::InvalidToken => {
                    (StatusCode::UNAUTHORIZED, "auth")
                }
                AuthError::LoginTaken => (StatusCode::CONFLICT, "conflict"),
                AuthError::Validation { .. } => (StatusCode::BAD_REQUEST, "validation"),
                AuthError::Database(_) => (StatusCode::BAD_GATEWAY, "dependency"),
            },
            ApiError::BadRequest { .. } => (StatusCode::BAD_REQUEST, "validation"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind) = self.status_and_kind();

        // Dependency details stay in the logs, not in responses.
        let msg = if status == StatusCode::BAD_GATEWAY {
            tracing::error!("request failed on a dependency: {self}");
            "a backing service is unavailable".to_string()
        } else {
            self.to_string()
        };

        let body = serde_json::json!({ "kind": kind, "msg": msg });
        (status, Json(body)).into_response()
    }
}
