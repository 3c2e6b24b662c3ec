use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{extract::FromRequestParts, Json};
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::Authorization;
use axum_extra::TypedHeader;

use crate::archive::Requester;
use crate::ServiceState;

use super::AuthError;

/// Extracting a [`Requester`] authenticates the request: handlers that
/// take one can only be reached with a live session token.
#[async_trait::async_trait]
impl FromRequestParts<ServiceState> for Requester {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServiceState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| AuthRejection::MissingToken)?;

        state
            .auth()
            .resolve(state.database(), bearer.token())
            .await
            .map_err(|err| match err {
                AuthError::Database(err) => {
                    tracing::error!("session lookup failed: {err}");
                    AuthRejection::Unavailable
                }
                _ => AuthRejection::InvalidToken,
            })
    }
}

#[derive(Debug)]
pub enum AuthRejection {
    MissingToken,
    InvalidToken,
    Unavailable,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            AuthRejection::MissingToken => {
                (StatusCode::UNAUTHORIZED, "missing bearer token")
            }
            AuthRejection::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "session token is unknown or expired",
            ),
            AuthRejection::Unavailable => {
                (StatusCode::BAD_GATEWAY, "authentication is unavailable")
            }
        };
        let body = serde_json::json!({ "kind": "auth", "msg": msg });
        (status, Json(body)).into_response()
    }
}
