use axum::extract::{Json, State};
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};

use crate::http_server::api::ApiError;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignInRequest {
    pub login: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignInResponse {
    pub token: String,
    pub user_id: i64,
    pub role: String,
    pub expires_at: String,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<SignInRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let session = state
        .auth()
        .sign_in(state.database(), &req.login, &req.password)
        .await?;

    Ok(Json(SignInResponse {
        token: session.token,
        user_id: session.user_id,
        role: session.role.to_string(),
        expires_at: session.expires_at.to_string(),
    }))
}
