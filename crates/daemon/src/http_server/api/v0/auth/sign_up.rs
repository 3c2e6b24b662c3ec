use axum::extract::{Json, State};
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};

use crate::http_server::api::ApiError;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignUpRequest {
    pub login: String,
    pub password: String,
    pub full_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignUpResponse {
    pub user_id: i64,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<SignUpRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = state
        .auth()
        .sign_up(
            state.database(),
            &req.login,
            &req.password,
            req.full_name.as_deref(),
        )
        .await?;

    tracing::info!(user_id, "new account registered");
    Ok((
        http::StatusCode::CREATED,
        Json(SignUpResponse { user_id }),
    ))
}
