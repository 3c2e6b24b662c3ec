use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::archive::documents;
use crate::archive::Requester;
use crate::http_server::api::ApiError;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetPermissionRequest {
    pub user_id: i64,
    #[serde(default)]
    pub can_view: bool,
    #[serde(default)]
    pub can_edit: bool,
}

/// Upsert the grant for one user on one document.
pub async fn set_handler(
    State(state): State<ServiceState>,
    requester: Requester,
    Path(document_id): Path<i64>,
    Json(req): Json<SetPermissionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    documents::set_permission(
        state.database(),
        &requester,
        document_id,
        req.user_id,
        req.can_view,
        req.can_edit,
    )
    .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Drop the grant for one user. Idempotent.
pub async fn remove_handler(
    State(state): State<ServiceState>,
    requester: Requester,
    Path((document_id, user_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, ApiError> {
    documents::remove_permission(state.database(), &requester, document_id, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
