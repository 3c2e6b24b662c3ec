use axum::extract::{Path, State};
use axum::response::IntoResponse;

use crate::archive::documents;
use crate::archive::Requester;
use crate::http_server::api::ApiError;
use crate::ServiceState;

pub async fn handler(
    State(state): State<ServiceState>,
    requester: Requester,
    Path(document_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    documents::delete_document(state.database(), &requester, document_id).await?;
    tracing::info!(document_id, "document deleted");
    Ok(http::StatusCode::NO_CONTENT)
}
