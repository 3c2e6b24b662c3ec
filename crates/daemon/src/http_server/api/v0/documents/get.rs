use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use crate::archive::documents::{self, DocumentView};
use crate::archive::Requester;
use crate::http_server::api::ApiError;
use crate::ServiceState;

use super::super::datetime::format_date;

#[derive(Debug, Clone, Serialize)]
pub struct ContentResponse {
    pub mime: String,
    pub size: i64,
    pub sha256: String,
    pub inline: bool,
    pub download_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GrantResponse {
    pub user_id: i64,
    pub can_view: bool,
    pub can_edit: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentResponse {
    pub id: i64,
    pub title: String,
    pub privacy: String,
    pub created_at: String,
    pub created_by: Option<i64>,
    pub updated_at: Option<String>,
    pub updated_by: Option<i64>,
    pub document_date: Option<String>,
    pub author: Option<String>,
    pub type_id: Option<i64>,
    pub type_name: Option<String>,
    pub geojson: Option<serde_json::Value>,
    pub tags: Vec<String>,
    pub content: Option<ContentResponse>,
    pub can_edit: bool,
    pub is_creator: bool,
    /// Explicit grants; only present for requesters who can edit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<GrantResponse>>,
}

impl DocumentResponse {
    pub fn from_view(view: DocumentView, requester: &Requester) -> Self {
        let doc = view.document;
        let permissions = if view.capabilities.can_edit {
            Some(
                view.grants
                    .into_iter()
                    .map(|g| GrantResponse {
                        user_id: g.user_id,
                        can_view: g.can_view,
                        can_edit: g.can_edit,
                    })
                    .collect(),
            )
        } else {
            None
        };

        DocumentResponse {
            id: doc.id,
            title: doc.title,
            privacy: doc.privacy.to_string(),
            created_at: doc.created_at.to_string(),
            created_by: doc.created_by,
            updated_at: doc.updated_at.map(|t| t.to_string()),
            updated_by: doc.updated_by,
            document_date: doc.document_date.map(format_date),
            author: doc.author,
            type_id: doc.type_id,
            type_name: view.type_name,
            // Stored geojson is validated JSON; surface it structured.
            geojson: doc
                .geojson
                .as_deref()
                .and_then(|raw| serde_json::from_str(raw).ok()),
            tags: view.tags,
            content: view.content.map(|c| ContentResponse {
                mime: c.mime,
                size: c.size,
                sha256: c.sha256,
                inline: c.inline,
                download_url: c.download_url,
            }),
            can_edit: view.capabilities.can_edit,
            is_creator: doc.created_by == Some(requester.user_id),
            permissions,
        }
    }
}

pub async fn handler(
    State(state): State<ServiceState>,
    requester: Requester,
    Path(document_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let view = documents::get_document(
        state.database(),
        state.content_store(),
        &requester,
        document_id,
    )
    .await?;

    Ok(Json(DocumentResponse::from_view(view, &requester)))
}
