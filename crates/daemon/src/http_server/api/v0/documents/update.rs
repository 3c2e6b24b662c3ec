use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::archive::documents::{self, DocumentPatch};
use crate::archive::Requester;
use crate::http_server::api::ApiError;
use crate::ServiceState;

use super::super::datetime::parse_date;
use super::get::DocumentResponse;

/// Partial update body. Leaving a field out keeps its stored value;
/// for nullable fields an explicit `null` clears it. `tags` always
/// replaces the whole set (an empty array clears it). Content is
/// replaced through the separate content endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateRequest {
    pub title: Option<String>,
    pub privacy: Option<String>,
    #[serde(default, with = "serde_with::rust::double_option")]
    pub document_date: Option<Option<String>>,
    #[serde(default, with = "serde_with::rust::double_option")]
    pub author: Option<Option<String>>,
    #[serde(default, with = "serde_with::rust::double_option")]
    pub type_id: Option<Option<i64>>,
    #[serde(default, with = "serde_with::rust::double_option")]
    pub geojson: Option<Option<serde_json::Value>>,
    pub tags: Option<Vec<String>>,
}

impl UpdateRequest {
    fn into_patch(self) -> Result<DocumentPatch, ApiError> {
        let privacy = self
            .privacy
            .map(|raw| {
                raw.trim()
                    .parse()
                    .map_err(|e: String| ApiError::bad_request("privacy", e))
            })
            .transpose()?;

        let document_date = self
            .document_date
            .map(|inner| {
                inner
                    .map(|raw| parse_date("document_date", &raw))
                    .transpose()
            })
            .transpose()?;

        let geojson = self
            .geojson
            .map(|inner| inner.map(|value| value.to_string()));

        Ok(DocumentPatch {
            title: self.title,
            privacy,
            document_date,
            author: self.author,
            type_id: self.type_id,
            geojson,
            tags: self.tags,
            content: None,
        })
    }
}

pub async fn handler(
    State(state): State<ServiceState>,
    requester: Requester,
    Path(document_id): Path<i64>,
    Json(req): Json<UpdateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let patch = req.into_patch()?;
    documents::update_document(
        state.database(),
        state.content_store(),
        &requester,
        document_id,
        patch,
    )
    .await?;

    let view = documents::get_document(
        state.database(),
        state.content_store(),
        &requester,
        document_id,
    )
    .await?;

    Ok(Json(DocumentResponse::from_view(view, &requester)))
}
