use axum::extract::{Multipart, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::archive::documents::{self, ContentUpload, NewDocument};
use crate::archive::Requester;
use crate::http_server::api::ApiError;
use crate::ServiceState;

use super::super::datetime::parse_date;
use super::multipart_error;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateResponse {
    pub document_id: i64,
}

/// Multipart creation: metadata travels as text fields, content (if
/// any) as a `file` field. `tags` is a comma-separated list.
pub async fn handler(
    State(state): State<ServiceState>,
    requester: Requester,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let mut input = NewDocument::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match name.as_str() {
            "title" => input.title = field.text().await.map_err(multipart_error)?,
            "privacy" => {
                let raw = field.text().await.map_err(multipart_error)?;
                input.privacy = Some(
                    raw.trim()
                        .parse()
                        .map_err(|e: String| ApiError::bad_request("privacy", e))?,
                );
            }
            "document_date" => {
                let raw = field.text().await.map_err(multipart_error)?;
                if !raw.trim().is_empty() {
                    input.document_date = Some(parse_date("document_date", &raw)?);
                }
            }
            "author" => input.author = Some(field.text().await.map_err(multipart_error)?),
            "type_id" => {
                let raw = field.text().await.map_err(multipart_error)?;
                input.type_id = Some(
                    raw.trim()
                        .parse()
                        .map_err(|_| ApiError::bad_request("type_id", "expected an integer"))?,
                );
            }
            "geojson" => input.geojson = Some(field.text().await.map_err(multipart_error)?),
            "tags" => {
                let raw = field.text().await.map_err(multipart_error)?;
                input.tags = raw.split(',').map(|t| t.trim().to_string()).collect();
            }
            "file" => {
                let filename = field
                    .file_name()
                    .filter(|n| !n.is_empty())
                    .unwrap_or("unnamed")
                    .to_string();
                let mime = match field.content_type() {
                    Some(mime) => mime.to_string(),
                    None => mime_guess::from_path(&filename)
                        .first_or_octet_stream()
                        .to_string(),
                };
                let bytes = field.bytes().await.map_err(multipart_error)?;
                input.content = Some(ContentUpload {
                    filename,
                    bytes,
                    mime,
                });
            }
            other => {
                tracing::debug!(field = other, "ignoring unknown multipart field");
            }
        }
    }

    let document_id = documents::create_document(
        state.database(),
        state.content_store(),
        &requester,
        input,
    )
    .await?;

    tracing::info!(document_id, "document created");
    Ok((
        http::StatusCode::CREATED,
        Json(CreateResponse { document_id }),
    ))
}
