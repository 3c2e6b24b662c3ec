use axum::extract::{Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};

use crate::archive::documents::{self, ContentPayload, ContentUpload, DocumentPatch};
use crate::archive::Requester;
use crate::http_server::api::ApiError;
use crate::ServiceState;

use super::multipart_error;

/// Serve document content: inline bytes directly, remote objects as a
/// redirect to a presigned URL (or proxied when the backend cannot
/// sign).
pub async fn download_handler(
    State(state): State<ServiceState>,
    requester: Requester,
    Path(document_id): Path<i64>,
) -> Result<Response, ApiError> {
    let payload = documents::download_content(
        state.database(),
        state.content_store(),
        &requester,
        document_id,
    )
    .await?;

    let response = match payload {
        ContentPayload::Bytes { bytes, mime } => {
            ([(header::CONTENT_TYPE, mime)], bytes).into_response()
        }
        ContentPayload::Redirect(url) => Redirect::temporary(&url).into_response(),
    };

    Ok(response)
}

/// Replace document content. Expects one multipart `file` field; the
/// previous content reference is overwritten in the same update.
pub async fn replace_handler(
    State(state): State<ServiceState>,
    requester: Requester,
    Path(document_id): Path<i64>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let mut upload: Option<ContentUpload> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some("file") {
            continue;
        }
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
        upload = Some(ContentUpload {
            filename,
            bytes,
            mime,
        });
    }

    let Some(upload) = upload else {
        return Err(ApiError::bad_request("file", "missing file field"));
    };

    let patch = DocumentPatch {
        content: Some(upload),
        ..DocumentPatch::default()
    };
    documents::update_document(
        state.database(),
        state.content_store(),
        &requester,
        document_id,
        patch,
    )
    .await?;

    Ok(StatusCode::NO_CONTENT)
}
