//! Document mutation engine: create, read, partial update, delete,
//! permission grants and content download. All writes go through a
//! transaction; content uploads happen before any row is touched so a
//! failed upload leaves no record behind.

use std::collections::HashSet;
use std::time::Duration;

use bytes::Bytes;
use content_store::{ContentStore, ContentStoreError, StoredContent};
use serde_json::json;
use time::Date;

use crate::database::models::{
    CatalogEntry, Document, DocumentPermission, NewDocumentRow, DOCUMENT_TYPES, TAGS,
};
use crate::database::types::Privacy;
use crate::database::Database;

use super::{audit, permissions, ArchiveError, Requester};

/// How long a minted download URL stays valid.
pub const SIGNED_URL_TTL: Duration = Duration::from_secs(300);

const FALLBACK_MIME: &str = "application/octet-stream";

/// Binary payload accepted from the transport layer.
#[derive(Debug, Clone)]
pub struct ContentUpload {
    pub filename: String,
    pub bytes: Bytes,
    pub mime: String,
}

/// Input for document creation. Optional fields default: privacy to
/// public, everything else to absent.
#[derive(Debug, Clone, Default)]
pub struct NewDocument {
    pub title: String,
    pub privacy: Option<Privacy>,
    pub document_date: Option<Date>,
    pub author: Option<String>,
    pub type_id: Option<i64>,
    pub geojson: Option<String>,
    pub tags: Vec<String>,
    pub content: Option<ContentUpload>,
}

/// Partial update. The outer `Option` is presence: `None` leaves the
/// stored value alone. For nullable fields the inner `Option` carries
/// the new value, `Some(None)` clearing it. `tags` replaces the whole
/// association set; an empty vector clears it.
#[derive(Debug, Clone, Default)]
pub struct DocumentPatch {
    pub title: Option<String>,
    pub privacy: Option<Privacy>,
    pub document_date: Option<Option<Date>>,
    pub author: Option<Option<String>>,
    pub type_id: Option<Option<i64>>,
    pub geojson: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
    pub content: Option<ContentUpload>,
}

impl DocumentPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.privacy.is_none()
            && self.document_date.is_none()
            && self.author.is_none()
            && self.type_id.is_none()
            && self.geojson.is_none()
            && self.tags.is_none()
            && self.content.is_none()
    }
}

/// Content metadata exposed to readers. `download_url` is only present
/// on backends that can sign; otherwise callers download through the
/// service.
#[derive(Debug, Clone)]
pub struct ContentInfo {
    pub mime: String,
    pub size: i64,
    pub sha256: String,
    pub inline: bool,
    pub download_url: Option<String>,
}

/// Fully resolved read model for one document.
#[derive(Debug, Clone)]
pub struct DocumentView {
    pub document: Document,
    pub type_name: Option<String>,
    pub tags: Vec<String>,
    pub content: Option<ContentInfo>,
    pub capabilities: permissions::Capabilities,
    /// Grant rows, present only when the requester can edit.
    pub grants: Vec<DocumentPermission>,
}

/// Outcome of a content download request.
#[derive(Debug, Clone)]
pub enum ContentPayload {
    /// Serve these bytes directly.
    Bytes { bytes: Bytes, mime: String },
    /// Redirect the client to a presigned URL.
    Redirect(String),
}

fn validated_title(title: &str) -> Result<String, ArchiveError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ArchiveError::validation("title", "must not be blank"));
    }
    Ok(title.to_string())
}

fn validated_geojson(raw: &str) -> Result<String, ArchiveError> {
    let raw = raw.trim();
    if serde_json::from_str::<serde_json::Value>(raw).is_err() {
        return Err(ArchiveError::validation("geojson", "not valid JSON"));
    }
    Ok(raw.to_string())
}

fn normalized_author(author: Option<String>) -> Option<String> {
    author
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty())
}

/// Trim, drop blanks and case-insensitively dedupe, keeping the first
/// spelling of each tag.
pub(crate) fn normalized_tags(tags: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for tag in tags {
        let tag = tag.trim();
        if tag.is_empty() {
            continue;
        }
        if seen.insert(tag.to_lowercase()) {
            out.push(tag.to_string());
        }
    }
    out
}

fn content_columns(stored: StoredContent) -> crate::database::models::ContentColumns {
    use crate::database::models::ContentColumns;

    match stored {
        StoredContent::Inline {
            bytes,
            mime,
            size,
            sha256,
        } => ContentColumns {
            bytes: Some(bytes.to_vec()),
            mime: Some(mime),
            size: Some(size),
            sha256: Some(sha256),
            ..ContentColumns::default()
        },
        StoredContent::Object(desc) => ContentColumns {
            bytes: None,
            provider: Some(desc.provider),
            bucket: Some(desc.bucket),
            key: Some(desc.key),
            mime: Some(desc.mime),
            size: Some(desc.size),
            sha256: Some(desc.sha256),
        },
    }
}

async fn resolve_tag_ids(
    conn: &mut sqlx::SqliteConnection,
    names: &[String],
) -> Result<Vec<i64>, ArchiveError> {
    let mut ids = Vec::with_capacity(names.len());
    for name in names {
        let (id, _) = TAGS.get_or_create(conn, name).await?;
        ids.push(id);
    }
    Ok(ids)
}

/// Create a document owned by the requester. Content, if supplied, is
/// uploaded first; the row and its tag associations then land in one
/// transaction.
pub async fn create_document(
    db: &Database,
    store: &ContentStore,
    requester: &Requester,
    input: NewDocument,
) -> Result<i64, ArchiveError> {
    let title = validated_title(&input.title)?;
    let geojson = input
        .geojson
        .as_deref()
        .map(validated_geojson)
        .transpose()?;
    let tags = normalized_tags(&input.tags);

    let content = match input.content {
        Some(upload) => {
            let mime = if upload.mime.is_empty() {
                FALLBACK_MIME
            } else {
                &upload.mime
            };
            content_columns(store.put(&upload.filename, upload.bytes, mime).await?)
        }
        None => Default::default(),
    };

    let row = NewDocumentRow {
        title: title.clone(),
        privacy: input.privacy.unwrap_or_default(),
        created_by: requester.user_id,
        document_date: input.document_date,
        author: normalized_author(input.author),
        type_id: input.type_id,
        geojson,
        content,
    };

    let mut tx = db.begin().await?;
    let id = Document::insert(&mut tx, &row).await?;
    if !tags.is_empty() {
        let tag_ids = resolve_tag_ids(&mut tx, &tags).await?;
        Document::replace_tags(&mut tx, id, &tag_ids).await?;
    }
    tx.commit().await?;

    audit::record(
        db,
        "create",
        "documents",
        Some(id),
        requester,
        Some(json!({ "title": title, "tags": tags })),
    )
    .await;

    Ok(id)
}

async fn load_authorized(
    db: &Database,
    requester: &Requester,
    id: i64,
) -> Result<(Document, permissions::Capabilities), ArchiveError> {
    let mut conn = db.acquire().await?;
    load_authorized_on(&mut conn, requester, id).await
}

async fn load_authorized_on(
    conn: &mut sqlx::SqliteConnection,
    requester: &Requester,
    id: i64,
) -> Result<(Document, permissions::Capabilities), ArchiveError> {
    let doc = Document::get(&mut *conn, id)
        .await?
        .ok_or(ArchiveError::NotFound)?;
    let caps = permissions::resolve(conn, &doc, requester).await?;
    Ok((doc, caps))
}

async fn content_info(
    store: &ContentStore,
    doc: &Document,
) -> Result<Option<ContentInfo>, ArchiveError> {
    if doc.has_inline_content() {
        return Ok(Some(ContentInfo {
            mime: doc
                .content_mime
                .clone()
                .unwrap_or_else(|| FALLBACK_MIME.to_string()),
            size: doc.content_size.unwrap_or_default(),
            sha256: doc.content_sha256.clone().unwrap_or_default(),
            inline: true,
            download_url: None,
        }));
    }

    let Some(key) = doc.content_key.as_deref() else {
        return Ok(None);
    };

    let download_url = match store.signed_url(key, SIGNED_URL_TTL).await {
        Ok(url) => Some(url.to_string()),
        Err(ContentStoreError::SigningUnsupported) => None,
        Err(err) => return Err(err.into()),
    };

    Ok(Some(ContentInfo {
        mime: doc
            .content_mime
            .clone()
            .unwrap_or_else(|| FALLBACK_MIME.to_string()),
        size: doc.content_size.unwrap_or_default(),
        sha256: doc.content_sha256.clone().unwrap_or_default(),
        inline: false,
        download_url,
    }))
}

/// Fetch one document with its tags, type name, content metadata and
/// (for editors) the grant list.
pub async fn get_document(
    db: &Database,
    store: &ContentStore,
    requester: &Requester,
    id: i64,
) -> Result<DocumentView, ArchiveError> {
    let (doc, caps) = load_authorized(db, requester, id).await?;
    permissions::require_view(caps)?;

    let tags = Document::tag_names(db, id).await?;
    let type_name = match doc.type_id {
        Some(type_id) => DOCUMENT_TYPES.get(db, type_id).await?.map(|e: CatalogEntry| e.name),
        None => None,
    };
    let grants = if caps.can_edit {
        DocumentPermission::list_for_document(db, id).await?
    } else {
        Vec::new()
    };
    let content = content_info(store, &doc).await?;

    Ok(DocumentView {
        document: doc,
        type_name,
        tags,
        content,
        capabilities: caps,
        grants,
    })
}

/// Apply a partial update. Fields absent from the patch keep their
/// stored value. The row is re-read and merged inside the write
/// transaction, so a patch that never named a field can not write a
/// stale value back over a concurrent update to it.
pub async fn update_document(
    db: &Database,
    store: &ContentStore,
    requester: &Requester,
    id: i64,
    patch: DocumentPatch,
) -> Result<(), ArchiveError> {
    if patch.is_empty() {
        return Err(ArchiveError::validation("patch", "no fields to update"));
    }

    // Reject unauthorized callers before uploading anything.
    let (_, caps) = load_authorized(db, requester, id).await?;
    permissions::require_edit(caps)?;

    let title = patch.title.as_deref().map(validated_title).transpose()?;
    let geojson = match patch.geojson {
        Some(inner) => Some(inner.as_deref().map(validated_geojson).transpose()?),
        None => None,
    };
    let new_tags = patch.tags.map(|tags| normalized_tags(&tags));

    // Content upload stays outside the transaction; only the stored
    // reference crosses into it.
    let content = match patch.content {
        Some(upload) => {
            let mime = if upload.mime.is_empty() {
                FALLBACK_MIME
            } else {
                &upload.mime
            };
            Some(content_columns(
                store.put(&upload.filename, upload.bytes, mime).await?,
            ))
        }
        None => None,
    };

    let mut tx = db.begin().await?;
    // Fresh snapshot and capability re-check under the transaction.
    let (mut doc, caps) = load_authorized_on(&mut tx, requester, id).await?;
    permissions::require_edit(caps)?;

    let mut touched: Vec<&'static str> = Vec::new();

    if let Some(title) = title {
        doc.title = title;
        touched.push("title");
    }
    if let Some(privacy) = patch.privacy {
        doc.privacy = privacy;
        touched.push("privacy");
    }
    if let Some(date) = patch.document_date {
        doc.document_date = date;
        touched.push("document_date");
    }
    if let Some(author) = patch.author {
        doc.author = normalized_author(author);
        touched.push("author");
    }
    if let Some(type_id) = patch.type_id {
        doc.type_id = type_id;
        touched.push("type_id");
    }
    if let Some(geojson) = geojson {
        doc.geojson = geojson;
        touched.push("geojson");
    }
    if new_tags.is_some() {
        touched.push("tags");
    }
    if let Some(cols) = content {
        doc.content_bytes = cols.bytes;
        doc.content_provider = cols.provider;
        doc.content_bucket = cols.bucket;
        doc.content_key = cols.key;
        doc.content_mime = cols.mime;
        doc.content_size = cols.size;
        doc.content_sha256 = cols.sha256;
        touched.push("content");
    }

    Document::persist_update(&mut tx, requester.user_id, &doc).await?;
    if let Some(tags) = &new_tags {
        let tag_ids = resolve_tag_ids(&mut tx, tags).await?;
        Document::replace_tags(&mut tx, id, &tag_ids).await?;
    }
    tx.commit().await?;

    audit::record(
        db,
        "update",
        "documents",
        Some(id),
        requester,
        Some(json!({ "fields": touched })),
    )
    .await;

    Ok(())
}

/// Delete a document. Tag associations and grants cascade away with
/// the row. Stored objects are left behind; keys are timestamped so
/// they are never reused.
pub async fn delete_document(
    db: &Database,
    requester: &Requester,
    id: i64,
) -> Result<(), ArchiveError> {
    let (_, caps) = load_authorized(db, requester, id).await?;
    permissions::require_edit(caps)?;

    let mut conn = db.acquire().await?;
    if !Document::delete(&mut conn, id).await? {
        return Err(ArchiveError::NotFound);
    }
    drop(conn);

    audit::record(db, "delete", "documents", Some(id), requester, None).await;
    Ok(())
}

/// Upsert a grant for `target_user`. Setting both flags false removes
/// the row instead of keeping a no-op grant around. The target id is
/// not required to name an existing account; a stale grant simply
/// never matches.
pub async fn set_permission(
    db: &Database,
    requester: &Requester,
    document_id: i64,
    target_user: i64,
    can_view: bool,
    can_edit: bool,
) -> Result<(), ArchiveError> {
    if target_user <= 0 {
        return Err(ArchiveError::validation("user_id", "must be positive"));
    }

    let (_, caps) = load_authorized(db, requester, document_id).await?;
    permissions::require_edit(caps)?;

    let mut conn = db.acquire().await?;
    if can_view || can_edit {
        DocumentPermission::upsert(&mut conn, document_id, target_user, can_view, can_edit)
            .await?;
    } else {
        DocumentPermission::remove(&mut conn, document_id, target_user).await?;
    }
    drop(conn);

    audit::record(
        db,
        "set_permission",
        "document_permissions",
        Some(document_id),
        requester,
        Some(json!({
            "user_id": target_user,
            "can_view": can_view,
            "can_edit": can_edit,
        })),
    )
    .await;

    Ok(())
}

/// Drop the grant for `target_user`. Removing a grant that does not
/// exist is a no-op, not an error.
pub async fn remove_permission(
    db: &Database,
    requester: &Requester,
    document_id: i64,
    target_user: i64,
) -> Result<(), ArchiveError> {
    let (_, caps) = load_authorized(db, requester, document_id).await?;
    permissions::require_edit(caps)?;

    let mut conn = db.acquire().await?;
    let removed = DocumentPermission::remove(&mut conn, document_id, target_user).await?;
    drop(conn);

    if removed {
        audit::record(
            db,
            "remove_permission",
            "document_permissions",
            Some(document_id),
            requester,
            Some(json!({ "user_id": target_user })),
        )
        .await;
    }

    Ok(())
}

/// Hand back document content: inline bytes directly, remote objects
/// as a presigned redirect when the backend can sign, otherwise the
/// bytes fetched through the service.
pub async fn download_content(
    db: &Database,
    store: &ContentStore,
    requester: &Requester,
    id: i64,
) -> Result<ContentPayload, ArchiveError> {
    let (doc, caps) = load_authorized(db, requester, id).await?;
    permissions::require_view(caps)?;

    let mime = doc
        .content_mime
        .clone()
        .unwrap_or_else(|| FALLBACK_MIME.to_string());

    if let Some(bytes) = doc.content_bytes {
        return Ok(ContentPayload::Bytes {
            bytes: Bytes::from(bytes),
            mime,
        });
    }

    let Some(key) = doc.content_key.as_deref() else {
        return Err(ArchiveError::NotFound);
    };

    match store.signed_url(key, SIGNED_URL_TTL).await {
        Ok(url) => Ok(ContentPayload::Redirect(url.to_string())),
        Err(ContentStoreError::SigningUnsupported) => {
            let bytes = store.get(key).await?;
            Ok(ContentPayload::Bytes { bytes, mime })
        }
        Err(err) => Err(err.into()),
    }
}
