use sqlx::{FromRow, SqliteConnection};
use time::{Date, OffsetDateTime};

use crate::database::types::Privacy;
use crate::database::Database;

/// Document row as stored. Content is either `content_bytes` (inline
/// backend) or the descriptor columns, never both.
#[derive(Debug, Clone, FromRow)]
pub struct Document {
    pub id: i64,
    pub title: String,
    pub privacy: Privacy,
    pub created_at: OffsetDateTime,
    pub created_by: Option<i64>,
    pub updated_at: Option<OffsetDateTime>,
    pub updated_by: Option<i64>,
    pub document_date: Option<Date>,
    pub author: Option<String>,
    pub type_id: Option<i64>,
    pub geojson: Option<String>,
    pub content_bytes: Option<Vec<u8>>,
    pub content_provider: Option<String>,
    pub content_bucket: Option<String>,
    pub content_key: Option<String>,
    pub content_mime: Option<String>,
    pub content_size: Option<i64>,
    pub content_sha256: Option<String>,
}

/// Content columns in insert/update form.
#[derive(Debug, Clone, Default)]
pub struct ContentColumns {
    pub bytes: Option<Vec<u8>>,
    pub provider: Option<String>,
    pub bucket: Option<String>,
    pub key: Option<String>,
    pub mime: Option<String>,
    pub size: Option<i64>,
    pub sha256: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewDocumentRow {
    pub title: String,
    pub privacy: Privacy,
    pub created_by: i64,
    pub document_date: Option<Date>,
    pub author: Option<String>,
    pub type_id: Option<i64>,
    pub geojson: Option<String>,
    pub content: ContentColumns,
}

const ALL_COLUMNS: &str = r#"
    id, title, privacy, created_at, created_by, updated_at, updated_by,
    document_date, author, type_id, geojson,
    content_bytes, content_provider, content_bucket, content_key,
    content_mime, content_size, content_sha256
"#;

impl Document {
    pub async fn insert(
        conn: &mut SqliteConnection,
        row: &NewDocumentRow,
    ) -> Result<i64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO documents (
                title, privacy, created_by, document_date, author, type_id, geojson,
                content_bytes, content_provider, content_bucket, content_key,
                content_mime, content_size, content_sha256
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
            "#,
        )
        .bind(&row.title)
        .bind(row.privacy)
        .bind(row.created_by)
        .bind(row.document_date)
        .bind(&row.author)
        .bind(row.type_id)
        .bind(&row.geojson)
        .bind(&row.content.bytes)
        .bind(&row.content.provider)
        .bind(&row.content.bucket)
        .bind(&row.content.key)
        .bind(&row.content.mime)
        .bind(row.content.size)
        .bind(&row.content.sha256)
        .execute(conn)
        .await?;

        Ok(result.last_insert_rowid())
    }

    pub async fn get(conn: &mut SqliteConnection, id: i64) -> Result<Option<Document>, sqlx::Error> {
        sqlx::query_as::<_, Document>(&format!(
            "SELECT {} FROM documents WHERE id = ?1",
            ALL_COLUMNS
        ))
        .bind(id)
        .fetch_optional(conn)
        .await
    }

    /// Write back every mutable column of a merged document state.
    /// `updated_by`/`updated_at` are always set together.
    pub async fn persist_update(
        conn: &mut SqliteConnection,
        updater_id: i64,
        doc: &Document,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE documents
            SET title = ?1, privacy = ?2, document_date = ?3, author = ?4,
                type_id = ?5, geojson = ?6,
                content_bytes = ?7, content_provider = ?8, content_bucket = ?9,
                content_key = ?10, content_mime = ?11, content_size = ?12,
                content_sha256 = ?13,
                updated_by = ?14, updated_at = CURRENT_TIMESTAMP
            WHERE id = ?15
            "#,
        )
        .bind(&doc.title)
        .bind(doc.privacy)
        .bind(doc.document_date)
        .bind(&doc.author)
        .bind(doc.type_id)
        .bind(&doc.geojson)
        .bind(&doc.content_bytes)
        .bind(&doc.content_provider)
        .bind(&doc.content_bucket)
        .bind(&doc.content_key)
        .bind(&doc.content_mime)
        .bind(doc.content_size)
        .bind(&doc.content_sha256)
        .bind(updater_id)
        .bind(doc.id)
        .execute(conn)
        .await?;

        Ok(())
    }

    pub async fn delete(conn: &mut SqliteConnection, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM documents WHERE id = ?1")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Tag names associated with a document, in catalog order.
    pub async fn tag_names(db: &Database, id: i64) -> Result<Vec<String>, sqlx::Error> {
        let rows: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT t.name
            FROM document_tags dt
            JOIN tags t ON t.id = dt.tag_id
            WHERE dt.document_id = ?1
            ORDER BY lower(t.name)
            "#,
        )
        .bind(id)
        .fetch_all(&**db)
        .await?;

        Ok(rows.into_iter().map(|(name,)| name).collect())
    }

    /// Replace the full tag association set for a document.
    pub async fn replace_tags(
        conn: &mut SqliteConnection,
        id: i64,
        tag_ids: &[i64],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM document_tags WHERE document_id = ?1")
            .bind(id)
            .execute(&mut *conn)
            .await?;

        for tag_id in tag_ids {
            sqlx::query(
                "INSERT OR IGNORE INTO document_tags (document_id, tag_id) VALUES (?1, ?2)",
            )
            .bind(id)
            .bind(tag_id)
            .execute(&mut *conn)
            .await?;
        }

        Ok(())
    }

    pub fn has_remote_content(&self) -> bool {
        self.content_key.is_some()
    }

    pub fn has_inline_content(&self) -> bool {
        self.content_bytes.is_some()
    }
}
