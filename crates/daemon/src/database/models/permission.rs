use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqliteConnection};

use crate::database::Database;

/// Explicit per-user grant on one document. At most one row per
/// (document, user) pair; setting an existing pair replaces it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DocumentPermission {
    pub document_id: i64,
    pub user_id: i64,
    pub can_view: bool,
    pub can_edit: bool,
}

impl DocumentPermission {
    pub async fn get(
        conn: &mut SqliteConnection,
        document_id: i64,
        user_id: i64,
    ) -> Result<Option<DocumentPermission>, sqlx::Error> {
        sqlx::query_as::<_, DocumentPermission>(
            r#"
            SELECT document_id, user_id, can_view, can_edit
            FROM document_permissions
            WHERE document_id = ?1 AND user_id = ?2
            "#,
        )
        .bind(document_id)
        .bind(user_id)
        .fetch_optional(conn)
        .await
    }

    /// Last-write-wins replace of the grant for a (document, user) pair.
    pub async fn upsert(
        conn: &mut SqliteConnection,
        document_id: i64,
        user_id: i64,
        can_view: bool,
        can_edit: bool,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO document_permissions (document_id, user_id, can_view, can_edit)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT (document_id, user_id)
            DO UPDATE SET can_view = excluded.can_view, can_edit = excluded.can_edit
            "#,
        )
        .bind(document_id)
        .bind(user_id)
        .bind(can_view)
        .bind(can_edit)
        .execute(conn)
        .await?;

        Ok(())
    }

    /// Returns false when no grant existed (callers treat that as a no-op).
    pub async fn remove(
        conn: &mut SqliteConnection,
        document_id: i64,
        user_id: i64,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM document_permissions WHERE document_id = ?1 AND user_id = ?2")
                .bind(document_id)
                .bind(user_id)
                .execute(conn)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn list_for_document(
        db: &Database,
        document_id: i64,
    ) -> Result<Vec<DocumentPermission>, sqlx::Error> {
        sqlx::query_as::<_, DocumentPermission>(
            r#"
            SELECT document_id, user_id, can_view, can_edit
            FROM document_permissions
            WHERE document_id = ?1
            ORDER BY user_id
            "#,
        )
        .bind(document_id)
        .fetch_all(&**db)
        .await
    }
}
