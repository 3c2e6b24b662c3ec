use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{Date, OffsetDateTime};

use crate::database::Database;

/// Append-only audit row; never updated or deleted by the service.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AuditRecord {
    pub id: i64,
    pub action: String,
    pub table_name: String,
    pub record_id: Option<i64>,
    pub user_id: Option<i64>,
    pub action_time: OffsetDateTime,
    pub changes: Option<String>,
}

const ALL_COLUMNS: &str = "id, action, table_name, record_id, user_id, action_time, changes";

impl AuditRecord {
    pub async fn insert(
        db: &Database,
        action: &str,
        table_name: &str,
        record_id: Option<i64>,
        user_id: Option<i64>,
        changes: Option<&str>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO audit_log (action, table_name, record_id, user_id, changes)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(action)
        .bind(table_name)
        .bind(record_id)
        .bind(user_id)
        .bind(changes)
        .execute(&**db)
        .await?;
        Ok(())
    }

    pub async fn list_by_user(
        db: &Database,
        user_id: i64,
        limit: i64,
    ) -> Result<Vec<AuditRecord>, sqlx::Error> {
        sqlx::query_as::<_, AuditRecord>(&format!(
            "SELECT {} FROM audit_log WHERE user_id = ?1 ORDER BY action_time DESC, id DESC LIMIT ?2",
            ALL_COLUMNS
        ))
        .bind(user_id)
        .bind(limit)
        .fetch_all(&**db)
        .await
    }

    pub async fn list_by_table(
        db: &Database,
        table_name: &str,
        limit: i64,
    ) -> Result<Vec<AuditRecord>, sqlx::Error> {
        sqlx::query_as::<_, AuditRecord>(&format!(
            "SELECT {} FROM audit_log WHERE table_name = ?1 ORDER BY action_time DESC, id DESC LIMIT ?2",
            ALL_COLUMNS
        ))
        .bind(table_name)
        .bind(limit)
        .fetch_all(&**db)
        .await
    }

    /// Inclusive date-bounded listing. Bounds are compared against the
    /// date part of `action_time`.
    pub async fn list_by_date(
        db: &Database,
        from: Date,
        to: Date,
        limit: i64,
    ) -> Result<Vec<AuditRecord>, sqlx::Error> {
        sqlx::query_as::<_, AuditRecord>(&format!(
            r#"
            SELECT {}
            FROM audit_log
            WHERE date(action_time) >= date(?1) AND date(action_time) <= date(?2)
            ORDER BY action_time DESC, id DESC
            LIMIT ?3
            "#,
            ALL_COLUMNS
        ))
        .bind(from)
        .bind(to)
        .bind(limit)
        .fetch_all(&**db)
        .await
    }
}
