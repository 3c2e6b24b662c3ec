use sqlx::FromRow;
use time::OffsetDateTime;

use crate::database::Database;

/// Opaque bearer token minted at sign-in.
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub token: String,
    pub user_id: i64,
    pub created_at: OffsetDateTime,
    pub expires_at: OffsetDateTime,
}

impl Session {
    pub async fn insert(
        db: &Database,
        token: &str,
        user_id: i64,
        expires_at: OffsetDateTime,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("INSERT INTO sessions (token, user_id, expires_at) VALUES (?1, ?2, ?3)")
            .bind(token)
            .bind(user_id)
            .bind(expires_at)
            .execute(&**db)
            .await?;
        Ok(())
    }

    pub async fn get(db: &Database, token: &str) -> Result<Option<Session>, sqlx::Error> {
        sqlx::query_as::<_, Session>(
            "SELECT token, user_id, created_at, expires_at FROM sessions WHERE token = ?1",
        )
        .bind(token)
        .fetch_optional(&**db)
        .await
    }

    /// Expiry is checked against the caller-supplied clock so the
    /// comparison never depends on sqlite's timestamp text format.
    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        self.expires_at <= now
    }
}
