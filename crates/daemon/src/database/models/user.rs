use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

use crate::database::types::Role;
use crate::database::Database;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub login: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub full_name: Option<String>,
    pub role: Role,
    pub created_at: OffsetDateTime,
}

impl User {
    pub async fn insert(
        db: &Database,
        login: &str,
        password_hash: &str,
        full_name: Option<&str>,
        role: Role,
    ) -> Result<i64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (login, password_hash, full_name, role)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(login)
        .bind(password_hash)
        .bind(full_name)
        .bind(role)
        .execute(&**db)
        .await?;

        Ok(result.last_insert_rowid())
    }

    pub async fn get(db: &Database, id: i64) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT id, login, password_hash, full_name, role, created_at FROM users WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&**db)
        .await
    }

    pub async fn get_by_login(db: &Database, login: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, login, password_hash, full_name, role, created_at
            FROM users
            WHERE login = ?1
            "#,
        )
        .bind(login)
        .fetch_optional(&**db)
        .await
    }
}
