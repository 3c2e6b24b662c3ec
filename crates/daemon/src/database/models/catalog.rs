use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqliteConnection};

use crate::database::Database;

/// One row of a name registry (authors, document types, tags).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CatalogEntry {
    pub id: i64,
    pub name: String,
}

/// A uniqueness-enforcing name-to-id registry. The three catalogs share
/// one shape and differ only in table and column names, so the queries
/// are built from these constants (mirroring the table-name constants
/// the schema is organized around).
#[derive(Debug, Clone, Copy)]
pub struct CatalogTable {
    pub table: &'static str,
    pub name_col: &'static str,
}

pub const AUTHORS: CatalogTable = CatalogTable {
    table: "authors",
    name_col: "full_name",
};

pub const DOCUMENT_TYPES: CatalogTable = CatalogTable {
    table: "document_types",
    name_col: "name",
};

pub const TAGS: CatalogTable = CatalogTable {
    table: "tags",
    name_col: "name",
};

impl CatalogTable {
    /// Idempotent create-or-fetch by name. Returns the id and whether
    /// this call inserted the row. Uniqueness is enforced by the
    /// case-insensitive unique index, so racing creators converge on
    /// one row instead of serializing behind a lock.
    pub async fn get_or_create(
        &self,
        conn: &mut SqliteConnection,
        name: &str,
    ) -> Result<(i64, bool), sqlx::Error> {
        let result = sqlx::query(&format!(
            "INSERT INTO {} ({}) VALUES (?1) ON CONFLICT ({}) DO NOTHING",
            self.table, self.name_col, self.name_col
        ))
        .bind(name)
        .execute(&mut *conn)
        .await?;
        let inserted = result.rows_affected() > 0;

        let (id,): (i64,) = sqlx::query_as(&format!(
            "SELECT id FROM {} WHERE {} = ?1",
            self.table, self.name_col
        ))
        .bind(name)
        .fetch_one(conn)
        .await?;

        Ok((id, inserted))
    }

    pub async fn list(&self, db: &Database) -> Result<Vec<CatalogEntry>, sqlx::Error> {
        sqlx::query_as::<_, CatalogEntry>(&format!(
            "SELECT id, {} AS name FROM {} ORDER BY lower({})",
            self.name_col, self.table, self.name_col
        ))
        .fetch_all(&**db)
        .await
    }

    pub async fn get(&self, db: &Database, id: i64) -> Result<Option<CatalogEntry>, sqlx::Error> {
        sqlx::query_as::<_, CatalogEntry>(&format!(
            "SELECT id, {} AS name FROM {} WHERE id = ?1",
            self.name_col, self.table
        ))
        .bind(id)
        .fetch_optional(&**db)
        .await
    }

    pub async fn rename(&self, db: &Database, id: i64, name: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(&format!(
            "UPDATE {} SET {} = ?1 WHERE id = ?2",
            self.table, self.name_col
        ))
        .bind(name)
        .bind(id)
        .execute(&**db)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(&self, db: &Database, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(&format!("DELETE FROM {} WHERE id = ?1", self.table))
            .bind(id)
            .execute(&**db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
