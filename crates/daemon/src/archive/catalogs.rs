//! Operations over the three name registries: authors, document types
//! and tags. All three share the same shape and rules; handlers pick
//! the registry by passing its [`CatalogTable`] descriptor.

use serde_json::json;

use crate::database::models::{CatalogEntry, CatalogTable};
use crate::database::Database;

use super::{audit, ArchiveError, Requester};

fn validated_name(name: &str) -> Result<&str, ArchiveError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ArchiveError::validation("name", "must not be blank"));
    }
    Ok(name)
}

/// Create-or-fetch by name. Returns the canonical stored entry, which
/// may differ in casing from the request when the name already existed.
/// Only an actual insert leaves an audit row; the fetch path mutates
/// nothing.
pub async fn create_or_fetch(
    db: &Database,
    requester: &Requester,
    table: CatalogTable,
    name: &str,
) -> Result<CatalogEntry, ArchiveError> {
    let name = validated_name(name)?;

    let mut conn = db.acquire().await?;
    let (id, inserted) = table.get_or_create(&mut conn, name).await?;
    drop(conn);

    let entry = table.get(db, id).await?.ok_or(ArchiveError::NotFound)?;
    if inserted {
        audit::record(
            db,
            "create",
            table.table,
            Some(entry.id),
            requester,
            Some(json!({ "name": entry.name })),
        )
        .await;
    }

    Ok(entry)
}

pub async fn list(db: &Database, table: CatalogTable) -> Result<Vec<CatalogEntry>, ArchiveError> {
    Ok(table.list(db).await?)
}

pub async fn get(
    db: &Database,
    table: CatalogTable,
    id: i64,
) -> Result<CatalogEntry, ArchiveError> {
    table.get(db, id).await?.ok_or(ArchiveError::NotFound)
}

/// Rename an entry. A name collision with another entry surfaces as a
/// conflict via the unique index.
pub async fn rename(
    db: &Database,
    requester: &Requester,
    table: CatalogTable,
    id: i64,
    name: &str,
) -> Result<CatalogEntry, ArchiveError> {
    let name = validated_name(name)?;

    if !table.rename(db, id, name).await? {
        return Err(ArchiveError::NotFound);
    }

    audit::record(
        db,
        "update",
        table.table,
        Some(id),
        requester,
        Some(json!({ "name": name })),
    )
    .await;

    table.get(db, id).await?.ok_or(ArchiveError::NotFound)
}

/// Delete an entry. Documents referencing a deleted author or type keep
/// working: the schema clears the reference rather than blocking the
/// delete, and tag associations cascade away.
pub async fn delete(
    db: &Database,
    requester: &Requester,
    table: CatalogTable,
    id: i64,
) -> Result<(), ArchiveError> {
    if !table.delete(db, id).await? {
        return Err(ArchiveError::NotFound);
    }

    audit::record(db, "delete", table.table, Some(id), requester, None).await;
    Ok(())
}
