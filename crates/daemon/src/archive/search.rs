//! Visibility-scoped search and listing. The visibility predicate is
//! part of the SQL WHERE clause, so filters, ordering and pagination
//! all operate on the already-restricted set and offsets stay stable
//! for a given requester.

use sqlx::{FromRow, QueryBuilder, Sqlite};
use time::{Date, OffsetDateTime};

use crate::database::types::Privacy;
use crate::database::Database;

use super::{ArchiveError, Requester};

/// Hard ceiling on one page of results.
pub const MAX_PAGE_SIZE: i64 = 500;

/// All filters are optional and conjunctive. Name filters match
/// case-insensitively. `limit <= 0` means "the maximum"; a negative
/// `offset` is treated as zero.
#[derive(Debug, Clone, Default)]
pub struct SearchFilter {
    pub tag: Option<String>,
    pub author: Option<String>,
    pub doc_type: Option<String>,
    pub date_from: Option<Date>,
    pub date_to: Option<Date>,
    pub limit: i64,
    pub offset: i64,
}

/// One search hit. `can_edit` and `is_creator` are computed per row
/// for the requesting user.
#[derive(Debug, Clone, FromRow)]
pub struct DocumentSummary {
    pub id: i64,
    pub title: String,
    pub privacy: Privacy,
    pub created_at: OffsetDateTime,
    pub created_by: Option<i64>,
    pub updated_at: Option<OffsetDateTime>,
    pub document_date: Option<Date>,
    pub author: Option<String>,
    pub type_id: Option<i64>,
    pub can_edit: bool,
    pub is_creator: bool,
}

/// Search documents visible to the requester, most recently touched
/// first (update time falling back to creation time, id breaking
/// ties).
pub async fn search_documents(
    db: &Database,
    requester: &Requester,
    filter: &SearchFilter,
) -> Result<Vec<DocumentSummary>, ArchiveError> {
    if let (Some(from), Some(to)) = (filter.date_from, filter.date_to) {
        if from > to {
            return Err(ArchiveError::validation(
                "date_range",
                "start date is after end date",
            ));
        }
    }

    let uid = requester.user_id;
    let admin = requester.is_admin;

    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
        "SELECT d.id, d.title, d.privacy, d.created_at, d.created_by, \
         d.updated_at, d.document_date, d.author, d.type_id, ",
    );

    qb.push("CASE WHEN ")
        .push_bind(admin)
        .push(" OR d.created_by = ")
        .push_bind(uid)
        .push(
            " OR EXISTS (SELECT 1 FROM document_permissions p \
             WHERE p.document_id = d.id AND p.user_id = ",
        )
        .push_bind(uid)
        .push(" AND p.can_edit) THEN 1 ELSE 0 END AS can_edit, ");

    qb.push("CASE WHEN d.created_by = ")
        .push_bind(uid)
        .push(" THEN 1 ELSE 0 END AS is_creator ");

    qb.push("FROM documents d WHERE (")
        .push_bind(admin)
        .push(" OR d.privacy = 'public' OR d.created_by = ")
        .push_bind(uid)
        .push(
            " OR EXISTS (SELECT 1 FROM document_permissions p \
             WHERE p.document_id = d.id AND p.user_id = ",
        )
        .push_bind(uid)
        .push(" AND p.can_view))");

    if let Some(tag) = &filter.tag {
        qb.push(
            " AND EXISTS (SELECT 1 FROM document_tags dt \
             JOIN tags t ON t.id = dt.tag_id \
             WHERE dt.document_id = d.id AND t.name = ",
        )
        .push_bind(tag.trim())
        .push(" COLLATE NOCASE)");
    }

    if let Some(author) = &filter.author {
        qb.push(" AND d.author = ")
            .push_bind(author.trim())
            .push(" COLLATE NOCASE");
    }

    if let Some(doc_type) = &filter.doc_type {
        qb.push(
            " AND EXISTS (SELECT 1 FROM document_types ty \
             WHERE ty.id = d.type_id AND ty.name = ",
        )
        .push_bind(doc_type.trim())
        .push(" COLLATE NOCASE)");
    }

    if let Some(from) = filter.date_from {
        qb.push(" AND d.document_date >= ").push_bind(from);
    }
    if let Some(to) = filter.date_to {
        qb.push(" AND d.document_date <= ").push_bind(to);
    }

    qb.push(
        " ORDER BY COALESCE(d.updated_at, d.created_at) DESC, \
         d.created_at DESC, d.id DESC",
    );

    let limit = if filter.limit > 0 {
        filter.limit.min(MAX_PAGE_SIZE)
    } else {
        MAX_PAGE_SIZE
    };
    let offset = filter.offset.max(0);
    qb.push(" LIMIT ").push_bind(limit);
    qb.push(" OFFSET ").push_bind(offset);

    let rows = qb
        .build_query_as::<DocumentSummary>()
        .fetch_all(&**db)
        .await?;

    Ok(rows)
}
