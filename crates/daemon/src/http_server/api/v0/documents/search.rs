use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::archive::search::{self, DocumentSummary, SearchFilter};
use crate::archive::Requester;
use crate::http_server::api::ApiError;
use crate::ServiceState;

use super::super::datetime::{format_date, parse_date};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    pub tag: Option<String>,
    pub author: Option<String>,
    #[serde(rename = "type")]
    pub doc_type: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryResponse {
    pub id: i64,
    pub title: String,
    pub privacy: String,
    pub created_at: String,
    pub updated_at: Option<String>,
    pub document_date: Option<String>,
    pub author: Option<String>,
    pub type_id: Option<i64>,
    pub can_edit: bool,
    pub is_creator: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub documents: Vec<SummaryResponse>,
    pub limit: i64,
    pub offset: i64,
}

impl From<DocumentSummary> for SummaryResponse {
    fn from(row: DocumentSummary) -> Self {
        SummaryResponse {
            id: row.id,
            title: row.title,
            privacy: row.privacy.to_string(),
            created_at: row.created_at.to_string(),
            updated_at: row.updated_at.map(|t| t.to_string()),
            document_date: row.document_date.map(format_date),
            author: row.author,
            type_id: row.type_id,
            can_edit: row.can_edit,
            is_creator: row.is_creator,
        }
    }
}

pub async fn handler(
    State(state): State<ServiceState>,
    requester: Requester,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let date_from = query
        .date_from
        .as_deref()
        .filter(|raw| !raw.trim().is_empty())
        .map(|raw| parse_date("date_from", raw))
        .transpose()?;
    let date_to = query
        .date_to
        .as_deref()
        .filter(|raw| !raw.trim().is_empty())
        .map(|raw| parse_date("date_to", raw))
        .transpose()?;

    let filter = SearchFilter {
        tag: query.tag.filter(|t| !t.trim().is_empty()),
        author: query.author.filter(|a| !a.trim().is_empty()),
        doc_type: query.doc_type.filter(|t| !t.trim().is_empty()),
        date_from,
        date_to,
        limit: query.limit.unwrap_or(0),
        offset: query.offset.unwrap_or(0),
    };

    let rows = search::search_documents(state.database(), &requester, &filter).await?;

    Ok(Json(SearchResponse {
        limit: if filter.limit > 0 {
            filter.limit.min(search::MAX_PAGE_SIZE)
        } else {
            search::MAX_PAGE_SIZE
        },
        offset: filter.offset.max(0),
        documents: rows.into_iter().map(SummaryResponse::from).collect(),
    }))
}
