//! Admin-only audit log listings.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::archive::{audit, Requester};
use crate::database::models::AuditRecord;
use crate::http_server::api::ApiError;
use crate::ServiceState;

use super::datetime::parse_date;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/by_user", get(by_user_handler))
        .route("/by_table", get(by_table_handler))
        .route("/by_date", get(by_date_handler))
        .with_state(state)
}

#[derive(Debug, Clone, Serialize)]
pub struct LogEntryResponse {
    pub id: i64,
    pub action: String,
    pub table_name: String,
    pub record_id: Option<i64>,
    pub user_id: Option<i64>,
    pub action_time: String,
    pub changes: Option<serde_json::Value>,
}

impl From<AuditRecord> for LogEntryResponse {
    fn from(record: AuditRecord) -> Self {
        LogEntryResponse {
            id: record.id,
            action: record.action,
            table_name: record.table_name,
            record_id: record.record_id,
            user_id: record.user_id,
            action_time: record.action_time.to_string(),
            changes: record
                .changes
                .as_deref()
                .and_then(|raw| serde_json::from_str(raw).ok()),
        }
    }
}

fn to_response(records: Vec<AuditRecord>) -> Json<Vec<LogEntryResponse>> {
    Json(records.into_iter().map(LogEntryResponse::from).collect())
}

#[derive(Debug, Clone, Deserialize)]
pub struct ByUserQuery {
    pub user_id: i64,
    #[serde(default)]
    pub limit: i64,
}

pub async fn by_user_handler(
    State(state): State<ServiceState>,
    requester: Requester,
    Query(query): Query<ByUserQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let records =
        audit::logs_by_user(state.database(), &requester, query.user_id, query.limit).await?;
    Ok(to_response(records))
}

#[derive(Debug, Clone, Deserialize)]
pub struct ByTableQuery {
    pub table: String,
    #[serde(default)]
    pub limit: i64,
}

pub async fn by_table_handler(
    State(state): State<ServiceState>,
    requester: Requester,
    Query(query): Query<ByTableQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let records =
        audit::logs_by_table(state.database(), &requester, &query.table, query.limit).await?;
    Ok(to_response(records))
}

#[derive(Debug, Clone, Deserialize)]
pub struct ByDateQuery {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub limit: i64,
}

pub async fn by_date_handler(
    State(state): State<ServiceState>,
    requester: Requester,
    Query(query): Query<ByDateQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let from = parse_date("from", &query.from)?;
    let to = parse_date("to", &query.to)?;
    let records = audit::logs_by_date(state.database(), &requester, from, to, query.limit).await?;
    Ok(to_response(records))
}
