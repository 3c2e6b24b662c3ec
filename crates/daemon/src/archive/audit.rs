use time::Date;

use crate::database::models::AuditRecord;
use crate::database::Database;

use super::{ArchiveError, Requester};

const DEFAULT_LOG_LIMIT: i64 = 100;
const MAX_LOG_LIMIT: i64 = 1000;

/// Append an audit row after a successful mutation. Auditing is
/// best-effort: a failed append is logged and swallowed so it never
/// rolls back or fails the operation it describes.
pub async fn record(
    db: &Database,
    action: &str,
    table_name: &str,
    record_id: Option<i64>,
    actor: &Requester,
    changes: Option<serde_json::Value>,
) {
    let changes = changes.map(|value| value.to_string());
    if let Err(err) = AuditRecord::insert(
        db,
        action,
        table_name,
        record_id,
        Some(actor.user_id),
        changes.as_deref(),
    )
    .await
    {
        tracing::warn!(action, table = table_name, "failed to append audit record: {err}");
    }
}

fn clamp_limit(limit: i64) -> i64 {
    if limit <= 0 {
        DEFAULT_LOG_LIMIT
    } else {
        limit.min(MAX_LOG_LIMIT)
    }
}

fn require_admin(requester: &Requester) -> Result<(), ArchiveError> {
    if requester.is_admin {
        Ok(())
    } else {
        Err(ArchiveError::PermissionDenied)
    }
}

/// Admin-only: audit trail for one user's actions, newest first.
pub async fn logs_by_user(
    db: &Database,
    requester: &Requester,
    user_id: i64,
    limit: i64,
) -> Result<Vec<AuditRecord>, ArchiveError> {
    require_admin(requester)?;
    Ok(AuditRecord::list_by_user(db, user_id, clamp_limit(limit)).await?)
}

/// Admin-only: audit trail for one table, newest first.
pub async fn logs_by_table(
    db: &Database,
    requester: &Requester,
    table_name: &str,
    limit: i64,
) -> Result<Vec<AuditRecord>, ArchiveError> {
    require_admin(requester)?;
    Ok(AuditRecord::list_by_table(db, table_name, clamp_limit(limit)).await?)
}

/// Admin-only: audit rows whose action time falls inside the inclusive
/// date range.
pub async fn logs_by_date(
    db: &Database,
    requester: &Requester,
    from: Date,
    to: Date,
    limit: i64,
) -> Result<Vec<AuditRecord>, ArchiveError> {
    require_admin(requester)?;
    if from > to {
        return Err(ArchiveError::validation(
            "date_range",
            "start date is after end date",
        ));
    }
    Ok(AuditRecord::list_by_date(db, from, to, clamp_limit(limit)).await?)
}
