use sqlx::SqliteConnection;

use crate::database::models::{Document, DocumentPermission};
use crate::database::types::Privacy;

use super::ArchiveError;

/// Identity attached to every archive call. Resolved once per request
/// by the authentication layer and passed down by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requester {
    pub user_id: i64,
    pub is_admin: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub can_view: bool,
    pub can_edit: bool,
}

impl Capabilities {
    pub const ALL: Capabilities = Capabilities {
        can_view: true,
        can_edit: true,
    };

    pub const NONE: Capabilities = Capabilities {
        can_view: false,
        can_edit: false,
    };
}

/// Decides what `requester` may do with `doc` given the explicit grant
/// (if any) for that user on that document.
///
/// View is open to everyone on public documents. On private ones it
/// requires creatorship or a view grant. Edit always requires
/// creatorship or an edit grant, regardless of privacy. Admins get
/// everything. Grants never subtract: a grant row with both flags
/// false is equivalent to no row.
pub fn capabilities(
    doc: &Document,
    grant: Option<&DocumentPermission>,
    requester: &Requester,
) -> Capabilities {
    if requester.is_admin {
        return Capabilities::ALL;
    }

    // Documents whose creator account was deleted keep working for
    // admins; ordinary users only retain the public read path.
    let is_creator = doc.created_by == Some(requester.user_id);

    let can_view = doc.privacy == Privacy::Public
        || is_creator
        || grant.is_some_and(|g| g.can_view);
    let can_edit = is_creator || grant.is_some_and(|g| g.can_edit);

    Capabilities { can_view, can_edit }
}

/// Loads the grant row (admins skip the lookup) and resolves. Takes a
/// connection so callers inside a transaction resolve against the
/// transaction's snapshot.
pub async fn resolve(
    conn: &mut SqliteConnection,
    doc: &Document,
    requester: &Requester,
) -> Result<Capabilities, ArchiveError> {
    let grant = if requester.is_admin {
        None
    } else {
        DocumentPermission::get(conn, doc.id, requester.user_id).await?
    };
    Ok(capabilities(doc, grant.as_ref(), requester))
}

pub fn require_view(caps: Capabilities) -> Result<(), ArchiveError> {
    if caps.can_view {
        Ok(())
    } else {
        Err(ArchiveError::PermissionDenied)
    }
}

pub fn require_edit(caps: Capabilities) -> Result<(), ArchiveError> {
    if caps.can_edit {
        Ok(())
    } else {
        Err(ArchiveError::PermissionDenied)
    }
}
