use content_store::ContentStoreError;

/// Failure taxonomy for archive operations. The kind is stable and
/// survives to the HTTP layer; the message is advisory.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("invalid {field}: {reason}")]
    Validation {
        field: &'static str,
        reason: String,
    },

    #[error("record not found")]
    NotFound,

    #[error("permission denied")]
    PermissionDenied,

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("dependency failure: {0}")]
    Dependency(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ArchiveError {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        ArchiveError::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// Stable machine-readable kind label.
    pub fn kind(&self) -> &'static str {
        match self {
            ArchiveError::Validation { .. } => "validation",
            ArchiveError::NotFound => "not_found",
            ArchiveError::PermissionDenied => "permission_denied",
            ArchiveError::Conflict(_) => "conflict",
            ArchiveError::Dependency(_) => "dependency",
        }
    }
}

impl From<sqlx::Error> for ArchiveError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ArchiveError::NotFound,
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                ArchiveError::Conflict(db.message().to_string())
            }
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                ArchiveError::validation("reference", "referenced record does not exist")
            }
            other => ArchiveError::Dependency(Box::new(other)),
        }
    }
}

impl From<ContentStoreError> for ArchiveError {
    fn from(err: ContentStoreError) -> Self {
        ArchiveError::Dependency(Box::new(err))
    }
}
