#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("session token is missing, unknown or expired")]
    InvalidToken,

    #[error("login is already taken")]
    LoginTaken,

    #[error("invalid {field}: {reason}")]
    Validation {
        field: &'static str,
        reason: String,
    },

    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for AuthError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db) if db.is_unique_violation() => AuthError::LoginTaken,
            other => AuthError::Database(other),
        }
    }
}
