//! Login/password accounts and bearer-token sessions. Tokens are
//! opaque random values stored server-side, so sign-out and expiry
//! never depend on client cooperation.

mod error;
mod extractor;

pub use error::AuthError;
pub use extractor::AuthRejection;

use std::time::Duration;

use sha2::{Digest, Sha256};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::archive::Requester;
use crate::database::models::{Session, User};
use crate::database::types::Role;
use crate::database::Database;

const MIN_PASSWORD_LENGTH: usize = 8;

/// Explicit authentication settings; nothing here is read from ambient
/// process state.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub password_salt: String,
    pub session_ttl: Duration,
}

/// Fresh session handed back at sign-in.
#[derive(Debug, Clone)]
pub struct SessionToken {
    pub token: String,
    pub user_id: i64,
    pub role: Role,
    pub expires_at: OffsetDateTime,
}

#[derive(Debug)]
pub struct Authenticator {
    config: AuthConfig,
}

impl Authenticator {
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    fn hash_password(&self, password: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.config.password_salt.as_bytes());
        hasher.update(password.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Register a new account with the default role. Logins are
    /// case-insensitively unique.
    pub async fn sign_up(
        &self,
        db: &Database,
        login: &str,
        password: &str,
        full_name: Option<&str>,
    ) -> Result<i64, AuthError> {
        let login = login.trim();
        if login.is_empty() {
            return Err(AuthError::Validation {
                field: "login",
                reason: "must not be blank".to_string(),
            });
        }
        if password.len() < MIN_PASSWORD_LENGTH {
            return Err(AuthError::Validation {
                field: "password",
                reason: format!("must be at least {MIN_PASSWORD_LENGTH} characters"),
            });
        }

        let full_name = full_name.map(str::trim).filter(|n| !n.is_empty());
        let id = User::insert(db, login, &self.hash_password(password), full_name, Role::User)
            .await?;
        Ok(id)
    }

    /// Verify credentials and mint a session token.
    pub async fn sign_in(
        &self,
        db: &Database,
        login: &str,
        password: &str,
    ) -> Result<SessionToken, AuthError> {
        let user = User::get_by_login(db, login.trim())
            .await?
            .ok_or(AuthError::InvalidCredentials)?;
        if user.password_hash != self.hash_password(password) {
            return Err(AuthError::InvalidCredentials);
        }

        let token = Uuid::new_v4().to_string();
        let expires_at = OffsetDateTime::now_utc() + self.config.session_ttl;
        Session::insert(db, &token, user.id, expires_at).await?;

        Ok(SessionToken {
            token,
            user_id: user.id,
            role: user.role,
            expires_at,
        })
    }

    /// Resolve a bearer token into a request identity. Unknown and
    /// expired tokens are indistinguishable to the caller.
    pub async fn resolve(&self, db: &Database, token: &str) -> Result<Requester, AuthError> {
        let session = Session::get(db, token)
            .await?
            .ok_or(AuthError::InvalidToken)?;
        if session.is_expired(OffsetDateTime::now_utc()) {
            return Err(AuthError::InvalidToken);
        }

        let user = User::get(db, session.user_id)
            .await?
            .ok_or(AuthError::InvalidToken)?;

        Ok(Requester {
            user_id: user.id,
            is_admin: user.role.is_admin(),
        })
    }
}
