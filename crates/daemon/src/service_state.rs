use std::sync::Arc;

use content_store::{ContentStore, ContentStoreError};

use crate::auth::{AuthConfig, Authenticator};
use crate::database::{Database, DatabaseSetupError};
use crate::service_config::Config;

/// Shared service state: one database pool, one content store, one
/// authenticator. Cheap to clone, handed to every request handler.
#[derive(Clone)]
pub struct State {
    database: Database,
    content_store: ContentStore,
    auth: Arc<Authenticator>,
}

impl State {
    pub async fn from_config(config: &Config) -> Result<Self, StateSetupError> {
        let database = match &config.sqlite_path {
            Some(path) => Database::connect(path).await?,
            None => Database::memory().await?,
        };

        let content_store = ContentStore::new(config.content_store.clone()).await?;

        let auth = Arc::new(Authenticator::new(AuthConfig {
            password_salt: config.password_salt.clone(),
            session_ttl: config.session_ttl,
        }));

        Ok(Self {
            database,
            content_store,
            auth,
        })
    }

    /// In-memory fixture: throwaway database, inline content, fixed
    /// salt. Used by integration tests.
    pub async fn for_testing() -> Self {
        let database = Database::memory()
            .await
            .unwrap_or_else(|err| panic!("failed to set up in-memory database: {err}"));
        Self {
            database,
            content_store: ContentStore::inline(),
            auth: Arc::new(Authenticator::new(AuthConfig {
                password_salt: "testing-salt".to_string(),
                session_ttl: std::time::Duration::from_secs(3600),
            })),
        }
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn content_store(&self) -> &ContentStore {
        &self.content_store
    }

    pub fn auth(&self) -> &Authenticator {
        &self.auth
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateSetupError {
    #[error("failed to set up database: {0}")]
    Database(#[from] DatabaseSetupError),
    #[error("failed to set up content store: {0}")]
    ContentStore(#[from] ContentStoreError),
}
