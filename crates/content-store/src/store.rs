use std::path::PathBuf;
use std::time::Duration;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use time::OffsetDateTime;
use url::Url;

use crate::descriptor::{ContentDescriptor, StoredContent};
use crate::error::{ContentStoreError, Result};
use crate::storage::Storage;

/// Configuration for the content backend.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentStoreConfig {
    /// Content bytes live inline in the document row (default)
    #[default]
    Inline,

    /// In-memory object store (for testing)
    Memory,

    /// Local filesystem object store
    Local {
        /// Path to the storage directory
        path: PathBuf,
    },

    /// S3-compatible object storage (AWS S3, MinIO, etc.)
    S3 {
        /// S3 endpoint URL (e.g., "http://localhost:9000" for MinIO)
        endpoint: String,
        /// Access key ID
        access_key: String,
        /// Secret access key
        secret_key: String,
        /// Bucket name
        bucket: String,
        /// Optional region (defaults to "us-east-1")
        region: Option<String>,
    },
}

#[derive(Debug, Clone)]
enum Backend {
    Inline,
    Remote {
        provider: &'static str,
        bucket: String,
        storage: Storage,
    },
}

/// Content storage capability handed to the archive core.
#[derive(Debug, Clone)]
pub struct ContentStore {
    backend: Backend,
}

impl ContentStore {
    /// Build a content store from configuration.
    pub async fn new(config: ContentStoreConfig) -> Result<Self> {
        let backend = match config {
            ContentStoreConfig::Inline => Backend::Inline,
            ContentStoreConfig::Memory => Backend::Remote {
                provider: "memory",
                bucket: String::new(),
                storage: Storage::memory(),
            },
            ContentStoreConfig::Local { path } => Backend::Remote {
                provider: "local",
                bucket: path.to_string_lossy().into_owned(),
                storage: Storage::local(&path).await?,
            },
            ContentStoreConfig::S3 {
                endpoint,
                access_key,
                secret_key,
                bucket,
                region,
            } => {
                let storage = Storage::s3(
                    &endpoint,
                    &access_key,
                    &secret_key,
                    &bucket,
                    region.as_deref(),
                )
                .await?;
                Backend::Remote {
                    provider: "s3",
                    bucket,
                    storage,
                }
            }
        };
        Ok(Self { backend })
    }

    /// Inline backend, no object store behind it.
    pub fn inline() -> Self {
        Self {
            backend: Backend::Inline,
        }
    }

    /// In-memory object backend (test fixture).
    pub fn memory() -> Self {
        Self {
            backend: Backend::Remote {
                provider: "memory",
                bucket: String::new(),
                storage: Storage::memory(),
            },
        }
    }

    /// True when content bytes should be persisted with the record
    /// instead of referenced through a descriptor.
    pub fn is_inline(&self) -> bool {
        matches!(self.backend, Backend::Inline)
    }

    /// Store one piece of content. The hash and size are computed here
    /// so the caller persists exactly what was accepted.
    pub async fn put(&self, filename: &str, bytes: Bytes, mime: &str) -> Result<StoredContent> {
        let sha256 = hex::encode(Sha256::digest(&bytes));
        let size = bytes.len() as i64;

        match &self.backend {
            Backend::Inline => Ok(StoredContent::Inline {
                bytes,
                mime: mime.to_string(),
                size,
                sha256,
            }),
            Backend::Remote {
                provider,
                bucket,
                storage,
            } => {
                let key = object_key(filename);
                storage.put(&key, bytes).await?;
                Ok(StoredContent::Object(ContentDescriptor {
                    provider: provider.to_string(),
                    bucket: bucket.clone(),
                    key,
                    mime: mime.to_string(),
                    size,
                    sha256,
                }))
            }
        }
    }

    /// Fetch stored object bytes (for proxied downloads on backends
    /// without URL signing).
    pub async fn get(&self, key: &str) -> Result<Bytes> {
        match &self.backend {
            Backend::Inline => Err(ContentStoreError::NotFound(key.to_string())),
            Backend::Remote { storage, .. } => storage
                .get(key)
                .await?
                .ok_or_else(|| ContentStoreError::NotFound(key.to_string())),
        }
    }

    /// Presigned GET URL valid for `ttl`. Errors with
    /// [`ContentStoreError::SigningUnsupported`] on backends that
    /// cannot sign; callers then serve the bytes themselves.
    pub async fn signed_url(&self, key: &str, ttl: Duration) -> Result<Url> {
        match &self.backend {
            Backend::Inline => Err(ContentStoreError::SigningUnsupported),
            Backend::Remote { storage, .. } => storage.signed_url(key, ttl).await,
        }
    }
}

/// Object keys are prefixed and timestamped so repeated uploads of the
/// same filename never collide.
fn object_key(filename: &str) -> String {
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or("unnamed");
    let ts = OffsetDateTime::now_utc().unix_timestamp();
    format!("documents/{}-{}", ts, base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn inline_backend_returns_bytes() {
        let store = ContentStore::inline();
        let stored = store
            .put("report.pdf", Bytes::from("pdf bytes"), "application/pdf")
            .await
            .unwrap();

        match stored {
            StoredContent::Inline {
                bytes, mime, size, ..
            } => {
                assert_eq!(bytes, Bytes::from("pdf bytes"));
                assert_eq!(mime, "application/pdf");
                assert_eq!(size, 9);
            }
            StoredContent::Object(_) => panic!("inline backend produced a descriptor"),
        }
    }

    #[tokio::test]
    async fn memory_backend_returns_descriptor() {
        let store = ContentStore::memory();
        let stored = store
            .put("survey.geojson", Bytes::from("{}"), "application/geo+json")
            .await
            .unwrap();

        let desc = match stored {
            StoredContent::Object(desc) => desc,
            StoredContent::Inline { .. } => panic!("memory backend produced inline content"),
        };
        assert_eq!(desc.provider, "memory");
        assert_eq!(desc.size, 2);
        assert!(desc.key.starts_with("documents/"));
        assert!(desc.key.ends_with("-survey.geojson"));

        // and the object is retrievable through the descriptor key
        let bytes = store.get(&desc.key).await.unwrap();
        assert_eq!(bytes, Bytes::from("{}"));
    }

    #[tokio::test]
    async fn hash_matches_content() {
        let store = ContentStore::inline();
        let stored = store
            .put("a.txt", Bytes::from("hello world"), "text/plain")
            .await
            .unwrap();
        // sha256("hello world")
        assert_eq!(
            stored.sha256(),
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[test]
    fn object_key_uses_basename() {
        let key = object_key("/tmp/uploads/scan 1.png");
        assert!(key.ends_with("-scan 1.png"));
        assert!(key.starts_with("documents/"));

        let key = object_key("");
        assert!(key.ends_with("-unnamed"));
    }
}
