//! Object storage wrapper (S3/MinIO, local filesystem, memory).

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use http::Method;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::path::Path as ObjectPath;
use object_store::signer::Signer;
use object_store::ObjectStore;
use url::Url;

use crate::error::{ContentStoreError, Result};

/// Wrapper around the object storage backends. Only the S3 backend can
/// mint presigned URLs; the others fall back to proxied reads.
#[derive(Debug, Clone)]
pub(crate) struct Storage {
    inner: Arc<dyn ObjectStore>,
    signer: Option<Arc<AmazonS3>>,
}

impl Storage {
    pub fn memory() -> Self {
        Self {
            inner: Arc::new(InMemory::new()),
            signer: None,
        }
    }

    pub async fn local(path: &PathBuf) -> Result<Self> {
        // Ensure directory exists
        tokio::fs::create_dir_all(path).await?;
        let fs = LocalFileSystem::new_with_prefix(path)
            .map_err(|e| ContentStoreError::InvalidConfig(e.to_string()))?;
        Ok(Self {
            inner: Arc::new(fs),
            signer: None,
        })
    }

    pub async fn s3(
        endpoint: &str,
        access_key: &str,
        secret_key: &str,
        bucket: &str,
        region: Option<&str>,
    ) -> Result<Self> {
        let store = AmazonS3Builder::new()
            .with_endpoint(endpoint)
            .with_access_key_id(access_key)
            .with_secret_access_key(secret_key)
            .with_bucket_name(bucket)
            .with_region(region.unwrap_or("us-east-1"))
            .with_allow_http(endpoint.starts_with("http://"))
            .build()
            .map_err(|e| ContentStoreError::InvalidConfig(e.to_string()))?;
        let store = Arc::new(store);

        // Fail fast if the bucket is missing by listing the empty prefix.
        {
            use futures::TryStreamExt;
            let prefix = ObjectPath::from("");
            let mut stream = store.list(Some(&prefix));
            match stream.try_next().await {
                Ok(_) => {}
                Err(object_store::Error::NotFound { .. }) => {
                    return Err(ContentStoreError::BucketNotFound(bucket.to_string()));
                }
                Err(e) => {
                    let msg = e.to_string();
                    if msg.contains("NoSuchBucket") {
                        return Err(ContentStoreError::BucketNotFound(bucket.to_string()));
                    }
                    return Err(e.into());
                }
            }
        }

        Ok(Self {
            inner: store.clone(),
            signer: Some(store),
        })
    }

    pub async fn put(&self, key: &str, data: Bytes) -> Result<()> {
        let path = ObjectPath::from(key);
        self.inner.put(&path, data.into()).await?;
        Ok(())
    }

    pub async fn get(&self, key: &str) -> Result<Option<Bytes>> {
        let path = ObjectPath::from(key);
        match self.inner.get(&path).await {
            Ok(result) => {
                let bytes = result.bytes().await?;
                Ok(Some(bytes))
            }
            Err(object_store::Error::NotFound { .. }) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Presigned GET URL, valid for `ttl`. S3 backend only.
    pub async fn signed_url(&self, key: &str, ttl: Duration) -> Result<Url> {
        let signer = self
            .signer
            .as_ref()
            .ok_or(ContentStoreError::SigningUnsupported)?;
        let path = ObjectPath::from(key);
        let url = signer.signed_url(Method::GET, &path, ttl).await?;
        Ok(url)
    }
}
