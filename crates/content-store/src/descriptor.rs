use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Location and metadata of content held outside the relational row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentDescriptor {
    /// Backend label ("s3", "local", "memory")
    pub provider: String,
    /// Bucket or container holding the object
    pub bucket: String,
    /// Object key within the bucket
    pub key: String,
    /// Declared MIME type
    pub mime: String,
    /// Size in bytes
    pub size: i64,
    /// Hex-encoded SHA-256 of the content
    pub sha256: String,
}

/// What `put` handed back: either the bytes themselves (inline mode,
/// the caller persists them alongside the record) or a descriptor
/// pointing into the object store.
#[derive(Debug, Clone)]
pub enum StoredContent {
    Inline {
        bytes: Bytes,
        mime: String,
        size: i64,
        sha256: String,
    },
    Object(ContentDescriptor),
}

impl StoredContent {
    pub fn mime(&self) -> &str {
        match self {
            StoredContent::Inline { mime, .. } => mime,
            StoredContent::Object(desc) => &desc.mime,
        }
    }

    pub fn size(&self) -> i64 {
        match self {
            StoredContent::Inline { size, .. } => *size,
            StoredContent::Object(desc) => desc.size,
        }
    }

    pub fn sha256(&self) -> &str {
        match self {
            StoredContent::Inline { sha256, .. } => sha256,
            StoredContent::Object(desc) => &desc.sha256,
        }
    }
}
