//! Error types for the content store.

/// Errors that can occur when working with stored content.
#[derive(Debug, thiserror::Error)]
pub enum ContentStoreError {
    /// Object storage error
    #[error("object storage error: {0}")]
    ObjectStore(#[from] object_store::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The configured backend cannot mint presigned URLs
    #[error("the configured content backend does not support signed URLs")]
    SigningUnsupported,

    /// Object not found
    #[error("content not found: {0}")]
    NotFound(String),

    /// S3 bucket not found - must be created before use
    #[error("S3 bucket '{0}' does not exist. Create it before starting the service.")]
    BucketNotFound(String),
}

/// Result type alias for content store operations.
pub type Result<T> = std::result::Result<T, ContentStoreError>;
