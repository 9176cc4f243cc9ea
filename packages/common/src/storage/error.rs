use thiserror::Error;

/// Errors from the object storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The storage service failed or rejected the request.
    #[error("storage backend error: {0}")]
    Backend(String),
    /// The storage client could not be built from its settings.
    #[error("storage configuration error: {0}")]
    Config(String),
}
