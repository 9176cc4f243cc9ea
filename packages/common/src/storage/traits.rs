use async_trait::async_trait;

use super::error::StorageError;

/// Handle to a freshly uploaded object.
#[derive(Clone, Debug)]
pub struct StoredImage {
    /// Generated object id. Doubles as the storage path stem and the
    /// database primary key of the analysis record.
    pub id: String,
    /// Publicly resolvable URL of the uploaded bytes.
    pub url: String,
}

/// Image byte storage addressed by `{id}.{extension}`.
///
/// Ids are generated fresh on every upload, so paths never collide and no
/// overwrite protection is needed.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Upload raw image bytes under a new id and return the id together
    /// with a public URL for the object.
    async fn upload(
        &self,
        data: &[u8],
        filename: &str,
        content_type: &str,
    ) -> Result<StoredImage, StorageError>;

    /// Remove the object stored at `{id}.{extension}`. Deleting a missing
    /// key follows the backend's own contract; callers decide whether a
    /// failure here matters.
    async fn delete(&self, id: &str, extension: &str) -> Result<(), StorageError>;
}
