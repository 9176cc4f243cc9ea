use async_trait::async_trait;
use s3::creds::Credentials;
use s3::{Bucket, Region};
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

use super::{ObjectStore, StorageError, StoredImage, extension_of};

/// Connection settings for an S3-compatible bucket.
#[derive(Clone, Debug, Deserialize)]
pub struct S3Settings {
    pub endpoint: String,
    pub region: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    /// Base URL for public object links. Defaults to `{endpoint}/{bucket}`,
    /// which assumes path-style addressing on a public bucket.
    pub public_url: Option<String>,
}

/// [`ObjectStore`] backed by an S3-compatible service.
///
/// The bucket handle is constructed once at startup and shared across
/// requests; rust-s3 keeps no per-request state of its own.
pub struct S3ObjectStore {
    bucket: Box<Bucket>,
    public_base: String,
}

impl S3ObjectStore {
    pub fn new(settings: &S3Settings) -> Result<Self, StorageError> {
        let endpoint = settings.endpoint.trim_end_matches('/');
        let region = Region::Custom {
            region: settings.region.clone(),
            endpoint: endpoint.to_string(),
        };
        let credentials = Credentials::new(
            Some(&settings.access_key),
            Some(&settings.secret_key),
            None,
            None,
            None,
        )
        .map_err(|e| StorageError::Config(e.to_string()))?;
        let bucket = Bucket::new(&settings.bucket, region, credentials)
            .map_err(|e| StorageError::Config(e.to_string()))?
            .with_path_style();

        let public_base = match &settings.public_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("{endpoint}/{}", settings.bucket),
        };

        Ok(Self {
            bucket,
            public_base,
        })
    }

    fn object_path(id: &str, extension: &str) -> String {
        format!("{id}.{extension}")
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn upload(
        &self,
        data: &[u8],
        filename: &str,
        content_type: &str,
    ) -> Result<StoredImage, StorageError> {
        let id = Uuid::new_v4().to_string();
        let path = Self::object_path(&id, extension_of(filename));

        debug!(%path, content_type, size = data.len(), "Uploading object");
        self.bucket
            .put_object_with_content_type(&path, data, content_type)
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        let url = format!("{}/{path}", self.public_base);
        Ok(StoredImage { id, url })
    }

    async fn delete(&self, id: &str, extension: &str) -> Result<(), StorageError> {
        let path = Self::object_path(id, extension);
        debug!(%path, "Deleting object");
        self.bucket
            .delete_object(&path)
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        Ok(())
    }
}
