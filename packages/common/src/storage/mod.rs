mod error;
mod traits;

#[cfg(feature = "object-storage")]
pub mod s3;

pub use error::StorageError;
pub use traits::{ObjectStore, StoredImage};

/// Extension assumed when a filename or URL carries no suffix.
pub const DEFAULT_EXTENSION: &str = "jpg";

/// Extension after the final `.`, or [`DEFAULT_EXTENSION`] when there is
/// none. Used both to build storage paths and to re-derive the path of a
/// stored object from its filename or public URL.
pub fn extension_of(name: &str) -> &str {
    name.rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty())
        .unwrap_or(DEFAULT_EXTENSION)
}
