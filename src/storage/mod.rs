// Storage layer (S3-compatible)

use async_trait::async_trait;
use bytes::Bytes;

pub mod memory;
pub mod s3_client;

pub use memory::MemoryStore;
pub use s3_client::S3Store;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    #[error("object not found: {0}")]
    NotFound(String),

    #[error("storage backend error: {0}")]
    Backend(String),
}

pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Result of a successful `put`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub key: String,
    pub location: String,
}

/// The three operations the HTTP layer needs from an object store.
///
/// `put` overwrites an existing key without complaint.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> StorageResult<StoredObject>;

    /// Keys in the order the backend returns them.
    async fn list(&self) -> StorageResult<Vec<String>>;

    async fn get(&self, key: &str) -> StorageResult<Bytes>;

    fn bucket(&self) -> &str;
}

/// `<base>/<key>`, with any trailing slash on `base` dropped.
pub fn object_url(base_url: &str, key: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_url() {
        assert_eq!(
            object_url("https://b.s3.amazonaws.com", "hello.txt"),
            "https://b.s3.amazonaws.com/hello.txt"
        );
        assert_eq!(object_url("http://cdn.test/", "a b.png"), "http://cdn.test/a b.png");
    }
}
