//! In-memory object store
//!
//! Stands in for S3 in tests and local runs. Keys are listed in
//! lexicographic order, which is what S3 returns for `ListObjectsV2`.

use std::collections::BTreeMap;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::RwLock;

use super::{object_url, ObjectStore, StorageError, StorageResult, StoredObject};

pub struct MemoryStore {
    bucket: String,
    base_url: String,
    objects: RwLock<BTreeMap<String, Bytes>>,
}

impl MemoryStore {
    pub fn new(bucket: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            base_url: base_url.into(),
            objects: RwLock::new(BTreeMap::new()),
        }
    }

    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn put(&self, key: &str, data: Bytes, _content_type: &str) -> StorageResult<StoredObject> {
        self.objects.write().await.insert(key.to_string(), data);
        Ok(StoredObject {
            key: key.to_string(),
            location: object_url(&self.base_url, key),
        })
    }

    async fn list(&self) -> StorageResult<Vec<String>> {
        Ok(self.objects.read().await.keys().cloned().collect())
    }

    async fn get(&self, key: &str) -> StorageResult<Bytes> {
        self.objects
            .read()
            .await
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> MemoryStore {
        MemoryStore::new("test-bucket", "https://test-bucket.s3.amazonaws.com")
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let store = store();
        let stored = store
            .put("notes.txt", Bytes::from_static(b"payload"), "text/plain")
            .await
            .unwrap();

        assert_eq!(stored.key, "notes.txt");
        assert_eq!(stored.location, "https://test-bucket.s3.amazonaws.com/notes.txt");
        assert_eq!(store.get("notes.txt").await.unwrap(), Bytes::from_static(b"payload"));
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let store = store();
        store.put("a.bin", Bytes::from_static(b"one"), "application/octet-stream").await.unwrap();
        store.put("a.bin", Bytes::from_static(b"two"), "application/octet-stream").await.unwrap();

        assert_eq!(store.len().await, 1);
        assert_eq!(store.get("a.bin").await.unwrap(), Bytes::from_static(b"two"));
    }

    #[tokio::test]
    async fn test_missing_key_is_not_found() {
        let err = store().get("nope").await.unwrap_err();
        assert_eq!(err, StorageError::NotFound("nope".to_string()));
    }

    #[tokio::test]
    async fn test_list_empty_and_ordered() {
        let store = store();
        assert!(store.list().await.unwrap().is_empty());

        for key in ["b.txt", "a.txt", "c.txt"] {
            store.put(key, Bytes::new(), "text/plain").await.unwrap();
        }
        assert_eq!(store.list().await.unwrap(), vec!["a.txt", "b.txt", "c.txt"]);
    }
}
