// S3 client backed by rust-s3

use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use s3::creds::Credentials;
use s3::error::S3Error;
use s3::region::Region;
use s3::Bucket;
use tracing::{debug, error};

use super::{object_url, ObjectStore, StorageError, StorageResult, StoredObject};
use crate::config::StorageConfig;

pub struct S3Store {
    bucket: Bucket,
    base_url: String,
}

impl S3Store {
    /// Build the client once at startup.
    ///
    /// Explicit keys from the config are used when both are present,
    /// otherwise credentials come from the SDK's default chain (environment,
    /// profile, instance metadata).
    pub fn new(config: &StorageConfig) -> Result<Self> {
        let region = match &config.s3_endpoint {
            Some(endpoint) => Region::Custom {
                region: config.s3_region.clone(),
                endpoint: endpoint.trim_end_matches('/').to_string(),
            },
            None => config.s3_region.parse()?,
        };

        let credentials = match (&config.s3_access_key_id, &config.s3_secret_access_key) {
            (Some(access_key), Some(secret_key)) => {
                Credentials::new(Some(access_key.as_str()), Some(secret_key.as_str()), None, None, None)?
            }
            _ => Credentials::default()?,
        };

        let mut bucket = Bucket::new(&config.s3_bucket, region, credentials)?;
        if config.s3_endpoint.is_some() {
            bucket = bucket.with_path_style();
        }

        Ok(Self {
            bucket,
            base_url: config.public_base_url(),
        })
    }
}

// A 404 for a missing bucket is a configuration fault, not a missing object.
fn is_not_found(err: &S3Error) -> bool {
    match err {
        S3Error::HttpFailWithBody(status, body) => {
            body.contains("NoSuchKey") || (*status == 404 && !body.contains("NoSuchBucket"))
        }
        _ => false,
    }
}

fn backend_error(op: &str, key: &str, err: S3Error) -> StorageError {
    error!(operation = op, key = %key, error = %err, "S3 request failed");
    StorageError::Backend(err.to_string())
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> StorageResult<StoredObject> {
        debug!(bucket = %self.bucket.name(), key = %key, size = data.len(), "put_object");
        self.bucket
            .put_object_with_content_type(key, &data, content_type)
            .await
            .map_err(|e| backend_error("put_object", key, e))?;

        Ok(StoredObject {
            key: key.to_string(),
            location: object_url(&self.base_url, key),
        })
    }

    /// Every key in the bucket. `Bucket::list` follows continuation tokens,
    /// so a bucket holding more than one page (1000 keys) costs one
    /// `ListObjectsV2` call per page.
    async fn list(&self) -> StorageResult<Vec<String>> {
        debug!(bucket = %self.bucket.name(), "list_objects_v2");
        let pages = self
            .bucket
            .list(String::new(), None)
            .await
            .map_err(|e| backend_error("list_objects_v2", "", e))?;

        Ok(pages
            .into_iter()
            .flat_map(|page| page.contents.into_iter().map(|object| object.key))
            .collect())
    }

    async fn get(&self, key: &str) -> StorageResult<Bytes> {
        debug!(bucket = %self.bucket.name(), key = %key, "get_object");
        match self.bucket.get_object(key).await {
            Ok(response) => Ok(Bytes::copy_from_slice(response.bytes())),
            Err(e) if is_not_found(&e) => Err(StorageError::NotFound(key.to_string())),
            Err(e) => Err(backend_error("get_object", key, e)),
        }
    }

    fn bucket(&self) -> &str {
        &self.bucket.name
    }
}
