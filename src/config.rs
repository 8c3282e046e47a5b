use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::str::FromStr;

pub const DEFAULT_BUCKET: &str = "bucket-for-ai-generated-content";
pub const DEFAULT_MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub upload: UploadConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageProvider {
    S3,
    Memory,
}

impl FromStr for StorageProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "s3" => Ok(StorageProvider::S3),
            "memory" => Ok(StorageProvider::Memory),
            other => Err(anyhow::anyhow!("unknown storage provider: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub provider: StorageProvider,
    pub s3_bucket: String,
    pub s3_region: String,
    pub s3_access_key_id: Option<String>,
    pub s3_secret_access_key: Option<String>,
    pub s3_endpoint: Option<String>,
    pub public_base_url: Option<String>,
}

impl StorageConfig {
    /// Base URL that object keys are appended to when building `file_url`.
    ///
    /// An explicit `S3_PUBLIC_BASE_URL` wins. With a custom endpoint the
    /// bucket is addressed path-style, otherwise the virtual-hosted AWS form
    /// is used.
    pub fn public_base_url(&self) -> String {
        if let Some(url) = &self.public_base_url {
            return url.trim_end_matches('/').to_string();
        }
        match &self.s3_endpoint {
            Some(endpoint) => format!("{}/{}", endpoint.trim_end_matches('/'), self.s3_bucket),
            None => format!("https://{}.s3.amazonaws.com", self.s3_bucket),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    pub max_file_size: usize,
    /// Empty means every content type is accepted.
    pub allowed_content_types: Vec<String>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            allowed_content_types: Vec::new(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Self {
            server: ServerConfig {
                port: parse_var(&var, "PORT", 8000)?,
                host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                cors_allowed_origins: split_list(&var("ALLOWED_ORIGINS").unwrap_or_default()),
            },
            storage: StorageConfig {
                provider: parse_var(&var, "STORAGE_PROVIDER", StorageProvider::S3)?,
                s3_bucket: var("S3_BUCKET").unwrap_or_else(|| DEFAULT_BUCKET.to_string()),
                s3_region: var("S3_REGION").unwrap_or_else(|| "us-east-1".to_string()),
                s3_access_key_id: var("AWS_ACCESS_KEY_ID"),
                s3_secret_access_key: var("AWS_SECRET_ACCESS_KEY"),
                s3_endpoint: var("S3_ENDPOINT"),
                public_base_url: var("S3_PUBLIC_BASE_URL"),
            },
            upload: UploadConfig {
                max_file_size: parse_var(&var, "MAX_UPLOAD_BYTES", DEFAULT_MAX_FILE_SIZE)?,
                allowed_content_types: split_list(&var("ALLOWED_CONTENT_TYPES").unwrap_or_default())
                    .into_iter()
                    .map(|t| t.to_lowercase())
                    .collect(),
            },
        })
    }
}

fn parse_var<T, F>(var: &F, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("{}", e))
            .with_context(|| format!("invalid value for {}: {:?}", key, raw)),
        None => Ok(default),
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.server.port, 8000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert!(config.server.cors_allowed_origins.is_empty());
        assert_eq!(config.storage.provider, StorageProvider::S3);
        assert_eq!(config.storage.s3_bucket, DEFAULT_BUCKET);
        assert_eq!(config.storage.s3_region, "us-east-1");
        assert!(config.storage.s3_endpoint.is_none());
        assert_eq!(config.upload.max_file_size, 5 * 1024 * 1024);
        assert!(config.upload.allowed_content_types.is_empty());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("PORT", "9090"),
            ("ALLOWED_ORIGINS", "http://a.test, http://b.test"),
            ("STORAGE_PROVIDER", "Memory"),
            ("S3_BUCKET", "uploads"),
            ("MAX_UPLOAD_BYTES", "1024"),
            ("ALLOWED_CONTENT_TYPES", "image/PNG,application/pdf"),
        ])
        .unwrap();

        assert_eq!(config.server.port, 9090);
        assert_eq!(
            config.server.cors_allowed_origins,
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
        assert_eq!(config.storage.provider, StorageProvider::Memory);
        assert_eq!(config.storage.s3_bucket, "uploads");
        assert_eq!(config.upload.max_file_size, 1024);
        assert_eq!(
            config.upload.allowed_content_types,
            vec!["image/png".to_string(), "application/pdf".to_string()]
        );
    }

    #[test]
    fn test_invalid_port_names_variable() {
        let err = config_from(&[("PORT", "not-a-port")]).unwrap_err();
        assert!(format!("{:#}", err).contains("PORT"));
    }

    #[test]
    fn test_unknown_provider_rejected() {
        assert!(config_from(&[("STORAGE_PROVIDER", "gcs")]).is_err());
    }

    #[test]
    fn test_public_base_url() {
        let aws = config_from(&[("S3_BUCKET", "media")]).unwrap();
        assert_eq!(aws.storage.public_base_url(), "https://media.s3.amazonaws.com");

        let custom = config_from(&[
            ("S3_BUCKET", "media"),
            ("S3_ENDPOINT", "http://localhost:9000/"),
        ])
        .unwrap();
        assert_eq!(custom.storage.public_base_url(), "http://localhost:9000/media");

        let explicit = config_from(&[("S3_PUBLIC_BASE_URL", "https://cdn.example.com/")]).unwrap();
        assert_eq!(explicit.storage.public_base_url(), "https://cdn.example.com");
    }
}
