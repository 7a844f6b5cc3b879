//! AWS S3 storage implementation.
//!
//! Each document is a single object under `{bucket}/{prefix}/`. S3 object
//! writes replace the whole object, so readers never see a partial document.

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::primitives::ByteStream;
use serde::{Serialize, de::DeserializeOwned};
use tracing::info;

use crate::error::PersistError;
use crate::models::{ChannelConfig, SentAlertSet};
use crate::storage::{ChannelConfigStore, PersistResult, SentAlertStore, keys};

/// S3-backed relay state.
#[derive(Clone)]
pub struct S3Storage {
    client: Client,
    bucket: String,
    prefix: String,
}

impl S3Storage {
    /// Create a new S3 storage instance.
    pub fn new(client: Client, bucket: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            prefix: prefix.into(),
        }
    }

    /// Create S3 storage from environment configuration.
    pub async fn from_env() -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let client = Client::new(&config);

        let bucket = std::env::var("S3_BUCKET").unwrap_or_else(|_| "storm-relay".to_string());
        let prefix = std::env::var("S3_PREFIX").unwrap_or_else(|_| "storm-relay".to_string());

        Self::new(client, bucket, prefix)
    }

    /// Full object key for a document.
    pub fn object_key(&self, key: &str) -> String {
        let prefix = self.prefix.trim_matches('/');
        if prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}/{}", prefix, key)
        }
    }

    /// Read raw bytes, returning None when the object does not exist.
    pub async fn read_bytes_optional(&self, key: &str) -> PersistResult<Option<Vec<u8>>> {
        let object_key = self.object_key(key);
        let result = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(&object_key)
            .send()
            .await;

        match result {
            Ok(output) => {
                let bytes = output
                    .body
                    .collect()
                    .await
                    .map_err(|e| PersistError::read(&object_key, e))?;
                Ok(Some(bytes.into_bytes().to_vec()))
            }
            Err(err) => {
                let service_err = err.into_service_error();
                if service_err.is_no_such_key() {
                    info!("No existing object at s3://{}/{}", self.bucket, object_key);
                    Ok(None)
                } else {
                    Err(PersistError::read(&object_key, service_err))
                }
            }
        }
    }

    async fn read_json<T: DeserializeOwned>(&self, key: &str) -> PersistResult<Option<T>> {
        match self.read_bytes_optional(key).await? {
            Some(bytes) => serde_json::from_slice(&bytes)
                .map(Some)
                .map_err(|e| PersistError::read(self.object_key(key), e)),
            None => Ok(None),
        }
    }

    async fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> PersistResult<()> {
        let object_key = self.object_key(key);
        let json =
            serde_json::to_vec_pretty(value).map_err(|e| PersistError::write(&object_key, e))?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&object_key)
            .body(ByteStream::from(json))
            .content_type("application/json")
            .send()
            .await
            .map_err(|e| PersistError::write(&object_key, e))?;

        info!("Wrote s3://{}/{}", self.bucket, object_key);
        Ok(())
    }
}

#[async_trait]
impl SentAlertStore for S3Storage {
    async fn load_sent(&self) -> PersistResult<SentAlertSet> {
        Ok(self.read_json(keys::SENT_ALERTS).await?.unwrap_or_default())
    }

    async fn save_sent(&self, sent: &SentAlertSet) -> PersistResult<()> {
        self.write_json(keys::SENT_ALERTS, sent).await
    }
}

#[async_trait]
impl ChannelConfigStore for S3Storage {
    async fn load_channels(&self) -> PersistResult<ChannelConfig> {
        Ok(self.read_json(keys::CHANNELS).await?.unwrap_or_default())
    }

    async fn save_channels(&self, config: &ChannelConfig) -> PersistResult<()> {
        self.write_json(keys::CHANNELS, config).await
    }
}
