//! Google Cloud Storage publisher answering with time-limited signed URLs.

use async_trait::async_trait;
use chrono::{TimeDelta, Utc};
use http::Method;
use object_store::gcp::GoogleCloudStorageBuilder;
use object_store::path::Path;
use object_store::signer::Signer;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::config::SignedUrlConfig;
use super::{put_html, PublishedObject, Publisher};
use crate::error::PublishError;
use crate::naming::generate_object_name;

/// Publishes to a fixed GCS bucket using ambient credentials.
///
/// Credentials are resolved the usual Google way: service account variables,
/// then application default credentials, then the instance metadata server.
#[derive(Debug, Clone, Default)]
pub struct SignedUrlPublisher {
    config: SignedUrlConfig,
}

impl SignedUrlPublisher {
    pub fn new(config: SignedUrlConfig) -> Self {
        Self { config }
    }

    /// Key for the next upload: the fixed prefix plus a fresh object name.
    fn next_key(&self) -> String {
        self.config.object_key(&generate_object_name())
    }
}

#[async_trait]
impl Publisher for SignedUrlPublisher {
    async fn publish(
        &self,
        document: Vec<u8>,
        cancel: &CancellationToken,
    ) -> Result<PublishedObject, PublishError> {
        let bucket = self.config.bucket();

        // The client lives for this call only and is dropped on every exit path.
        let store = GoogleCloudStorageBuilder::from_env()
            .with_bucket_name(bucket)
            .build()
            .map_err(|source| PublishError::Client {
                backend: "gcs",
                source,
            })?;

        let key = self.next_key();
        let path = Path::from(key.as_str());
        let size = document.len();

        put_html(&store, bucket, &path, document, cancel).await?;
        info!(bucket, object = %key, size, "Uploaded document");

        let ttl = self.config.ttl();
        let signed_at = Utc::now();
        let url = store
            .signed_url(Method::GET, &path, ttl)
            .await
            .map_err(|source| PublishError::Sign {
                bucket: bucket.to_string(),
                key: key.clone(),
                source,
            })?;
        debug!(object = %key, ttl_secs = ttl.as_secs(), "Signed document url");

        Ok(PublishedObject {
            bucket: bucket.to_string(),
            key,
            url: url.to_string(),
            expires_at: TimeDelta::from_std(ttl).ok().map(|ttl| signed_at + ttl),
        })
    }
}
