//! Storage publishers: upload a rendered document and hand back a browser URL.
//!
//! Two backends sit behind the [`Publisher`] trait:
//!
//! - [`SignedUrlPublisher`]: Google Cloud Storage with ambient credentials, a fixed
//!   bucket and prefix, answering with a V4 signed URL valid for 15 minutes.
//! - [`StaticEndpointPublisher`]: an S3-compatible endpoint (MinIO) configured
//!   from the environment, answering with a permanent path-style URL that relies
//!   on the bucket being publicly readable.
//!
//! Exactly one backend is active per process, chosen once via [`StorageConfig`].
//! Uploads are single attempts; any failure is terminal for the invocation.

mod config;
mod signed_url;
mod static_endpoint;
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use config::{
    BackendChoice, SignedUrlConfig, StaticEndpointSettings, StorageConfig, SIGNED_URL_BUCKET,
    SIGNED_URL_PREFIX, SIGNED_URL_TTL,
};
pub use signed_url::SignedUrlPublisher;
pub use static_endpoint::{build_public_url, PublicUrl, StaticEndpointPublisher};

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use object_store::path::Path;
use object_store::{Attribute, Attributes, ObjectStore, PutOptions, PutPayload};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::error::PublishError;

/// Media type every document is stored with.
pub const HTML_CONTENT_TYPE: &str = "text/html";

/// Location of an uploaded document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishedObject {
    pub bucket: String,
    pub key: String,
    /// URL a browser can open directly.
    pub url: String,
    /// When the URL stops working; `None` for permanent public URLs.
    pub expires_at: Option<DateTime<Utc>>,
}

/// Uploads a rendered document and returns where it can be viewed.
///
/// Implementations choose the object name, upload with [`HTML_CONTENT_TYPE`] and
/// make exactly one attempt. The upload is abandoned when `cancel` fires.
#[async_trait]
pub trait Publisher: Send + Sync + std::fmt::Debug {
    async fn publish(
        &self,
        document: Vec<u8>,
        cancel: &CancellationToken,
    ) -> Result<PublishedObject, PublishError>;
}

/// Build the publisher for the configured backend.
pub fn build_publisher(config: StorageConfig) -> Arc<dyn Publisher> {
    match config {
        StorageConfig::SignedUrl(config) => Arc::new(SignedUrlPublisher::new(config)),
        StorageConfig::StaticEndpoint(settings) => Arc::new(StaticEndpointPublisher::new(settings)),
    }
}

/// Store `document` at `path` as HTML, racing the caller's cancellation.
pub(crate) async fn put_html(
    store: &dyn ObjectStore,
    bucket: &str,
    path: &Path,
    document: Vec<u8>,
    cancel: &CancellationToken,
) -> Result<(), PublishError> {
    let mut attributes = Attributes::new();
    attributes.insert(Attribute::ContentType, HTML_CONTENT_TYPE.into());
    let options = PutOptions {
        attributes,
        ..Default::default()
    };

    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(PublishError::Cancelled { key: path.to_string() }),
        result = store.put_opts(path, PutPayload::from(document), options) => {
            result.map(|_| ()).map_err(|source| PublishError::Upload {
                bucket: bucket.to_string(),
                key: path.to_string(),
                source,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use object_store::memory::InMemory;

    #[tokio::test]
    async fn test_put_html_sets_content_type() {
        let store = InMemory::new();
        let path = Path::from("renders/amber-birch-cedar-00042.html");

        put_html(&store, "bucket", &path, b"<html></html>".to_vec(), &CancellationToken::new())
            .await
            .unwrap();

        let result = store.get(&path).await.unwrap();
        let content_type = result.attributes.get(&Attribute::ContentType).map(|v| {
            let value: &str = v.as_ref();
            value.to_string()
        });
        assert_eq!(content_type.as_deref(), Some(HTML_CONTENT_TYPE));
        assert_eq!(result.bytes().await.unwrap().as_ref(), b"<html></html>");
    }

    #[tokio::test]
    async fn test_put_html_honors_cancellation() {
        let store = InMemory::new();
        let path = Path::from("renders/cancelled.html");
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = put_html(&store, "bucket", &path, b"x".to_vec(), &cancel)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            PublishError::Cancelled { ref key } if key == "renders/cancelled.html"
        ));
    }
}
