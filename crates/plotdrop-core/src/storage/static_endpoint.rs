//! S3-compatible publisher for a statically configured endpoint (MinIO).

use std::borrow::Cow;

use async_trait::async_trait;
use object_store::aws::AmazonS3Builder;
use object_store::path::Path;
use secrecy::ExposeSecret;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use url::Url;

use super::config::StaticEndpointSettings;
use super::{put_html, PublishedObject, Publisher};
use crate::error::PublishError;
use crate::naming::generate_object_name;

/// Region sent with requests; MinIO ignores it but the signer needs one.
const DEFAULT_REGION: &str = "us-east-1";

/// Publishes to `MINIO_BUCKET` and answers with a permanent path-style URL.
#[derive(Debug, Default)]
pub struct StaticEndpointPublisher {
    settings: StaticEndpointSettings,
}

impl StaticEndpointPublisher {
    pub fn new(settings: StaticEndpointSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl Publisher for StaticEndpointPublisher {
    async fn publish(
        &self,
        document: Vec<u8>,
        cancel: &CancellationToken,
    ) -> Result<PublishedObject, PublishError> {
        let endpoint = self.settings.validate()?;
        let client_endpoint = client_endpoint(endpoint.endpoint, endpoint.use_tls)?;

        let store = AmazonS3Builder::new()
            .with_endpoint(client_endpoint)
            .with_access_key_id(endpoint.access_key_id)
            .with_secret_access_key(endpoint.secret_access_key.expose_secret())
            .with_bucket_name(endpoint.bucket)
            .with_region(DEFAULT_REGION)
            .with_allow_http(!endpoint.use_tls)
            .with_virtual_hosted_style_request(false)
            .build()
            .map_err(|source| PublishError::Client {
                backend: "s3",
                source,
            })?;

        let key = generate_object_name();
        let size = document.len();
        let path = Path::from(key.as_str());
        put_html(&store, endpoint.bucket, &path, document, cancel).await?;
        info!(bucket = endpoint.bucket, object = %key, size, "Uploaded document");

        let url = build_public_url(endpoint.endpoint, endpoint.use_tls, endpoint.bucket, &key)
            .into_string();
        Ok(PublishedObject {
            bucket: endpoint.bucket.to_string(),
            key,
            url,
            expires_at: None,
        })
    }
}

/// The endpoint with a scheme, reading a bare `host[:port]` as the one the
/// TLS flag implies.
fn with_scheme(endpoint: &str, use_tls: bool) -> Cow<'_, str> {
    if endpoint.contains("://") {
        Cow::Borrowed(endpoint)
    } else {
        let scheme = if use_tls { "https" } else { "http" };
        Cow::Owned(format!("{scheme}://{endpoint}"))
    }
}

/// `scheme://host[:port]` for the storage client.
///
/// Only the host and port of the configured endpoint are used; the scheme
/// always follows the TLS flag.
fn client_endpoint(endpoint: &str, use_tls: bool) -> Result<String, PublishError> {
    let scheme = if use_tls { "https" } else { "http" };
    let parsed = Url::parse(&with_scheme(endpoint, use_tls)).map_err(|e| {
        PublishError::config_error(format!("invalid MINIO_ENDPOINT '{endpoint}': {e}"))
    })?;

    let host = parsed.host_str().ok_or_else(|| {
        PublishError::config_error(format!("MINIO_ENDPOINT '{endpoint}' has no host"))
    })?;

    Ok(match parsed.port() {
        Some(port) => format!("{scheme}://{host}:{port}"),
        None => format!("{scheme}://{host}"),
    })
}

/// Public URL of an uploaded object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublicUrl {
    /// Parsed, with repeated slashes in the path collapsed.
    Clean(Url),
    /// The joined string as-is; it did not parse as a URL.
    Unparsed(String),
}

impl PublicUrl {
    pub fn into_string(self) -> String {
        match self {
            PublicUrl::Clean(url) => url.into(),
            PublicUrl::Unparsed(raw) => raw,
        }
    }
}

/// Join `endpoint/bucket/key` into the URL handed back to the caller.
///
/// A scheme-less endpoint gets the scheme implied by `use_tls`, matching the
/// endpoint the upload went to. A string that fails to parse as a
/// hierarchical URL is still returned, so a publish that already succeeded
/// never fails on URL formatting.
pub fn build_public_url(endpoint: &str, use_tls: bool, bucket: &str, key: &str) -> PublicUrl {
    let raw = format!("{}/{bucket}/{key}", with_scheme(endpoint, use_tls));
    match Url::parse(&raw) {
        Ok(url) if url.cannot_be_a_base() => {
            error!(url = %raw, "Public URL has no hierarchical path, returning it unparsed");
            PublicUrl::Unparsed(raw)
        }
        Ok(mut url) => {
            let segments: Vec<&str> = url.path().split('/').filter(|s| !s.is_empty()).collect();
            let path = format!("/{}", segments.join("/"));
            url.set_path(&path);
            PublicUrl::Clean(url)
        }
        Err(e) => {
            error!(url = %raw, error = %e, "Failed to parse public URL, returning it unparsed");
            PublicUrl::Unparsed(raw)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    #[tokio::test]
    async fn test_missing_settings_fail_before_any_request() {
        let publisher = StaticEndpointPublisher::new(StaticEndpointSettings {
            endpoint: Some("http://localhost:9000".into()),
            ..Default::default()
        });

        let err = publisher
            .publish(b"<html></html>".to_vec(), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, PublishError::Config(_)));
        assert_eq!(err.code(), "configuration_error");
        assert!(!err.to_string().contains("MINIO_ENDPOINT"));
        assert!(err.to_string().contains("MINIO_BUCKET"));
    }

    #[tokio::test]
    async fn test_unusable_endpoint_is_a_configuration_error() {
        let publisher = StaticEndpointPublisher::new(StaticEndpointSettings {
            endpoint: Some("http://[::1".into()),
            access_key_id: Some("access".into()),
            secret_access_key: Some(SecretString::from("secret".to_string())),
            bucket: Some("renders".into()),
            use_ssl: Some("false".into()),
        });

        let err = publisher
            .publish(b"x".to_vec(), &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, PublishError::Config(_)));
    }

    #[test]
    fn test_client_endpoint_keeps_host_and_port() {
        assert_eq!(
            client_endpoint("https://minio.example.com:9000/ignored", true).unwrap(),
            "https://minio.example.com:9000"
        );
        assert_eq!(
            client_endpoint("localhost:9000", false).unwrap(),
            "http://localhost:9000"
        );
        // The TLS flag decides the scheme, not the endpoint string.
        assert_eq!(
            client_endpoint("http://minio.internal", true).unwrap(),
            "https://minio.internal"
        );
    }

    #[test]
    fn test_public_url_is_path_style() {
        let url = build_public_url(
            "http://localhost:9000",
            false,
            "renders",
            "amber-birch-cedar-00042.html",
        );
        assert_eq!(
            url.into_string(),
            "http://localhost:9000/renders/amber-birch-cedar-00042.html"
        );
    }

    #[test]
    fn test_public_url_collapses_repeated_slashes() {
        let url = build_public_url(
            "https://minio.example.com/",
            true,
            "renders/",
            "a-b-c-00001.html",
        );
        assert!(matches!(url, PublicUrl::Clean(_)));
        assert_eq!(
            url.into_string(),
            "https://minio.example.com/renders/a-b-c-00001.html"
        );
    }

    #[test]
    fn test_public_url_falls_back_to_raw_string() {
        let url = build_public_url("http://[::1", false, "renders", "a-b-c-00001.html");
        assert_eq!(
            url,
            PublicUrl::Unparsed("http://[::1/renders/a-b-c-00001.html".to_string())
        );
    }

    #[test]
    fn test_public_url_for_bare_host_and_port_follows_tls_flag() {
        let url = build_public_url("localhost:9000", false, "renders", "a-b-c-00001.html");
        assert!(matches!(url, PublicUrl::Clean(_)));
        assert_eq!(url.into_string(), "http://localhost:9000/renders/a-b-c-00001.html");

        let url = build_public_url("minio.local:9000", true, "renders", "a-b-c-00001.html");
        assert_eq!(url.into_string(), "https://minio.local:9000/renders/a-b-c-00001.html");
    }

    #[test]
    fn test_public_url_matches_client_endpoint_host() {
        for (endpoint, use_tls) in [("localhost:9000", false), ("minio.local:9000", true)] {
            let client = client_endpoint(endpoint, use_tls).unwrap();
            let public = build_public_url(endpoint, use_tls, "renders", "a-b-c-00001.html");
            assert_eq!(public.into_string(), format!("{client}/renders/a-b-c-00001.html"));
        }
    }
}
