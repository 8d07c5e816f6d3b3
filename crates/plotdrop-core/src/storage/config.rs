//! Backend selection and connection settings.
//!
//! The signed-URL backend has no external settings: bucket, prefix and URL
//! lifetime are compiled in and credentials come from the ambient environment.
//! The static-endpoint backend reads `MINIO_*` variables:
//!
//! | Variable                  | Required | Meaning                                  |
//! |---------------------------|----------|------------------------------------------|
//! | `MINIO_ENDPOINT`          | yes      | Endpoint URL, also the public URL base   |
//! | `MINIO_ACCESS_KEY_ID`     | yes      | Access key                               |
//! | `MINIO_SECRET_ACCESS_KEY` | yes      | Secret key                               |
//! | `MINIO_BUCKET`            | yes      | Bucket, expected to allow public reads   |
//! | `MINIO_USE_SSL`           | no       | Boolean, invalid values mean `true`      |

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::warn;

use crate::error::PublishError;

/// Bucket every signed-URL document is written to.
pub const SIGNED_URL_BUCKET: &str = "plotdrop-rendered-documents";

/// Key prefix for signed-URL documents.
pub const SIGNED_URL_PREFIX: &str = "renders/";

/// Lifetime of a signed URL.
pub const SIGNED_URL_TTL: Duration = Duration::from_secs(15 * 60);

const ENV_PREFIX: &str = "MINIO";

/// Fixed settings for the signed-URL backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedUrlConfig {
    bucket: String,
    prefix: String,
    ttl: Duration,
}

impl Default for SignedUrlConfig {
    fn default() -> Self {
        Self {
            bucket: SIGNED_URL_BUCKET.to_string(),
            prefix: SIGNED_URL_PREFIX.to_string(),
            ttl: SIGNED_URL_TTL,
        }
    }
}

impl SignedUrlConfig {
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Object key for a generated object name.
    pub fn object_key(&self, object_name: &str) -> String {
        format!("{}{}", self.prefix, object_name)
    }
}

/// Raw static-endpoint settings as found in the environment.
///
/// Nothing is validated on load; validation runs at publish time, before any
/// network call.
#[derive(Default, Deserialize)]
pub struct StaticEndpointSettings {
    pub endpoint: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<SecretString>,
    pub bucket: Option<String>,
    pub use_ssl: Option<String>,
}

impl fmt::Debug for StaticEndpointSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticEndpointSettings")
            .field("endpoint", &self.endpoint)
            .field("access_key_id", &self.access_key_id)
            .field(
                "secret_access_key",
                &self.secret_access_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("bucket", &self.bucket)
            .field("use_ssl", &self.use_ssl)
            .finish()
    }
}

/// Validated static-endpoint settings, borrowed from [`StaticEndpointSettings`].
#[derive(Debug)]
pub(crate) struct StaticEndpoint<'a> {
    pub endpoint: &'a str,
    pub access_key_id: &'a str,
    pub secret_access_key: &'a SecretString,
    pub bucket: &'a str,
    pub use_tls: bool,
}

impl StaticEndpointSettings {
    /// Read `MINIO_*` variables from the process environment.
    pub fn from_env() -> Result<Self, PublishError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| {
                PublishError::config_error(format!("failed to read {ENV_PREFIX}_* settings: {e}"))
            })
    }

    /// Whether any of the required settings is present.
    pub fn is_configured(&self) -> bool {
        present(&self.endpoint).is_some()
            || present(&self.access_key_id).is_some()
            || self
                .secret_access_key
                .as_ref()
                .is_some_and(|s| !s.expose_secret().is_empty())
            || present(&self.bucket).is_some()
    }

    /// Check that every required setting is present and resolve the TLS flag.
    pub(crate) fn validate(&self) -> Result<StaticEndpoint<'_>, PublishError> {
        let endpoint = present(&self.endpoint);
        let access_key_id = present(&self.access_key_id);
        let secret_access_key = self
            .secret_access_key
            .as_ref()
            .filter(|s| !s.expose_secret().is_empty());
        let bucket = present(&self.bucket);

        let (Some(endpoint), Some(access_key_id), Some(secret_access_key), Some(bucket)) =
            (endpoint, access_key_id, secret_access_key, bucket)
        else {
            let missing: Vec<&str> = [
                ("MINIO_ENDPOINT", endpoint.is_none()),
                ("MINIO_ACCESS_KEY_ID", access_key_id.is_none()),
                ("MINIO_SECRET_ACCESS_KEY", secret_access_key.is_none()),
                ("MINIO_BUCKET", bucket.is_none()),
            ]
            .into_iter()
            .filter_map(|(name, is_missing)| is_missing.then_some(name))
            .collect();
            return Err(PublishError::config_error(format!(
                "missing required storage settings: {}",
                missing.join(", ")
            )));
        };

        Ok(StaticEndpoint {
            endpoint,
            access_key_id,
            secret_access_key,
            bucket,
            use_tls: resolve_use_tls(self.use_ssl.as_deref()),
        })
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Interpret the TLS flag; unset means on, unparseable means on with a warning.
fn resolve_use_tls(value: Option<&str>) -> bool {
    match value.filter(|v| !v.is_empty()) {
        None => true,
        Some(raw) => parse_bool(raw).unwrap_or_else(|| {
            warn!(value = raw, "Invalid MINIO_USE_SSL value, defaulting to true");
            true
        }),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// Which backend the operator asked for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BackendChoice {
    /// Static endpoint when any `MINIO_*` setting is present, signed URL otherwise.
    #[default]
    Auto,
    SignedUrl,
    StaticEndpoint,
}

impl FromStr for BackendChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(Self::Auto),
            "signed-url" => Ok(Self::SignedUrl),
            "static-endpoint" => Ok(Self::StaticEndpoint),
            other => Err(format!(
                "unknown storage backend '{other}' (expected auto, signed-url or static-endpoint)"
            )),
        }
    }
}

impl fmt::Display for BackendChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::SignedUrl => write!(f, "signed-url"),
            Self::StaticEndpoint => write!(f, "static-endpoint"),
        }
    }
}

/// The single active storage backend for this process.
#[derive(Debug)]
pub enum StorageConfig {
    SignedUrl(SignedUrlConfig),
    StaticEndpoint(StaticEndpointSettings),
}

impl StorageConfig {
    /// Resolve the backend from the process environment.
    pub fn from_env(choice: BackendChoice) -> Result<Self, PublishError> {
        let settings = StaticEndpointSettings::from_env()?;
        Ok(Self::from_settings(choice, settings))
    }

    /// Resolve the backend from already-loaded settings.
    pub fn from_settings(choice: BackendChoice, settings: StaticEndpointSettings) -> Self {
        match choice {
            BackendChoice::SignedUrl => Self::SignedUrl(SignedUrlConfig::default()),
            BackendChoice::StaticEndpoint => Self::StaticEndpoint(settings),
            BackendChoice::Auto if settings.is_configured() => Self::StaticEndpoint(settings),
            BackendChoice::Auto => Self::SignedUrl(SignedUrlConfig::default()),
        }
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            Self::SignedUrl(_) => "signed-url",
            Self::StaticEndpoint(_) => "static-endpoint",
        }
    }
}
