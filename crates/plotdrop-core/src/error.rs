//! # Render and Publish Error Types
//!
//! Every failure exit of the render pipeline maps to exactly one variant here.
//! Nothing is retried; the caller receives the first error that occurred.

use thiserror::Error;

use crate::model::DocumentKind;
use crate::validate::CsvError;

/// Render operation result type
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors produced by the render tools.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Table input failed CSV pre-validation; the template was never executed.
    #[error("invalid csv content: {0}")]
    InvalidCsv(#[from] CsvError),

    /// A template source could not be compiled.
    #[error("could not load {kind} template: {}", error_chain(.source))]
    TemplateLoad {
        kind: DocumentKind,
        source: tera::Error,
    },

    /// Template execution failed; the publisher was never invoked.
    #[error("could not render {kind} html content: {}", error_chain(.source))]
    TemplateExecution {
        kind: DocumentKind,
        source: tera::Error,
    },

    /// Publishing failed; the publisher's error is surfaced unchanged.
    #[error(transparent)]
    Publish(#[from] PublishError),
}

impl RenderError {
    /// Stable machine-readable code for the failure stage.
    pub fn code(&self) -> &'static str {
        match self {
            RenderError::InvalidCsv(_) => "invalid_csv",
            RenderError::TemplateLoad { .. } | RenderError::TemplateExecution { .. } => {
                "template_error"
            }
            RenderError::Publish(e) => e.code(),
        }
    }
}

/// Errors produced by storage publishers.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("storage configuration error: {0}")]
    Config(String),

    #[error("failed to create {backend} storage client: {source}")]
    Client {
        backend: &'static str,
        source: object_store::Error,
    },

    #[error("failed to upload object '{key}' to bucket '{bucket}': {source}")]
    Upload {
        bucket: String,
        key: String,
        source: object_store::Error,
    },

    #[error("failed to sign url for object '{key}' in bucket '{bucket}': {source}")]
    Sign {
        bucket: String,
        key: String,
        source: object_store::Error,
    },

    #[error("upload of object '{key}' was cancelled")]
    Cancelled { key: String },
}

impl PublishError {
    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Stable machine-readable code for the failure stage.
    pub fn code(&self) -> &'static str {
        match self {
            PublishError::Config(_) => "configuration_error",
            PublishError::Cancelled { .. } => "cancelled",
            PublishError::Client { .. }
            | PublishError::Upload { .. }
            | PublishError::Sign { .. } => "storage_error",
        }
    }
}

/// Flatten an error and its sources into one line.
///
/// Tera keeps the useful detail (missing variable, bad filter argument) in the
/// source chain, not in the top-level message.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        source = inner.source();
    }
    message
}
