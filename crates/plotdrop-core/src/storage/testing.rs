//! In-memory publisher for tests.

use std::sync::Mutex;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::{PublishedObject, Publisher};
use crate::error::PublishError;

/// URL every [`RecordingPublisher`] upload answers with.
pub const RECORDED_URL: &str = "https://storage.test/renders/recorded.html";

/// Records every published document instead of uploading it.
#[derive(Debug, Default)]
pub struct RecordingPublisher {
    documents: Mutex<Vec<Vec<u8>>>,
}

impl RecordingPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of publish calls so far.
    pub fn calls(&self) -> usize {
        self.documents.lock().map(|docs| docs.len()).unwrap_or_default()
    }

    /// Copies of the published documents, in call order.
    pub fn documents(&self) -> Vec<Vec<u8>> {
        self.documents
            .lock()
            .map(|docs| docs.clone())
            .unwrap_or_default()
    }

    /// The last published document as text.
    pub fn last_document(&self) -> Option<String> {
        self.documents()
            .pop()
            .map(|doc| String::from_utf8_lossy(&doc).into_owned())
    }
}

#[async_trait]
impl Publisher for RecordingPublisher {
    async fn publish(
        &self,
        document: Vec<u8>,
        cancel: &CancellationToken,
    ) -> Result<PublishedObject, PublishError> {
        if cancel.is_cancelled() {
            return Err(PublishError::Cancelled {
                key: "recorded.html".to_string(),
            });
        }
        if let Ok(mut docs) = self.documents.lock() {
            docs.push(document);
        }
        Ok(PublishedObject {
            bucket: "test".to_string(),
            key: "renders/recorded.html".to_string(),
            url: RECORDED_URL.to_string(),
            expires_at: None,
        })
    }
}
