//! Raw backend response.

use crate::{Error, ErrorContext, Result};
use bytes::Bytes;

/// The backend's answer, exactly as received.
///
/// Nothing is parsed when the response is produced; interpretation according to
/// the requested [`OutputFormat`](super::OutputFormat) is left to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendResponse {
    status: u16,
    content_type: Option<String>,
    body: Bytes,
}

impl BackendResponse {
    pub fn new(status: u16, content_type: Option<String>, body: Bytes) -> Self {
        Self {
            status,
            content_type,
            body,
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    /// `Content-Type` header as sent by the backend, if any.
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn bytes(&self) -> &Bytes {
        &self.body
    }

    pub fn into_bytes(self) -> Bytes {
        self.body
    }

    /// Body as UTF-8 text. Fails instead of replacing invalid sequences.
    pub fn text(&self) -> Result<&str> {
        std::str::from_utf8(&self.body).map_err(|e| {
            Error::validation_with_context(
                format!("response body is not valid UTF-8: {}", e),
                ErrorContext::new().with_source("backend_response"),
            )
        })
    }

    /// Parse a `json` output body.
    pub fn json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}
