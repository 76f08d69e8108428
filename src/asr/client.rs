//! ASR client: one multipart POST per call, response relayed untouched.

use super::response::BackendResponse;
use super::types::{AudioPayload, TranscriptionOptions};
use crate::config::AsrConfig;
use crate::transport::{build_http_client, TransportError};
use crate::Result;
use std::time::Duration;

/// Client for a Whisper-compatible `/asr` endpoint.
///
/// Holds only immutable configuration and a shared `reqwest::Client`, so a single
/// instance (or its clones) can serve concurrent calls without locking.
#[derive(Debug, Clone)]
pub struct AsrClient {
    http_client: reqwest::Client,
    endpoint: String,
}

impl AsrClient {
    pub fn builder() -> AsrClientBuilder {
        AsrClientBuilder::new()
    }

    /// Client configured from `WHISPER_ASR_*` environment variables.
    pub fn from_env() -> Result<Self> {
        AsrClientBuilder::new().with_env()?.build()
    }

    pub fn from_config(config: AsrConfig) -> Result<Self> {
        let config = config.validated()?;
        let http_client = build_http_client(&config)?;
        Ok(Self {
            http_client,
            endpoint: config.endpoint(),
        })
    }

    /// Resolved URL of the transcription endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Build the outbound request without sending it.
    ///
    /// The audio is the only multipart field; options go to the query string with
    /// absent optional fields omitted.
    pub fn build_request(
        &self,
        options: &TranscriptionOptions,
        audio: &AudioPayload,
    ) -> Result<reqwest::Request> {
        let form = audio.to_form()?;
        self.http_client
            .post(&self.endpoint)
            .query(options)
            .multipart(form)
            .build()
            .map_err(|e| crate::Error::Transport(TransportError::Http(e)))
    }

    /// Send one transcription request and return the backend's body verbatim.
    ///
    /// Connection errors, timeouts and non-2xx statuses all come back as
    /// [`Error::Transport`](crate::Error::Transport) carrying the reqwest error.
    pub async fn transcribe(
        &self,
        options: &TranscriptionOptions,
        audio: &AudioPayload,
    ) -> Result<BackendResponse> {
        let request = self.build_request(options, audio)?;
        tracing::debug!(
            endpoint = %self.endpoint,
            task = %options.task,
            output = %options.output,
            audio_bytes = audio.len(),
            "sending transcription request"
        );

        let response = self
            .http_client
            .execute(request)
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                tracing::warn!(status = ?e.status(), "transcription request failed: {}", e);
                crate::Error::Transport(TransportError::Http(e))
            })?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let body = response
            .bytes()
            .await
            .map_err(|e| crate::Error::Transport(TransportError::Http(e)))?;

        tracing::info!(status, body_bytes = body.len(), "transcription response received");
        Ok(BackendResponse::new(status, content_type, body))
    }
}

/// Builder for [`AsrClient`]. Unset values fall back to [`AsrConfig::default`].
pub struct AsrClientBuilder {
    config: AsrConfig,
}

impl AsrClientBuilder {
    pub fn new() -> Self {
        Self {
            config: AsrConfig::default(),
        }
    }

    /// Start from environment configuration; later setters override it.
    pub fn with_env(mut self) -> Result<Self> {
        self.config = AsrConfig::from_env()?;
        Ok(self)
    }

    pub fn config(mut self, config: AsrConfig) -> Self {
        self.config = config;
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Prefix placed before `/asr`, typically rewritten away by a reverse proxy.
    pub fn base_path(mut self, path: impl Into<String>) -> Self {
        self.config.base_path = path.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    pub fn proxy(mut self, url: impl Into<String>) -> Self {
        self.config.proxy_url = Some(url.into());
        self
    }

    pub fn build(self) -> Result<AsrClient> {
        AsrClient::from_config(self.config)
    }
}

impl Default for AsrClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
