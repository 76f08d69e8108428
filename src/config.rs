//! Backend address configuration.
//!
//! The backend is reached at `<base_url><base_path>/asr`. Deployments that sit
//! behind a reverse proxy set `base_path` to the proxy's prefix (e.g. `/whisper`)
//! and let the proxy strip it; direct deployments leave it empty.
//!
//! Resolution order: explicit builder values, then environment variables, then
//! defaults. A YAML file can be loaded with [`AsrConfig::from_yaml_file`].
//! Loaders only read; [`AsrConfig::validated`] runs once, when the client is built,
//! so later overrides can still replace a bad value.

use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:9000";

pub const ENV_BASE_URL: &str = "WHISPER_ASR_BASE_URL";
pub const ENV_BASE_PATH: &str = "WHISPER_ASR_BASE_PATH";
pub const ENV_TIMEOUT_SECS: &str = "WHISPER_ASR_TIMEOUT_SECS";
pub const ENV_PROXY_URL: &str = "WHISPER_ASR_PROXY_URL";

/// Resolved configuration for an [`AsrClient`](crate::AsrClient).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AsrConfig {
    /// Backend origin, e.g. `http://192.168.1.20:9000`.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Path prefix placed before `/asr`. Empty means none.
    #[serde(default)]
    pub base_path: String,
    /// Request timeout. `None` leaves reqwest's default (no timeout).
    /// Files and env carry it as whole seconds (`timeout_secs`).
    #[serde(
        default,
        rename = "timeout_secs",
        with = "duration_secs",
        skip_serializing_if = "Option::is_none"
    )]
    pub timeout: Option<Duration>,
    /// Outbound HTTP proxy applied to all requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy_url: Option<String>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for AsrConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            base_path: String::new(),
            timeout: None,
            proxy_url: None,
        }
    }
}

impl AsrConfig {
    /// Read configuration from `WHISPER_ASR_*` environment variables.
    ///
    /// Unset or empty variables fall back to defaults. A timeout that does not
    /// parse as whole seconds is a configuration error rather than silently ignored.
    /// URLs are checked later, by [`AsrConfig::validated`].
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Some(url) = non_empty_var(ENV_BASE_URL) {
            config.base_url = url;
        }
        if let Some(path) = non_empty_var(ENV_BASE_PATH) {
            config.base_path = path;
        }
        if let Some(raw) = non_empty_var(ENV_TIMEOUT_SECS) {
            let secs = raw.parse::<u64>().map_err(|_| {
                Error::configuration_with_context(
                    "timeout must be a whole number of seconds",
                    ErrorContext::new()
                        .with_field_path(ENV_TIMEOUT_SECS)
                        .with_details(raw.clone()),
                )
            })?;
            config.timeout = Some(Duration::from_secs(secs));
        }
        config.proxy_url = non_empty_var(ENV_PROXY_URL);
        Ok(config)
    }

    /// Load configuration from a YAML document on disk.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&raw)
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(raw)?)
    }

    /// Check the base URL, proxy and timeout, and normalize the base path.
    pub fn validated(mut self) -> Result<Self> {
        let parsed = url::Url::parse(&self.base_url).map_err(|e| {
            Error::configuration_with_context(
                format!("invalid base URL: {}", e),
                ErrorContext::new()
                    .with_field_path("base_url")
                    .with_details(self.base_url.clone()),
            )
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::configuration_with_context(
                "base URL must use http or https",
                ErrorContext::new()
                    .with_field_path("base_url")
                    .with_details(self.base_url.clone()),
            ));
        }
        if let Some(proxy) = &self.proxy_url {
            url::Url::parse(proxy).map_err(|e| {
                Error::configuration_with_context(
                    format!("invalid proxy URL: {}", e),
                    ErrorContext::new()
                        .with_field_path("proxy_url")
                        .with_details(proxy.clone()),
                )
            })?;
        }
        if self.timeout == Some(Duration::ZERO) {
            return Err(Error::configuration_with_context(
                "timeout must be greater than zero",
                ErrorContext::new().with_field_path("timeout"),
            ));
        }
        self.base_url = self.base_url.trim_end_matches('/').to_string();
        self.base_path = normalize_base_path(&self.base_path);
        Ok(self)
    }

    /// Full URL of the transcription endpoint.
    pub fn endpoint(&self) -> String {
        format!("{}{}/asr", self.base_url, self.base_path)
    }
}

/// `"whisper/"` -> `"/whisper"`, `"/"` -> `""`.
pub fn normalize_base_path(path: &str) -> String {
    let trimmed = path.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => serializer.serialize_some(&d.as_secs()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_secs))
    }
}
