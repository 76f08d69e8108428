use crate::config::AsrConfig;
use crate::{Error, ErrorContext, Result};
use reqwest::Proxy;

/// Build the underlying `reqwest::Client` for a resolved configuration.
///
/// Only the timeout and proxy are set here. Connection pooling, keep-alive and
/// TLS stay at reqwest's defaults.
pub fn build_http_client(config: &AsrConfig) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder();

    if let Some(timeout) = config.timeout {
        builder = builder.timeout(timeout);
    }

    if let Some(proxy_url) = &config.proxy_url {
        let proxy = Proxy::all(proxy_url).map_err(|e| {
            Error::configuration_with_context(
                format!("invalid proxy: {}", e),
                ErrorContext::new()
                    .with_field_path("proxy_url")
                    .with_source("transport"),
            )
        })?;
        builder = builder.proxy(proxy);
    }

    builder.build().map_err(client_build_error)
}

// Nothing has been sent yet, so a builder failure (TLS backend, resolver) is a setup problem.
fn client_build_error(e: reqwest::Error) -> Error {
    Error::configuration_with_context(
        format!("Failed to create HTTP client: {}", e),
        ErrorContext::new().with_source("transport"),
    )
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn builds_with_timeout_and_proxy() {
        let config = AsrConfig {
            timeout: Some(Duration::from_millis(1500)),
            proxy_url: Some("http://127.0.0.1:3128".into()),
            ..Default::default()
        };
        assert!(build_http_client(&config).is_ok());
    }

    #[test]
    fn builds_with_defaults() {
        assert!(build_http_client(&AsrConfig::default()).is_ok());
    }

    #[test]
    fn build_failure_is_a_configuration_error() {
        let reqwest_err = reqwest::Client::new().get("not a url").build().unwrap_err();
        let err = client_build_error(reqwest_err);
        assert!(matches!(err, Error::Configuration { .. }), "got {:?}", err);
        assert!(err.to_string().contains("Failed to create HTTP client"));
        assert_eq!(err.status(), None);
    }
}
