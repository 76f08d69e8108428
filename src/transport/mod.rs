//! HTTP transport shared by every request the client issues.

mod http;

pub use http::{build_http_client, TransportError};
