//! # Local Invocation
//!
//! In standalone mode every party service lives behind the same local HTTP server.
//! This module defines the [`LocalInvoker`] seam the dispatcher calls through, and
//! [`client::LocalApiClient`], its `reqwest` implementation.
pub mod client;

use crate::types::HttpMethod;
use async_trait::async_trait;
use std::time::Duration;

/// Errors raised while talking to the local HTTP server.
#[derive(Debug, thiserror::Error)]
pub enum LocalCallError {
    #[error("Invalid default header '{key}': {reason}")]
    InvalidHeader { key: String, reason: String },
    #[error("Failed to build the HTTP client: '{0}'")]
    ClientBuild(#[source] reqwest::Error),
    #[error("Request to '{url}' failed: '{source}'")]
    Request {
        url: String,
        source: reqwest::Error,
    },
    #[error("Failed to read the response body from '{url}': '{source}'")]
    Body {
        url: String,
        source: reqwest::Error,
    },
}

/// The raw answer of the local server. The dispatcher decides how to interpret it.
#[derive(Debug, Clone)]
pub struct LocalResponse {
    pub status: http::StatusCode,
    pub body: Vec<u8>,
}

/// Issues an HTTP call against the local server.
///
/// Implementations propagate every failure; the dispatcher is the error boundary.
#[async_trait]
pub trait LocalInvoker: Send + Sync {
    async fn invoke(
        &self,
        method: HttpMethod,
        path: &str,
        body: &serde_json::Value,
        timeout: Duration,
    ) -> Result<LocalResponse, LocalCallError>;
}
