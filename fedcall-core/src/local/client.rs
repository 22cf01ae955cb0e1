//! # Local API Client
//!
//! A thin `reqwest` wrapper: absolute URL from the configured base URL plus the request
//! path, fixed default headers, JSON body.
use super::{LocalCallError, LocalInvoker, LocalResponse};
use crate::{config::DispatcherConfig, types::HttpMethod};
use async_trait::async_trait;
use reqwest::{
    Client,
    header::{HeaderMap, HeaderName, HeaderValue},
};
use std::{str::FromStr, time::Duration};

#[derive(Debug, Clone)]
pub struct LocalApiClient {
    client: Client,
    base_url: String,
}

impl LocalApiClient {
    /// Creates a client whose every request carries `headers`.
    pub fn new(
        base_url: impl Into<String>,
        headers: &[(String, String)],
    ) -> Result<Self, LocalCallError> {
        let client = Client::builder()
            .default_headers(header_map(headers)?)
            .build()
            .map_err(LocalCallError::ClientBuild)?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn from_config(config: &DispatcherConfig) -> Result<Self, LocalCallError> {
        Self::new(config.server_url.clone(), &config.headers)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl LocalInvoker for LocalApiClient {
    async fn invoke(
        &self,
        method: HttpMethod,
        path: &str,
        body: &serde_json::Value,
        timeout: Duration,
    ) -> Result<LocalResponse, LocalCallError> {
        let url = self.url(path);

        let builder = match method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
            HttpMethod::Put => self.client.put(&url),
            HttpMethod::Delete => self.client.delete(&url),
            HttpMethod::Patch => self.client.patch(&url),
            HttpMethod::Head => self.client.head(&url),
            HttpMethod::Options => self.client.request(reqwest::Method::OPTIONS, &url),
        };

        let response = match builder.json(body).timeout(timeout).send().await {
            Ok(response) => response,
            Err(source) => return Err(LocalCallError::Request { url, source }),
        };

        let status = response.status();
        let body = match response.bytes().await {
            Ok(bytes) => bytes.to_vec(),
            Err(source) => return Err(LocalCallError::Body { url, source }),
        };

        Ok(LocalResponse { status, body })
    }
}

fn header_map(headers: &[(String, String)]) -> Result<HeaderMap, LocalCallError> {
    let mut map = HeaderMap::new();
    for (k, v) in headers {
        let key = HeaderName::from_str(k).map_err(|e| LocalCallError::InvalidHeader {
            key: k.clone(),
            reason: e.to_string(),
        })?;
        let val = HeaderValue::from_str(v).map_err(|e| LocalCallError::InvalidHeader {
            key: k.clone(),
            reason: e.to_string(),
        })?;
        map.insert(key, val);
    }
    Ok(map)
}
