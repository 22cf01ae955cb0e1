//! # Dispatcher Configuration
//!
//! Process-wide settings shared by every call: where the local HTTP server lives,
//! which headers it expects, how to reach the federated proxy and how this party
//! identifies itself in outgoing packets.
//!
//! The configuration is read once and never mutated afterwards.
use std::{str::FromStr, time::Duration};

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:9380";
pub const DEFAULT_PROXY_URL: &str = "http://127.0.0.1:9370";
pub const DEFAULT_CALLBACK_IP: &str = "127.0.0.1";
pub const DEFAULT_CALLBACK_PORT: u16 = 9360;
pub const DEFAULT_SERVICE_NAME: &str = "fateflow";
/// One hour, in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 60 * 1000 * 60;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value '{value}' for '{key}': {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Address other parties use to call this one back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackEndpoint {
    pub ip: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Base URL of the local HTTP server. Request paths are appended to it verbatim.
    pub server_url: String,
    /// Headers attached to every local request.
    pub headers: Vec<(String, String)>,
    /// gRPC endpoint of the federated proxy.
    pub proxy_url: String,
    pub callback: CallbackEndpoint,
    /// Role and command name written into outgoing packets.
    pub service_name: String,
    /// Used when a request does not carry its own timeout.
    pub default_timeout: Duration,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            headers: vec![
                ("Content-Type".to_string(), "application/json".to_string()),
                ("Connection".to_string(), "close".to_string()),
            ],
            proxy_url: DEFAULT_PROXY_URL.to_string(),
            callback: CallbackEndpoint {
                ip: DEFAULT_CALLBACK_IP.to_string(),
                port: DEFAULT_CALLBACK_PORT,
            },
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            default_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}

impl DispatcherConfig {
    /// Builds a configuration from environment variables, falling back to defaults.
    ///
    /// - `FEDCALL_SERVER_URL`: local HTTP server base URL
    /// - `FEDCALL_PROXY_URL`: federated proxy gRPC URL
    /// - `FEDCALL_CALLBACK_IP` / `FEDCALL_CALLBACK_PORT`: this party's callback endpoint
    /// - `FEDCALL_SERVICE_NAME`: role written into packets
    /// - `FEDCALL_TIMEOUT_MS`: default overall timeout in milliseconds
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`DispatcherConfig::from_env`], reading values through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("FEDCALL_SERVER_URL") {
            config.server_url = url;
        }
        if let Some(url) = lookup("FEDCALL_PROXY_URL") {
            config.proxy_url = url;
        }
        if let Some(ip) = lookup("FEDCALL_CALLBACK_IP") {
            config.callback.ip = ip;
        }
        if let Some(port) = lookup("FEDCALL_CALLBACK_PORT") {
            config.callback.port = parse_value("FEDCALL_CALLBACK_PORT", &port)?;
        }
        if let Some(name) = lookup("FEDCALL_SERVICE_NAME") {
            config.service_name = name;
        }
        if let Some(ms) = lookup("FEDCALL_TIMEOUT_MS") {
            config.default_timeout =
                Duration::from_millis(parse_value("FEDCALL_TIMEOUT_MS", &ms)?);
        }

        Ok(config)
    }

    pub fn with_server_url(mut self, server_url: impl Into<String>) -> Self {
        self.server_url = server_url.into();
        self
    }

    pub fn with_proxy_url(mut self, proxy_url: impl Into<String>) -> Self {
        self.proxy_url = proxy_url.into();
        self
    }

    pub fn with_callback(mut self, ip: impl Into<String>, port: u16) -> Self {
        self.callback = CallbackEndpoint {
            ip: ip.into(),
            port,
        };
        self
    }

    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }
}

fn parse_value<T>(key: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::InvalidValue {
            key,
            value: value.to_string(),
            reason: e.to_string(),
        })
}
