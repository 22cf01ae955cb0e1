//! # CLI
//!
//! This module defines the command-line interface of `fedcall` using `clap`.
//!
//! It is responsible for parsing user input and validating it (e.g. that the body is valid JSON
//! and the method is a known HTTP verb) before anything is dispatched.
use clap::Parser;
use fedcall_core::{CallRequest, DispatcherConfig, HttpMethod, WorkMode};
use std::time::Duration;

/// Issue one federated API call
///
/// ## Examples:
///
/// ```bash
/// fedcall POST /v1/job/submit --job-id 202601011200000001 --src 9999 --dst 10000 --body '{"a": 1}'
/// fedcall POST /v1/job/202601011200000001/stop --job-id 202601011200000001 --src 9999 --dst 10000 --mode cluster
/// ```
#[derive(Parser, Debug)]
#[command(name = "fedcall", version, about = "Federated API call dispatcher")]
pub struct Cli {
    /// HTTP method (GET, POST, PUT, DELETE, PATCH, HEAD, OPTIONS)
    #[arg(value_parser = parse_method)]
    pub method: HttpMethod,

    /// Path on the destination server (e.g. /v1/job/submit)
    pub path: String,

    #[arg(long)]
    pub job_id: String,

    /// Party issuing the call
    #[arg(long = "src")]
    pub source_party_id: String,

    /// Party receiving the call
    #[arg(long = "dst")]
    pub dest_party_id: String,

    /// JSON body
    #[arg(long, value_parser = parse_body, default_value = "{}")]
    pub body: serde_json::Value,

    /// Work mode: standalone, cluster, or its numeric value (0, 1)
    #[arg(long, env = "FEDCALL_WORK_MODE", value_parser = parse_mode, default_value = "standalone")]
    pub mode: WorkMode,

    /// Overall timeout in milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Print the result wrapped in the `{retcode, retmsg, data, jobId, meta}` envelope
    #[arg(long)]
    pub envelope: bool,

    /// Local HTTP server base URL (overrides FEDCALL_SERVER_URL)
    #[arg(long)]
    pub server_url: Option<String>,

    /// Federated proxy URL (overrides FEDCALL_PROXY_URL)
    #[arg(long)]
    pub proxy_url: Option<String>,
}

impl Cli {
    /// Applies the URL overrides given on the command line.
    pub fn apply(&self, mut config: DispatcherConfig) -> DispatcherConfig {
        if let Some(url) = &self.server_url {
            config = config.with_server_url(url.clone());
        }
        if let Some(url) = &self.proxy_url {
            config = config.with_proxy_url(url.clone());
        }
        config
    }

    pub fn to_request(&self) -> CallRequest {
        let request = CallRequest::new(
            self.job_id.clone(),
            self.method,
            self.path.clone(),
            self.source_party_id.clone(),
            self.dest_party_id.clone(),
            self.body.clone(),
            self.mode.clone(),
        );

        match self.timeout_ms {
            Some(ms) => request.with_timeout(Duration::from_millis(ms)),
            None => request,
        }
    }
}

fn parse_method(value: &str) -> Result<HttpMethod, String> {
    value.parse().map_err(|e| format!("{e}"))
}

fn parse_mode(value: &str) -> Result<WorkMode, String> {
    match value.parse::<WorkMode>() {
        Ok(mode) => Ok(mode),
        Err(never) => match never {},
    }
}

fn parse_body(value: &str) -> Result<serde_json::Value, String> {
    serde_json::from_str(value).map_err(|e| format!("Invalid JSON: {e}"))
}
