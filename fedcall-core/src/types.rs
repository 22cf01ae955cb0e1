//! # Call Types
//!
//! The data structures exchanged with the [`Dispatcher`](crate::dispatch::Dispatcher):
//! the inbound [`CallRequest`] and the normalized [`CallResult`], together with the
//! small enums that describe how a call is routed.
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr, time::Duration};

/// Deployment mode selecting how a call reaches its destination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WorkMode {
    /// Every party service runs in the local process; calls go to the local HTTP server.
    Standalone,
    /// Parties are reached through the federated gRPC proxy.
    Cluster,
    /// Anything else. Kept as raw text so it can be reported back to the caller.
    Unsupported(String),
}

impl From<i64> for WorkMode {
    fn from(value: i64) -> Self {
        match value {
            0 => WorkMode::Standalone,
            1 => WorkMode::Cluster,
            other => WorkMode::Unsupported(other.to_string()),
        }
    }
}

impl FromStr for WorkMode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        if let Ok(value) = trimmed.parse::<i64>() {
            return Ok(WorkMode::from(value));
        }

        Ok(match trimmed.to_ascii_lowercase().as_str() {
            "standalone" => WorkMode::Standalone,
            "cluster" => WorkMode::Cluster,
            _ => WorkMode::Unsupported(trimmed.to_string()),
        })
    }
}

impl fmt::Display for WorkMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkMode::Standalone => write!(f, "standalone"),
            WorkMode::Cluster => write!(f, "cluster"),
            WorkMode::Unsupported(raw) => write!(f, "{raw}"),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("'{0}' is not a known HTTP method")]
pub struct UnknownMethod(pub String);

/// The HTTP verbs a federated call can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

impl HttpMethod {
    /// Upper-case wire name, as placed in the transport packet's `operator` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
        }
    }
}

impl FromStr for HttpMethod {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "DELETE" => Ok(HttpMethod::Delete),
            "PATCH" => Ok(HttpMethod::Patch),
            "HEAD" => Ok(HttpMethod::Head),
            "OPTIONS" => Ok(HttpMethod::Options),
            _ => Err(UnknownMethod(s.to_string())),
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier of a federated participant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartyId(String);

impl PartyId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<u64> for PartyId {
    fn from(value: u64) -> Self {
        PartyId(value.to_string())
    }
}

impl From<&str> for PartyId {
    fn from(value: &str) -> Self {
        PartyId(value.to_string())
    }
}

impl From<String> for PartyId {
    fn from(value: String) -> Self {
        PartyId(value)
    }
}

impl fmt::Display for PartyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A logical API call to be routed by the dispatcher.
#[derive(Debug, Clone)]
pub struct CallRequest {
    pub job_id: String,
    pub method: HttpMethod,
    /// Path relative to the destination server, e.g. `/v1/job/submit`.
    pub path: String,
    pub source_party_id: PartyId,
    pub dest_party_id: PartyId,
    /// The JSON payload. Sent as the HTTP body locally, or serialized into the packet body remotely.
    pub body: serde_json::Value,
    pub mode: WorkMode,
    /// Overall deadline for the call. `None` falls back to the configured default.
    pub timeout: Option<Duration>,
}

impl CallRequest {
    pub fn new(
        job_id: impl Into<String>,
        method: HttpMethod,
        path: impl Into<String>,
        source_party_id: impl Into<PartyId>,
        dest_party_id: impl Into<PartyId>,
        body: serde_json::Value,
        mode: WorkMode,
    ) -> Self {
        Self {
            job_id: job_id.into(),
            method,
            path: path.into(),
            source_party_id: source_party_id.into(),
            dest_party_id: dest_party_id.into(),
            body,
            mode,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// The stable return codes a dispatch can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i64)]
pub enum RetCode {
    Success = 0,
    /// The RPC itself failed in cluster mode.
    RpcError = 101,
    /// Anything else failed in cluster mode.
    RemoteError = 102,
    UnsupportedMode = 103,
    /// Anything failed in standalone mode.
    LocalError = 104,
}

impl RetCode {
    pub fn code(self) -> i64 {
        self as i64
    }
}

/// The normalized outcome of a dispatch.
///
/// On the success path this is the destination's own response and it serializes back
/// to the same JSON object: `retmsg` and `data` are only written when the response had
/// them, and every other member (including a legacy `msg`) is kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallResult {
    pub retcode: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retmsg: Option<String>,
    /// `Some(Value::Null)` when the response carried an explicit `"data": null`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl CallResult {
    pub fn error(code: RetCode, retmsg: impl Into<String>) -> Self {
        Self {
            retcode: code.code(),
            retmsg: Some(retmsg.into()),
            data: None,
            extra: serde_json::Map::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.retcode == RetCode::Success.code()
    }

    /// The human readable message, read from `retmsg` or the legacy `msg` member.
    pub fn message(&self) -> &str {
        self.retmsg
            .as_deref()
            .or_else(|| self.extra.get("msg").and_then(serde_json::Value::as_str))
            .unwrap_or_default()
    }

    /// Parses a JSON response body, telling malformed JSON apart from a well-formed
    /// document with the wrong shape.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ResponseParseError> {
        serde_json::from_slice(bytes).map_err(|e| match e.classify() {
            serde_json::error::Category::Data => ResponseParseError::Schema(e),
            _ => ResponseParseError::Malformed(e),
        })
    }
}

impl TryFrom<serde_json::Map<String, serde_json::Value>> for CallResult {
    type Error = serde_json::Error;

    fn try_from(
        mut object: serde_json::Map<String, serde_json::Value>,
    ) -> Result<Self, Self::Error> {
        let retcode = match object.remove("retcode") {
            Some(value) => serde_json::from_value(value)?,
            None => return Err(serde::de::Error::missing_field("retcode")),
        };

        // A null message stays in `extra` so it is written back as it came.
        let retmsg = match object.remove("retmsg") {
            Some(serde_json::Value::Null) => {
                object.insert("retmsg".to_string(), serde_json::Value::Null);
                None
            }
            Some(value) => Some(serde_json::from_value(value)?),
            None => None,
        };

        let data = object.remove("data");

        Ok(Self {
            retcode,
            retmsg,
            data,
            extra: object,
        })
    }
}

impl<'de> Deserialize<'de> for CallResult {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let object = serde_json::Map::deserialize(deserializer)?;
        CallResult::try_from(object).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ResponseParseError {
    #[error("response is not valid JSON: {0}")]
    Malformed(#[source] serde_json::Error),
    #[error("response does not match the expected result shape: {0}")]
    Schema(#[source] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn work_mode_parses_numbers_and_names() {
        assert_eq!("0".parse::<WorkMode>().unwrap(), WorkMode::Standalone);
        assert_eq!("1".parse::<WorkMode>().unwrap(), WorkMode::Cluster);
        assert_eq!("Cluster".parse::<WorkMode>().unwrap(), WorkMode::Cluster);
        assert_eq!(
            "hybrid".parse::<WorkMode>().unwrap(),
            WorkMode::Unsupported("hybrid".to_string())
        );
        assert_eq!(WorkMode::from(7), WorkMode::Unsupported("7".to_string()));
    }

    #[test]
    fn http_method_is_case_insensitive() {
        assert_eq!("post".parse::<HttpMethod>(), Ok(HttpMethod::Post));
        assert_eq!("Delete".parse::<HttpMethod>(), Ok(HttpMethod::Delete));
        assert_eq!(
            "FETCH".parse::<HttpMethod>(),
            Err(UnknownMethod("FETCH".to_string()))
        );
    }

    #[test]
    fn call_result_keeps_unknown_members() {
        let raw = json!({
            "retcode": 0,
            "retmsg": "success",
            "data": {"x": 1},
            "jobId": "job-1",
            "meta": null
        });

        let result = CallResult::from_slice(raw.to_string().as_bytes()).unwrap();

        assert!(result.is_success());
        assert_eq!(result.data, Some(json!({"x": 1})));
        assert_eq!(serde_json::to_value(&result).unwrap(), raw);
    }

    #[test]
    fn call_result_writes_back_only_the_members_it_was_given() {
        let responses = [
            json!({"retcode": 0, "msg": "ok"}),
            json!({"retcode": 0}),
            json!({"retcode": 0, "retmsg": "success", "data": null}),
            json!({"retcode": 100, "retmsg": null, "data": []}),
        ];

        for raw in responses {
            let result = CallResult::from_slice(raw.to_string().as_bytes()).unwrap();

            assert_eq!(serde_json::to_value(&result).unwrap(), raw);
        }
    }

    #[test]
    fn call_result_accepts_legacy_msg_key() {
        let result = CallResult::from_slice(br#"{"retcode": 101, "msg": "boom"}"#).unwrap();

        assert_eq!(result.retcode, 101);
        assert_eq!(result.retmsg, None);
        assert_eq!(result.message(), "boom");
    }

    #[test]
    fn explicit_null_data_is_kept_apart_from_missing_data() {
        let missing = CallResult::from_slice(br#"{"retcode": 0}"#).unwrap();
        let null = CallResult::from_slice(br#"{"retcode": 0, "data": null}"#).unwrap();

        assert_eq!(missing.data, None);
        assert_eq!(null.data, Some(serde_json::Value::Null));
        assert_eq!(missing.message(), "");
    }

    #[test]
    fn parse_errors_are_classified() {
        assert!(matches!(
            CallResult::from_slice(b"<html>"),
            Err(ResponseParseError::Malformed(_))
        ));
        assert!(matches!(
            CallResult::from_slice(br#"{"retmsg": "no code"}"#),
            Err(ResponseParseError::Schema(_))
        ));
        assert!(matches!(
            CallResult::from_slice(br#"{"retcode": "zero"}"#),
            Err(ResponseParseError::Schema(_))
        ));
        assert!(matches!(
            CallResult::from_slice(br#"[1, 2]"#),
            Err(ResponseParseError::Schema(_))
        ));
    }
}
