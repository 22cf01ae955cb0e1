//! # Response Envelope
//!
//! The JSON shape the HTTP-facing layer answers with:
//! `{"retcode", "retmsg", "data", "jobId", "meta"}`.
use crate::types::CallResult;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultEnvelope {
    pub retcode: i64,
    pub retmsg: String,
    pub data: Option<serde_json::Value>,
    #[serde(rename = "jobId")]
    pub job_id: Option<String>,
    pub meta: Option<serde_json::Value>,
}

impl Default for ResultEnvelope {
    fn default() -> Self {
        Self {
            retcode: 0,
            retmsg: "success".to_string(),
            data: None,
            job_id: None,
            meta: None,
        }
    }
}

impl ResultEnvelope {
    pub fn new(retcode: i64, retmsg: impl Into<String>) -> Self {
        Self {
            retcode,
            retmsg: retmsg.into(),
            ..Default::default()
        }
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_job_id(mut self, job_id: impl Into<String>) -> Self {
        self.job_id = Some(job_id.into());
        self
    }

    pub fn with_meta(mut self, meta: serde_json::Value) -> Self {
        self.meta = Some(meta);
        self
    }

    /// Wraps a dispatch result. A non-null `meta` member of the result is carried over.
    pub fn from_result(result: CallResult, job_id: Option<String>) -> Self {
        let meta = result
            .extra
            .get("meta")
            .filter(|meta| !meta.is_null())
            .cloned();

        let retmsg = result.message().to_string();

        Self {
            retcode: result.retcode,
            retmsg,
            data: result.data,
            job_id,
            meta,
        }
    }
}
