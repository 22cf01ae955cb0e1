//! # Transport Packet
//!
//! The proxy's wire messages (package `com.webank.ai.eggroll.api.networking.proxy`),
//! re-exported from the code generated out of `proto/proxy.proto`, and the function
//! that wraps a [`CallRequest`] into a [`Packet`].
//!
//! In [`Conf`], `overall_timeout` is in milliseconds. In [`Data`], `key` is the request
//! path and `value` the UTF-8 JSON body.
pub use super::generated::networking_proxy::{
    Command, Conf, Data, Endpoint, Metadata, Model, Packet, Task, Topic,
};

use crate::{config::DispatcherConfig, types::CallRequest};
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum PacketError {
    #[error("Failed to serialize the request body: '{0}'")]
    Body(#[source] serde_json::Error),
    #[error("Timeout of {0:?} does not fit in the packet")]
    Timeout(Duration),
}

/// Wraps a logical call into the packet the proxy routes between parties.
///
/// Both topics are named after the job. The source topic carries this party's
/// callback endpoint so the destination can answer asynchronous follow-ups.
pub fn wrap_packet(
    request: &CallRequest,
    timeout: Duration,
    config: &DispatcherConfig,
) -> Result<Packet, PacketError> {
    let overall_timeout =
        i64::try_from(timeout.as_millis()).map_err(|_| PacketError::Timeout(timeout))?;
    let value = serde_json::to_vec(&request.body).map_err(PacketError::Body)?;

    let src = Topic {
        name: request.job_id.clone(),
        party_id: request.source_party_id.to_string(),
        role: config.service_name.clone(),
        callback: Some(Endpoint {
            ip: config.callback.ip.clone(),
            port: i32::from(config.callback.port),
            hostname: String::new(),
        }),
    };

    let dst = Topic {
        name: request.job_id.clone(),
        party_id: request.dest_party_id.to_string(),
        role: config.service_name.clone(),
        callback: None,
    };

    let header = Metadata {
        task: Some(Task {
            task_id: request.job_id.clone(),
            model: None,
        }),
        src: Some(src),
        dst: Some(dst),
        command: Some(Command {
            name: config.service_name.clone(),
        }),
        operator: request.method.as_str().to_string(),
        conf: Some(Conf {
            overall_timeout,
            ..Default::default()
        }),
        ..Default::default()
    };

    Ok(Packet {
        header: Some(header),
        body: Some(Data {
            key: request.path.clone(),
            value,
        }),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{HttpMethod, WorkMode};
    use serde_json::json;

    fn request() -> CallRequest {
        CallRequest::new(
            "202601011200000001",
            HttpMethod::Post,
            "/v1/party/202601011200000001/guest/9999/create",
            9999u64,
            10000u64,
            json!({"role": "guest"}),
            WorkMode::Cluster,
        )
    }

    #[test]
    fn routes_by_job_and_party() {
        let config = DispatcherConfig::default().with_callback("192.168.0.4", 9360);

        let packet = wrap_packet(&request(), Duration::from_secs(30), &config).unwrap();
        let header = packet.header.unwrap();

        assert_eq!(header.task.unwrap().task_id, "202601011200000001");
        assert_eq!(header.operator, "POST");
        assert_eq!(header.command.unwrap().name, "fateflow");
        assert_eq!(header.conf.unwrap().overall_timeout, 30_000);

        let src = header.src.unwrap();
        assert_eq!(src.name, "202601011200000001");
        assert_eq!(src.party_id, "9999");
        assert_eq!(src.role, "fateflow");
        let callback = src.callback.unwrap();
        assert_eq!(callback.ip, "192.168.0.4");
        assert_eq!(callback.port, 9360);

        let dst = header.dst.unwrap();
        assert_eq!(dst.party_id, "10000");
        assert!(dst.callback.is_none());
    }

    #[test]
    fn body_carries_path_and_json() {
        let packet =
            wrap_packet(&request(), Duration::from_secs(1), &DispatcherConfig::default()).unwrap();
        let body = packet.body.unwrap();

        assert_eq!(body.key, "/v1/party/202601011200000001/guest/9999/create");
        let decoded: serde_json::Value = serde_json::from_slice(&body.value).unwrap();
        assert_eq!(decoded, json!({"role": "guest"}));
    }

    #[test]
    fn decodes_as_the_proxy_service_packet() {
        use prost::Message;

        let packet =
            wrap_packet(&request(), Duration::from_secs(2), &DispatcherConfig::default()).unwrap();

        let decoded = proxy_service::pb::Packet::decode(packet.encode_to_vec().as_slice()).unwrap();
        let header = decoded.header.unwrap();

        assert_eq!(header.operator, "POST");
        assert_eq!(header.conf.unwrap().overall_timeout, 2_000);
        assert_eq!(header.src.unwrap().callback.unwrap().port, 9360);
        assert_eq!(
            decoded.body.unwrap().key,
            "/v1/party/202601011200000001/guest/9999/create"
        );
    }

    #[test]
    fn rejects_timeouts_beyond_i64_millis() {
        let err = wrap_packet(&request(), Duration::MAX, &DispatcherConfig::default()).unwrap_err();

        assert!(matches!(err, PacketError::Timeout(_)));
    }
}
