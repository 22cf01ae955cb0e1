use proxy_service::DataTransferService;
use proxy_service::pb::{Data, Packet};
use tonic::{Request, Response, Status};

/// Answers every packet with a result describing what it received.
///
/// A few paths trigger failure modes instead:
/// * `/deadline`: the RPC fails with `DEADLINE_EXCEEDED`.
/// * `/garbage`: the reply body is not JSON.
/// * `/empty`: the reply carries no body.
pub struct ProxyServiceImpl;

#[tonic::async_trait]
impl DataTransferService for ProxyServiceImpl {
    async fn unary_call(&self, req: Request<Packet>) -> Result<Response<Packet>, Status> {
        let packet = req.into_inner();
        let header = packet
            .header
            .ok_or_else(|| Status::invalid_argument("missing header"))?;
        let body = packet
            .body
            .ok_or_else(|| Status::invalid_argument("missing body"))?;

        let reply_value = match body.key.as_str() {
            "/deadline" => return Err(Status::deadline_exceeded("deadline exceeded")),
            "/empty" => return Ok(Response::new(Packet::default())),
            "/garbage" => b"definitely { not json".to_vec(),
            path => {
                let payload: serde_json::Value = serde_json::from_slice(&body.value)
                    .map_err(|e| Status::invalid_argument(e.to_string()))?;
                let src = header.src.unwrap_or_default();
                let dst = header.dst.unwrap_or_default();

                serde_json::json!({
                    "retcode": 0,
                    "retmsg": "success",
                    "data": {
                        "path": path,
                        "operator": header.operator,
                        "job_id": header.task.unwrap_or_default().task_id,
                        "src": src.party_id,
                        "dst": dst.party_id,
                        "role": src.role,
                        "callback_port": src.callback.unwrap_or_default().port,
                        "overall_timeout": header.conf.unwrap_or_default().overall_timeout,
                        "payload": payload,
                    }
                })
                .to_string()
                .into_bytes()
            }
        };

        Ok(Response::new(Packet {
            header: None,
            body: Some(Data {
                key: body.key,
                value: reply_value,
            }),
        }))
    }
}
