//! # Federated Proxy Transport
//!
//! In cluster mode calls leave the party through the federated proxy's
//! `DataTransferService`. The logical call is wrapped into a [`packet::Packet`] and
//! sent as a single unary RPC; the reply is a packet whose body carries the
//! destination's JSON response.
//!
//! * [`packet`]: the wire messages and [`packet::wrap_packet`].
//! * [`client`]: [`client::ProxyClient`], a unary client over any tonic service, and
//!   [`client::ProxyInvoker`], which opens a fresh channel to the proxy for every call.
//!
//! The wire messages and the service client are generated from `proto/proxy.proto` by
//! the `generate-proxy-service` binary (`--features gen-proto`).
pub mod client;
mod generated;
pub mod packet;

use async_trait::async_trait;
use packet::Packet;
use std::time::Duration;

/// Errors raised while exchanging a packet with the proxy.
#[derive(Debug, thiserror::Error)]
pub enum ProxyCallError {
    #[error("Invalid proxy URL '{url}': '{source}'")]
    InvalidUrl {
        url: String,
        source: tonic::transport::Error,
    },
    #[error("rpc failed with status {:?}: {}", .0.code(), .0.message())]
    Status(#[source] tonic::Status),
    #[error("deadline exceeded after {0:?} waiting for the proxy")]
    DeadlineExceeded(Duration),
}

impl ProxyCallError {
    /// Whether the RPC itself failed, as opposed to the call never being set up.
    pub fn is_transport(&self) -> bool {
        match self {
            ProxyCallError::Status(_) | ProxyCallError::DeadlineExceeded(_) => true,
            ProxyCallError::InvalidUrl { .. } => false,
        }
    }
}

/// Sends a packet to a remote party and waits for its reply.
#[async_trait]
pub trait RemoteInvoker: Send + Sync {
    async fn unary_call(
        &self,
        packet: Packet,
        timeout: Duration,
    ) -> Result<Packet, ProxyCallError>;
}
