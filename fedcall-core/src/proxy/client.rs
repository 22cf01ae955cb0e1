//! # Proxy Client
//!
//! Wraps the generated `DataTransferService` client to issue the proxy's `unaryCall`
//! RPC. The client is generic over the underlying service so it can run over a real
//! [`Channel`] or directly over an in-process server.
//!
//! ## Channel lifecycle
//!
//! [`ProxyInvoker`] asks its [`ProxyConnector`] for a fresh service on every call and
//! drops it when the call returns, whether the call succeeded or not.
use super::{
    ProxyCallError, RemoteInvoker,
    generated::networking_proxy::data_transfer_service_client::DataTransferServiceClient,
    packet::Packet,
};
use crate::{BoxError, config::DispatcherConfig};
use async_trait::async_trait;
use http_body::Body as HttpBody;
use std::time::Duration;
use tonic::{
    client::GrpcService,
    transport::{Channel, Endpoint},
};
use tracing::debug;

/// A unary client for the proxy's `DataTransferService`.
#[derive(Clone)]
pub struct ProxyClient<S = Channel> {
    client: DataTransferServiceClient<S>,
}

impl<S> ProxyClient<S>
where
    S: GrpcService<tonic::body::Body>,
    S::Error: Into<BoxError>,
    S::ResponseBody: HttpBody<Data = tonic::codegen::Bytes> + Send + 'static,
    <S::ResponseBody as HttpBody>::Error: Into<BoxError> + Send,
{
    pub fn new(service: S) -> Self {
        let client = DataTransferServiceClient::new(service);
        Self { client }
    }

    /// Sends `packet` and waits for the reply packet.
    ///
    /// `timeout` is propagated to the server as the gRPC deadline and also bounds the
    /// wait on this side, so a proxy that never answers ends in
    /// [`ProxyCallError::DeadlineExceeded`].
    pub async fn unary(
        &mut self,
        packet: Packet,
        timeout: Duration,
    ) -> Result<Packet, ProxyCallError> {
        let mut request = tonic::Request::new(packet);
        request.set_timeout(timeout);

        match tokio::time::timeout(timeout, self.client.unary_call(request)).await {
            Ok(reply) => reply
                .map(tonic::Response::into_inner)
                .map_err(ProxyCallError::Status),
            Err(_elapsed) => Err(ProxyCallError::DeadlineExceeded(timeout)),
        }
    }
}

#[async_trait]
impl<S> RemoteInvoker for ProxyClient<S>
where
    S: GrpcService<tonic::body::Body> + Clone + Send + Sync + 'static,
    S::Future: Send,
    S::Error: Into<BoxError> + Send,
    S::ResponseBody: HttpBody<Data = tonic::codegen::Bytes> + Send + 'static,
    <S::ResponseBody as HttpBody>::Error: Into<BoxError> + Send,
{
    async fn unary_call(
        &self,
        packet: Packet,
        timeout: Duration,
    ) -> Result<Packet, ProxyCallError> {
        let mut client = self.clone();
        client.unary(packet, timeout).await
    }
}

/// Opens the service a single proxy call runs over.
pub trait ProxyConnector: Send + Sync {
    type Service;

    fn connect(&self) -> Result<Self::Service, ProxyCallError>;
}

/// The proxy at a fixed URL.
#[derive(Debug, Clone)]
pub struct ProxyEndpoint {
    url: String,
}

impl ProxyEndpoint {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl ProxyConnector for ProxyEndpoint {
    type Service = Channel;

    /// The connection is established on first use, so an unreachable proxy surfaces as
    /// a failed RPC rather than here. Only an unusable URL fails at this point.
    fn connect(&self) -> Result<Channel, ProxyCallError> {
        let endpoint =
            Endpoint::from_shared(self.url.clone()).map_err(|source| {
                ProxyCallError::InvalidUrl {
                    url: self.url.clone(),
                    source,
                }
            })?;

        Ok(endpoint.connect_lazy())
    }
}

/// Reaches the proxy with one channel per call.
#[derive(Debug, Clone)]
pub struct ProxyInvoker<C = ProxyEndpoint> {
    connector: C,
}

impl ProxyInvoker {
    pub fn new(proxy_url: impl Into<String>) -> Self {
        Self::with_connector(ProxyEndpoint::new(proxy_url))
    }

    pub fn from_config(config: &DispatcherConfig) -> Self {
        Self::new(config.proxy_url.clone())
    }
}

impl<C, S> ProxyInvoker<C>
where
    C: ProxyConnector<Service = S>,
    S: GrpcService<tonic::body::Body>,
    S::Error: Into<BoxError>,
    S::ResponseBody: HttpBody<Data = tonic::codegen::Bytes> + Send + 'static,
    <S::ResponseBody as HttpBody>::Error: Into<BoxError> + Send,
{
    pub fn with_connector(connector: C) -> Self {
        Self { connector }
    }

    /// Opens a new channel to the proxy.
    pub fn acquire_channel(&self) -> Result<ProxyClient<S>, ProxyCallError> {
        Ok(ProxyClient::new(self.connector.connect()?))
    }
}

#[async_trait]
impl<C, S> RemoteInvoker for ProxyInvoker<C>
where
    C: ProxyConnector<Service = S>,
    S: GrpcService<tonic::body::Body> + Send + 'static,
    S::Future: Send,
    S::Error: Into<BoxError> + Send,
    S::ResponseBody: HttpBody<Data = tonic::codegen::Bytes> + Send + 'static,
    <S::ResponseBody as HttpBody>::Error: Into<BoxError> + Send,
{
    async fn unary_call(
        &self,
        packet: Packet,
        timeout: Duration,
    ) -> Result<Packet, ProxyCallError> {
        let mut client = self.acquire_channel()?;
        debug!("acquired proxy channel");

        let reply = client.unary(packet, timeout).await;

        drop(client);
        debug!(ok = reply.is_ok(), "released proxy channel");

        reply
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn invalid_proxy_url_is_not_a_transport_failure() {
        let invoker = ProxyInvoker::new("not a url");

        let err = invoker
            .unary_call(Packet::default(), Duration::from_secs(1))
            .await
            .unwrap_err();

        assert!(matches!(err, ProxyCallError::InvalidUrl { .. }));
        assert!(!err.is_transport());
    }

    #[tokio::test]
    async fn unreachable_proxy_is_a_transport_failure() {
        // Port 1 is reserved and never has a listener in test environments.
        let invoker = ProxyInvoker::new("http://127.0.0.1:1");

        let err = invoker
            .unary_call(Packet::default(), Duration::from_secs(5))
            .await
            .unwrap_err();

        assert!(err.is_transport(), "unexpected error: {err}");
    }

    #[tokio::test]
    async fn silent_proxy_ends_in_deadline_exceeded() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut open = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                open.push(socket);
            }
        });

        let invoker = ProxyInvoker::new(format!("http://{addr}"));
        let err = invoker
            .unary_call(Packet::default(), Duration::from_millis(200))
            .await
            .unwrap_err();

        assert!(
            matches!(err, ProxyCallError::DeadlineExceeded(t) if t == Duration::from_millis(200))
        );
        assert!(err.is_transport());
        assert!(err.to_string().contains("deadline"));
    }
}
