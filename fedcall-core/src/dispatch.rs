//! # Dispatcher
//!
//! Routes a [`CallRequest`] according to its [`WorkMode`]:
//!
//! * **Standalone**: the call goes to the local HTTP server through a [`LocalInvoker`]
//!   and the response body is parsed as the result.
//! * **Cluster**: the call is wrapped into a transport packet, sent to the federated
//!   proxy through a [`RemoteInvoker`], and the reply body is parsed as the result.
//!
//! [`Dispatcher::dispatch`] never fails. Every error is converted into a [`CallResult`]
//! carrying one of the retcodes of [`RetCode`](crate::types::RetCode);
//! [`Dispatcher::try_dispatch`] exposes the typed [`DispatchError`] instead.
mod error;

pub use error::DispatchError;

use crate::{
    config::DispatcherConfig,
    local::{LocalCallError, LocalInvoker, client::LocalApiClient},
    proxy::{RemoteInvoker, client::ProxyInvoker, packet::wrap_packet},
    types::{CallRequest, CallResult, WorkMode},
};
use std::{sync::Arc, time::Duration};
use tracing::{error, info, warn};

/// Holds only read-only state, so a single instance can serve concurrent calls.
pub struct Dispatcher<L = LocalApiClient, R = ProxyInvoker> {
    config: Arc<DispatcherConfig>,
    local: L,
    remote: R,
}

impl Dispatcher {
    /// Builds a dispatcher talking to the configured local server and proxy.
    pub fn from_config(config: DispatcherConfig) -> Result<Self, LocalCallError> {
        let local = LocalApiClient::from_config(&config)?;
        let remote = ProxyInvoker::from_config(&config);
        Ok(Self::new(config, local, remote))
    }
}

impl<L, R> Dispatcher<L, R>
where
    L: LocalInvoker,
    R: RemoteInvoker,
{
    pub fn new(config: DispatcherConfig, local: L, remote: R) -> Self {
        Self {
            config: Arc::new(config),
            local,
            remote,
        }
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// Dispatches `request` and always returns a result; failures carry a nonzero retcode.
    pub async fn dispatch(&self, request: &CallRequest) -> CallResult {
        match self.try_dispatch(request).await {
            Ok(result) => result,
            Err(err) => {
                if let DispatchError::UnsupportedMode(mode) = &err {
                    warn!(job_id = %request.job_id, mode = %mode, "unsupported work mode");
                } else {
                    error!(
                        job_id = %request.job_id,
                        path = %request.path,
                        retcode = err.retcode().code(),
                        error = %err,
                        "federated api request failed"
                    );
                }
                CallResult::from(err)
            }
        }
    }

    pub async fn try_dispatch(&self, request: &CallRequest) -> Result<CallResult, DispatchError> {
        let timeout = request.timeout.unwrap_or(self.config.default_timeout);

        match &request.mode {
            WorkMode::Standalone => self.dispatch_local(request, timeout).await,
            WorkMode::Cluster => self.dispatch_remote(request, timeout).await,
            WorkMode::Unsupported(mode) => Err(DispatchError::UnsupportedMode(mode.clone())),
        }
    }

    async fn dispatch_local(
        &self,
        request: &CallRequest,
        timeout: Duration,
    ) -> Result<CallResult, DispatchError> {
        info!(path = %request.path, body = %request.body, "local api request");

        let response = self
            .local
            .invoke(request.method, &request.path, &request.body, timeout)
            .await?;

        let result =
            CallResult::from_slice(&response.body).map_err(DispatchError::LocalResponse)?;

        info!(
            path = %request.path,
            status = %response.status,
            retcode = result.retcode,
            "local api response"
        );

        Ok(result)
    }

    async fn dispatch_remote(
        &self,
        request: &CallRequest,
        timeout: Duration,
    ) -> Result<CallResult, DispatchError> {
        let packet = wrap_packet(request, timeout, &self.config)?;

        info!(
            job_id = %request.job_id,
            path = %request.path,
            src = %request.source_party_id,
            dst = %request.dest_party_id,
            "grpc api request"
        );

        let reply = self.remote.unary_call(packet, timeout).await?;

        info!(job_id = %request.job_id, path = %request.path, "grpc api response");

        let body = reply.body.ok_or(DispatchError::EmptyReply)?;
        CallResult::from_slice(&body.value).map_err(DispatchError::RemoteResponse)
    }
}
