use crate::{
    local::LocalCallError,
    proxy::{ProxyCallError, packet::PacketError},
    types::{CallResult, ResponseParseError, RetCode},
};

/// Every way a dispatch can fail.
///
/// Each variant maps to exactly one [`RetCode`] through [`DispatchError::retcode`].
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("local api request error: {0}")]
    LocalCall(#[from] LocalCallError),
    #[error("local api request error: {0}")]
    LocalResponse(#[source] ResponseParseError),
    #[error("rpc request error: {0}")]
    Packet(#[from] PacketError),
    #[error("rpc request error: {0}")]
    Proxy(#[from] ProxyCallError),
    #[error("rpc request error: the reply packet carries no body")]
    EmptyReply,
    #[error("rpc request error: {0}")]
    RemoteResponse(#[source] ResponseParseError),
    #[error("{0} work mode is not supported")]
    UnsupportedMode(String),
}

impl DispatchError {
    pub fn retcode(&self) -> RetCode {
        match self {
            DispatchError::LocalCall(_) | DispatchError::LocalResponse(_) => RetCode::LocalError,
            DispatchError::Proxy(err) if err.is_transport() => RetCode::RpcError,
            DispatchError::Proxy(_)
            | DispatchError::Packet(_)
            | DispatchError::EmptyReply
            | DispatchError::RemoteResponse(_) => RetCode::RemoteError,
            DispatchError::UnsupportedMode(_) => RetCode::UnsupportedMode,
        }
    }
}

impl From<DispatchError> for CallResult {
    fn from(err: DispatchError) -> Self {
        CallResult::error(err.retcode(), err.to_string())
    }
}
