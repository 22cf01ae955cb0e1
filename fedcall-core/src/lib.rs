//! # Fedcall Core
//!
//! `fedcall-core` routes a logical API call between federated parties. Depending on the
//! deployment's work mode, a call either goes to the local HTTP server (standalone) or
//! is wrapped into a transport packet and sent to a remote party through the federated
//! gRPC proxy (cluster). Both paths come back as the same JSON result shape.
//!
//! ## Key Components
//!
//! * **[`Dispatcher`]:** The entry point. It never fails: every error is mapped to a
//!   stable retcode inside the returned [`CallResult`].
//! * **[`CallRequest`] & [`CallResult`]:** Typed input and output of a dispatch.
//! * **[`LocalInvoker`](local::LocalInvoker) & [`RemoteInvoker`](proxy::RemoteInvoker):**
//!   The seams behind which the HTTP and gRPC transports live.
//!
//! ## Return codes
//!
//! | retcode | meaning |
//! |---|---|
//! | 0 | success (from the destination's response) |
//! | 101 | the RPC to the proxy failed |
//! | 102 | anything else failed in cluster mode |
//! | 103 | unsupported work mode |
//! | 104 | anything failed in standalone mode |
//!
//! ## Re-exports
//!
//! This crate re-exports `prost` and `tonic` so consumers building their own
//! [`RemoteInvoker`](proxy::RemoteInvoker) use compatible versions.
pub mod config;
pub mod dispatch;
pub mod envelope;
pub mod local;
pub mod proxy;
pub mod types;

pub use config::DispatcherConfig;
pub use dispatch::{DispatchError, Dispatcher};
pub use envelope::ResultEnvelope;
pub use types::{CallRequest, CallResult, HttpMethod, PartyId, RetCode, WorkMode};

// Re-exports
pub use prost;
pub use tonic;

/// Type alias for the standard boxed error used in generic bounds.
type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;
