//! # Proxy Service
//!
//! **INTERNAL USE ONLY**: This crate exists solely to provide a generated
//! `DataTransferService` server for integration testing `fedcall_core`'s cluster path.
//! It is not intended for production use.

pub mod pb {
    include!(concat!(
        env!("OUT_DIR"),
        "/com.webank.ai.eggroll.api.networking.proxy.rs"
    ));
}

pub use pb::data_transfer_service_server::{DataTransferService, DataTransferServiceServer};
