//! Ledger node access
//!
//! This module provides:
//! - The gateway trait the wallet engine depends on
//! - A blocking JSON-RPC implementation over HTTP

pub mod gateway;
pub mod rpc;

#[cfg(test)]
pub(crate) mod testing;

pub use gateway::{CallRequest, GatewayError, LedgerGateway};
pub use rpc::JsonRpcGateway;
