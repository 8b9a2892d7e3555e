//! Ledger gateway interface
//!
//! The wallet engine talks to the ledger node only through this trait.
//! Every call is blocking and bounded by the implementation's timeout.

use alloy::primitives::{Address, Bytes, B256, U256};
use thiserror::Error;

use crate::core::TransactionReceipt;

/// Errors reported by a ledger gateway
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// Node unreachable, connection dropped or request timed out
    #[error("Transport error: {0}")]
    Transport(String),
    /// The node answered with a JSON-RPC error object
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },
    /// The node answered with something we could not interpret
    #[error("Malformed response: {0}")]
    Decode(String),
}

impl GatewayError {
    /// Whether the failure happened before the node could answer
    pub fn is_transport(&self) -> bool {
        matches!(self, GatewayError::Transport(_))
    }
}

/// Parameters for a resource estimate of a plain transfer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRequest {
    pub from: Address,
    pub to: Address,
    pub value: U256,
    pub data: Bytes,
}

/// Read and write access to the ledger node
pub trait LedgerGateway {
    /// Account balance in smallest units
    fn balance(&self, address: Address) -> Result<U256, GatewayError>;

    /// Next nonce for the account, counting pending transactions
    fn nonce(&self, address: Address) -> Result<u64, GatewayError>;

    /// Suggested fee price per unit of gas
    fn suggest_fee_price(&self) -> Result<u128, GatewayError>;

    /// Network id used for replay protection
    fn network_id(&self) -> Result<u64, GatewayError>;

    /// Gas limit estimate for a call; may fail
    fn estimate_resource_limit(&self, request: &CallRequest) -> Result<u64, GatewayError>;

    /// Broadcast a signed, RLP-encoded transaction
    fn submit(&self, raw_transaction: &[u8]) -> Result<(), GatewayError>;

    /// Receipt for a transaction, or `None` if not yet mined
    fn receipt(&self, hash: B256) -> Result<Option<TransactionReceipt>, GatewayError>;
}
