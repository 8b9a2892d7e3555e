//! Core ledger components
//!
//! This module contains the fundamental building blocks:
//! - Transactions (plain value transfers with EIP-155 replay protection)
//! - Receipts
//! - Resource limit selection with a fixed fallback

pub mod fee;
pub mod transaction;

pub use fee::{resolve_gas_limit, GasLimit, GasLimitSource, TRANSFER_GAS_FLOOR};
pub use transaction::{
    PendingTransaction, ReceiptStatus, SignedTransaction, TransactionError, TransactionReceipt,
    MAX_CHAIN_ID,
};
