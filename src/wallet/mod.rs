//! Wallet module for key and transaction management

pub mod engine;
pub mod wallet;

pub use engine::{PreparedTransfer, SentTransfer, TransactionEngine, TransferRequest};
pub use wallet::Wallet;
