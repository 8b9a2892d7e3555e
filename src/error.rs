//! Error types for the wallet

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::core::TransactionError;
use crate::network::GatewayError;
use crate::storage::StorageError;

/// Step of a wallet operation, carried by network errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    /// Nonce, fee price and network id lookup before building a transfer
    Gather,
    /// Broadcasting the signed transaction
    Submit,
    /// Receipt lookup
    Poll,
    /// Standalone queries such as balance
    Query,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Gather => "gather",
            PipelineStage::Submit => "submit",
            PipelineStage::Poll => "poll",
            PipelineStage::Query => "query",
        };
        f.write_str(name)
    }
}

/// Wallet-level errors
#[derive(Error, Debug)]
pub enum WalletError {
    #[error("Invalid recipient address: {0}")]
    InvalidRecipient(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid transaction hash: {0}")]
    InvalidHash(String),
    #[error("Network error during {stage}: {source}")]
    Network {
        stage: PipelineStage,
        #[source]
        source: GatewayError,
    },
    #[error("Corrupted wallet file {path}: {reason}")]
    CorruptedWallet { path: PathBuf, reason: String },
    #[error("Key generation failed: {0}")]
    KeyGeneration(String),
    #[error("Signing failed: {0}")]
    Signing(#[from] TransactionError),
    #[error("Transaction rejected: {0}")]
    Submission(#[source] GatewayError),
    #[error("Transaction {hash} not confirmed after {attempts} attempts")]
    NotConfirmed { hash: String, attempts: u32 },
    #[error("Wallet not initialized")]
    WalletNotInitialized,
    #[error("Wallet file not found: {0}")]
    WalletNotFound(PathBuf),
    #[error("Wallet file already exists: {0}")]
    WalletExists(PathBuf),
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl WalletError {
    pub(crate) fn network(stage: PipelineStage) -> impl FnOnce(GatewayError) -> Self {
        move |source| WalletError::Network { stage, source }
    }

    /// Malformed user input; never reached the network
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            WalletError::InvalidRecipient(_)
                | WalletError::InvalidAmount(_)
                | WalletError::InvalidHash(_)
        )
    }

    /// Failures the caller may retry as-is
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            WalletError::Network { .. } | WalletError::NotConfirmed { .. }
        )
    }
}

/// Result type for wallet operations
pub type WalletResult<T> = Result<T, WalletError>;
