//! Ledger Wallet: a minimal custodial wallet for account-based ledgers
//!
//! This crate provides:
//! - secp256k1 key generation, restoration and recoverable signatures
//! - Keccak-256 addresses with EIP-55 checksum formatting
//! - Exact decimal conversion between human units and 18-decimal smallest units
//! - EIP-155 transfer construction, signing and submission over JSON-RPC
//! - Bounded receipt polling
//! - JSON wallet file persistence with owner-only permissions
//!
//! # Example
//!
//! ```no_run
//! use ledger_wallet::config::WalletConfig;
//! use ledger_wallet::wallet::Wallet;
//!
//! let config = WalletConfig::default();
//! let mut wallet = Wallet::from_config(&config)?;
//! wallet.load()?;
//!
//! println!("Address: {}", wallet.address()?);
//! println!("Balance: {}", wallet.balance_human()?);
//!
//! let sent = wallet.send("0x742d35Cc6634C0532925a3b8D4C9db96C4b4d8b6", "0.01")?;
//! let receipt = wallet.wait_for_transaction(&sent.hash_hex(), config.confirmation_attempts)?;
//! println!("Mined in block {}", receipt.block_number);
//! # Ok::<(), ledger_wallet::error::WalletError>(())
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod crypto;
pub mod error;
pub mod network;
pub mod storage;
pub mod units;
pub mod wallet;

// Re-export commonly used types
pub use config::WalletConfig;
pub use core::{PendingTransaction, SignedTransaction, TransactionReceipt, TRANSFER_GAS_FLOOR};
pub use crypto::{KeyPair, Signature};
pub use error::{WalletError, WalletResult};
pub use network::{JsonRpcGateway, LedgerGateway};
pub use storage::{WalletRecord, WalletStore};
pub use units::Decimal;
pub use wallet::{TransactionEngine, Wallet};
