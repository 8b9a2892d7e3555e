//! Storage layer for the wallet
//!
//! This module provides:
//! - JSON persistence of the wallet record with atomic writes

pub mod persistence;

pub use persistence::{StorageError, WalletRecord, WalletStore};
