//! Wallet implementation
//!
//! A `Wallet` is one explicitly constructed engine instance: it owns the
//! active key pair, the store it was loaded from and the gateway handle.

use alloy::primitives::{B256, U256};
use std::time::Duration;

use super::engine::{SentTransfer, TransactionEngine};
use crate::config::WalletConfig;
use crate::core::TransactionReceipt;
use crate::crypto::{hash_from_hex, parse_address, verify_signature, KeyPair, Signature};
use crate::error::{PipelineStage, WalletError, WalletResult};
use crate::network::{JsonRpcGateway, LedgerGateway};
use crate::storage::{StorageError, WalletStore};
use crate::units::{self, Decimal};

/// Single-key custodial wallet
pub struct Wallet<G: LedgerGateway> {
    /// The key pair for signing transactions
    key_pair: Option<KeyPair>,
    store: WalletStore,
    engine: TransactionEngine<G>,
}

impl Wallet<JsonRpcGateway> {
    /// Build a wallet talking JSON-RPC to `config.rpc_url`
    pub fn from_config(config: &WalletConfig) -> WalletResult<Self> {
        let gateway = JsonRpcGateway::new(&config.rpc_url, config.request_timeout)
            .map_err(WalletError::network(PipelineStage::Query))?;
        Ok(Self::new(
            gateway,
            WalletStore::new(&config.wallet_file),
            config.poll_interval,
        ))
    }
}

impl<G: LedgerGateway> Wallet<G> {
    /// Create a wallet with no key loaded yet
    pub fn new(gateway: G, store: WalletStore, poll_interval: Duration) -> Self {
        Self {
            key_pair: None,
            store,
            engine: TransactionEngine::new(gateway, poll_interval),
        }
    }

    /// Generate a fresh key pair and persist it
    ///
    /// Refuses to replace an existing wallet file unless `overwrite` is set.
    /// If saving fails the new key is discarded.
    pub fn generate(&mut self, overwrite: bool) -> WalletResult<&KeyPair> {
        if self.store.exists() && !overwrite {
            return Err(WalletError::WalletExists(self.store.path().to_path_buf()));
        }

        let key_pair = KeyPair::generate().map_err(|e| WalletError::KeyGeneration(e.to_string()))?;
        self.store.save(&key_pair.to_record())?;

        log::info!(
            "Generated wallet {} at {}",
            key_pair.address_hex(),
            self.store.path().display()
        );
        Ok(self.key_pair.insert(key_pair))
    }

    /// Load and verify the key pair from the wallet file
    pub fn load(&mut self) -> WalletResult<&KeyPair> {
        let corrupted = |reason: String| WalletError::CorruptedWallet {
            path: self.store.path().to_path_buf(),
            reason,
        };

        let record = match self.store.load() {
            Ok(record) => record,
            Err(StorageError::NotFound(path)) => return Err(WalletError::WalletNotFound(path)),
            Err(StorageError::SerializationError(e)) => return Err(corrupted(e.to_string())),
            Err(e) => return Err(e.into()),
        };

        let key_pair = KeyPair::restore(&record).map_err(|e| corrupted(e.to_string()))?;

        log::debug!("Loaded wallet {}", key_pair.address_hex());
        Ok(self.key_pair.insert(key_pair))
    }

    /// Persist the active key pair
    pub fn save(&self) -> WalletResult<()> {
        let key_pair = self.key_pair()?;
        self.store.save(&key_pair.to_record())?;
        Ok(())
    }

    /// The active key pair
    pub fn key_pair(&self) -> WalletResult<&KeyPair> {
        self.key_pair.as_ref().ok_or(WalletError::WalletNotInitialized)
    }

    pub fn store(&self) -> &WalletStore {
        &self.store
    }

    pub fn engine(&self) -> &TransactionEngine<G> {
        &self.engine
    }

    /// Get the wallet's address in checksum form
    pub fn address(&self) -> WalletResult<String> {
        Ok(self.key_pair()?.address_hex())
    }

    /// Balance in smallest units
    pub fn balance(&self) -> WalletResult<U256> {
        self.engine.balance(self.key_pair()?.address())
    }

    /// Balance in human units
    pub fn balance_human(&self) -> WalletResult<Decimal> {
        self.balance().map(units::to_human_unit)
    }

    /// Send `amount` (human units) to `recipient`
    pub fn send(&self, recipient: &str, amount: &str) -> WalletResult<SentTransfer> {
        let key_pair = self.key_pair()?;
        self.engine.send_to(key_pair, recipient, amount)
    }

    /// Receipt for `hash`, or `None` if not yet mined
    pub fn transaction_status(&self, hash: &str) -> WalletResult<Option<TransactionReceipt>> {
        self.engine.transaction_status(parse_hash(hash)?)
    }

    /// Block until `hash` has a receipt or `max_attempts` lookups are spent
    pub fn wait_for_transaction(
        &self,
        hash: &str,
        max_attempts: u32,
    ) -> WalletResult<TransactionReceipt> {
        self.engine.wait_for_transaction(parse_hash(hash)?, max_attempts)
    }

    /// Sign an arbitrary message with the active key
    pub fn sign_message(&self, message: &[u8]) -> WalletResult<Signature> {
        self.key_pair()?
            .sign_message(message)
            .map_err(|e| WalletError::Signing(e.into()))
    }

    /// Check a signature against an address given as text
    ///
    /// Malformed addresses or signatures yield `false`.
    pub fn verify_message(&self, message: &[u8], signature: &[u8], address: &str) -> bool {
        match parse_address(address) {
            Ok(address) => verify_signature(message, signature, &address),
            Err(_) => false,
        }
    }
}

fn parse_hash(hash: &str) -> WalletResult<B256> {
    hash_from_hex(hash).ok_or_else(|| WalletError::InvalidHash(hash.to_string()))
}
