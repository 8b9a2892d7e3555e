//! Value-transfer transactions for an account-based ledger
//!
//! Legacy transactions with EIP-155 replay protection:
//! - The network id is bound into the signing hash
//! - `v = recovery_id + 2 * network_id + 35`
//! - Canonical encoding is RLP; the transaction hash is Keccak-256 of it

use alloy::primitives::{Address, Bytes, B256, U256};
use alloy::rlp::{Encodable, Header};
use thiserror::Error;

use crate::crypto::{format_address, keccak256, recover_address, HashSigner, KeyError, Signature};

// =============================================================================
// Error Types
// =============================================================================

/// Transaction-related errors
#[derive(Error, Debug)]
pub enum TransactionError {
    #[error("Signer {signer} does not own sender {sender}")]
    SignerMismatch { sender: String, signer: String },
    #[error("Signature recovers to {recovered}, expected {sender}")]
    SignatureMismatch { sender: String, recovered: String },
    #[error("Network id {0} is too large to encode in v")]
    UnsupportedChainId(u64),
    #[error("Crypto error: {0}")]
    CryptoError(#[from] KeyError),
}

/// Largest network id whose `v = recovery_id + 2 * id + 35` fits in a u64
/// for every recovery id (0..=3)
pub const MAX_CHAIN_ID: u64 = (u64::MAX - 38) / 2;

// =============================================================================
// Pending Transaction
// =============================================================================

/// An unsigned plain value transfer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTransaction {
    pub from: Address,
    pub to: Address,
    /// Value in smallest units
    pub value: U256,
    /// Resource (gas) limit
    pub gas_limit: u64,
    /// Fee price per unit of gas, in smallest units
    pub gas_price: u128,
    pub nonce: u64,
    /// Always empty for plain transfers
    pub data: Bytes,
    /// Network id bound into the signature
    pub chain_id: u64,
}

impl PendingTransaction {
    /// A plain value transfer with an empty payload
    pub fn transfer(
        from: Address,
        to: Address,
        value: U256,
        gas_limit: u64,
        gas_price: u128,
        nonce: u64,
        chain_id: u64,
    ) -> Self {
        Self {
            from,
            to,
            value,
            gas_limit,
            gas_price,
            nonce,
            data: Bytes::new(),
            chain_id,
        }
    }

    /// Hash that gets signed: RLP of the six fields plus `(chain_id, 0, 0)`
    pub fn signing_hash(&self) -> B256 {
        keccak256(&encode_list(&[
            &self.nonce,
            &self.gas_price,
            &self.gas_limit,
            &self.to,
            &self.value,
            &self.data,
            &self.chain_id,
            &0u8,
            &0u8,
        ]))
    }

    /// Sign with the sender's key
    ///
    /// Fails if the network id exceeds [`MAX_CHAIN_ID`], if the signer is
    /// not the sender, or if the produced signature does not recover to
    /// the sender.
    pub fn sign<S: HashSigner + ?Sized>(
        self,
        signer: &S,
    ) -> Result<SignedTransaction, TransactionError> {
        if self.chain_id > MAX_CHAIN_ID {
            return Err(TransactionError::UnsupportedChainId(self.chain_id));
        }

        if signer.address() != self.from {
            return Err(TransactionError::SignerMismatch {
                sender: format_address(&self.from),
                signer: format_address(&signer.address()),
            });
        }

        let hash = self.signing_hash();
        let signature = signer.sign_hash(&hash)?;

        let recovered = recover_address(&hash, &signature)?;
        if recovered != self.from {
            return Err(TransactionError::SignatureMismatch {
                sender: format_address(&self.from),
                recovered: format_address(&recovered),
            });
        }

        Ok(SignedTransaction {
            transaction: self,
            signature,
        })
    }
}

// =============================================================================
// Signed Transaction
// =============================================================================

/// A pending transaction plus its recoverable signature; immutable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    transaction: PendingTransaction,
    signature: Signature,
}

impl SignedTransaction {
    pub fn transaction(&self) -> &PendingTransaction {
        &self.transaction
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// EIP-155 `v` value
    pub fn v(&self) -> u64 {
        u64::from(self.signature.recovery_id()) + self.transaction.chain_id * 2 + 35
    }

    /// Raw RLP bytes for broadcast
    pub fn encoded(&self) -> Vec<u8> {
        let tx = &self.transaction;
        encode_list(&[
            &tx.nonce,
            &tx.gas_price,
            &tx.gas_limit,
            &tx.to,
            &tx.value,
            &tx.data,
            &self.v(),
            &self.signature.r(),
            &self.signature.s(),
        ])
    }

    /// Canonical transaction hash
    pub fn hash(&self) -> B256 {
        keccak256(&self.encoded())
    }

    /// Recover the sender from the signature alone
    pub fn recover_sender(&self) -> Result<Address, KeyError> {
        recover_address(&self.transaction.signing_hash(), &self.signature)
    }
}

fn encode_list(fields: &[&dyn Encodable]) -> Vec<u8> {
    let payload_length: usize = fields.iter().map(|field| field.length()).sum();
    let mut out = Vec::with_capacity(payload_length + 9);
    Header {
        list: true,
        payload_length,
    }
    .encode(&mut out);
    for field in fields {
        field.encode(&mut out);
    }
    out
}

// =============================================================================
// Receipt
// =============================================================================

/// Execution outcome recorded in a receipt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiptStatus {
    Success,
    Failure,
    /// Mined, but the node reports a state root instead of a status code
    Unknown,
}

/// Ledger confirmation record for a mined transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionReceipt {
    pub transaction_hash: B256,
    pub status: ReceiptStatus,
    pub block_number: u64,
    /// Gas consumed by the transaction
    pub gas_used: u64,
}

impl TransactionReceipt {
    pub fn is_success(&self) -> bool {
        self.status == ReceiptStatus::Success
    }
}

// =============================================================================
// Tests
// =============================================================================
