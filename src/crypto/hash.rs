//! Keccak-256 hashing utilities
//!
//! The ledger's standard hash, used for addresses, message digests and
//! transaction hashes.

use alloy::primitives::B256;

/// Computes the Keccak-256 hash of the input data
pub fn keccak256(data: &[u8]) -> B256 {
    alloy::primitives::keccak256(data)
}

/// Computes Keccak-256 and returns it as a `0x`-prefixed hex string
pub fn keccak256_hex(data: &[u8]) -> String {
    hash_to_hex(&keccak256(data))
}

/// Format a 32-byte hash as `0x`-prefixed lowercase hex
pub fn hash_to_hex(hash: &B256) -> String {
    format!("0x{}", hex::encode(hash))
}

/// Parse a 32-byte hash from hex, with or without the `0x` prefix
pub fn hash_from_hex(text: &str) -> Option<B256> {
    let digits = strip_hex_prefix(text.trim());
    if digits.len() != 64 {
        return None;
    }
    let bytes = hex::decode(digits).ok()?;
    Some(B256::from_slice(&bytes))
}

pub(crate) fn strip_hex_prefix(text: &str) -> &str {
    text.strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text)
}
