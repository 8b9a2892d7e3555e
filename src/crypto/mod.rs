//! Cryptographic utilities for the wallet
//!
//! This module provides:
//! - Keccak-256 hashing
//! - ECDSA key management (secp256k1)
//! - Recoverable signatures behind a narrow signing seam

pub mod hash;
pub mod keys;
pub mod signer;

pub use hash::{hash_from_hex, hash_to_hex, keccak256, keccak256_hex};
pub use keys::{
    format_address, is_valid_address, parse_address, public_key_from_hex, public_key_to_address,
    verify_signature, KeyError, KeyPair,
};
pub use signer::{recover_address, recover_public_key, HashSigner, Signature, SIGNATURE_LENGTH};
