//! ECDSA key management for the wallet
//!
//! Provides key pair generation, restoration, message signing and
//! verification using the secp256k1 elliptic curve. Addresses are the
//! last 20 bytes of the Keccak-256 hash of the uncompressed public key.

use alloy::primitives::{Address, B256};
use rand::rngs::OsRng;
use rand::RngCore;
use secp256k1::{Message, PublicKey, Secp256k1, SecretKey};
use std::fmt;
use thiserror::Error;

use super::hash::{keccak256, strip_hex_prefix};
use super::signer::{recover_address, HashSigner, Signature};
use crate::storage::WalletRecord;

/// Errors that can occur during key operations
#[derive(Error, Debug)]
pub enum KeyError {
    #[error("Invalid private key")]
    InvalidPrivateKey,
    #[error("Invalid public key")]
    InvalidPublicKey,
    #[error("Invalid signature")]
    InvalidSignature,
    #[error("Invalid address: {0}")]
    InvalidAddress(String),
    #[error("Address mismatch: stored {stored}, derived {derived}")]
    AddressMismatch { stored: String, derived: String },
    #[error("Secure random source unavailable: {0}")]
    RandomSource(String),
    #[error("Secp256k1 error: {0}")]
    Secp256k1Error(#[from] secp256k1::Error),
}

/// A key pair: secret scalar, its public point and the derived address
///
/// Never partially updated; restoring or generating always yields a
/// whole new value.
#[derive(Clone)]
pub struct KeyPair {
    pub secret_key: SecretKey,
    pub public_key: PublicKey,
    address: Address,
}

impl KeyPair {
    /// Generate a new random key pair from the operating system RNG
    pub fn generate() -> Result<Self, KeyError> {
        let mut bytes = [0u8; 32];
        loop {
            OsRng
                .try_fill_bytes(&mut bytes)
                .map_err(|e| KeyError::RandomSource(e.to_string()))?;

            // Values outside [1, n) are rejected by the curve; draw again
            if let Ok(secret_key) = SecretKey::from_slice(&bytes) {
                bytes.fill(0);
                return Ok(Self::from_secret_key(secret_key));
            }
        }
    }

    /// Create a key pair from an existing secret key
    pub fn from_secret_key(secret_key: SecretKey) -> Self {
        let secp = Secp256k1::new();
        let public_key = PublicKey::from_secret_key(&secp, &secret_key);
        Self {
            secret_key,
            public_key,
            address: public_key_to_address(&public_key),
        }
    }

    /// Create a key pair from a hex-encoded private key (optional `0x`)
    pub fn from_private_key_hex(hex_key: &str) -> Result<Self, KeyError> {
        let bytes =
            hex::decode(strip_hex_prefix(hex_key.trim())).map_err(|_| KeyError::InvalidPrivateKey)?;
        let secret_key =
            SecretKey::from_slice(&bytes).map_err(|_| KeyError::InvalidPrivateKey)?;
        Ok(Self::from_secret_key(secret_key))
    }

    /// Restore a key pair from its persisted record
    ///
    /// The address is re-derived from the private key and must match the
    /// stored one (case-insensitively). A mismatch is reported, never repaired.
    pub fn restore(record: &WalletRecord) -> Result<Self, KeyError> {
        let key_pair = Self::from_private_key_hex(&record.private_key)?;

        let stored = strip_hex_prefix(record.address.trim());
        let derived = key_pair.address_hex();
        if !stored.eq_ignore_ascii_case(strip_hex_prefix(&derived)) {
            return Err(KeyError::AddressMismatch {
                stored: record.address.clone(),
                derived,
            });
        }

        Ok(key_pair)
    }

    /// The persisted form of this key pair
    pub fn to_record(&self) -> WalletRecord {
        WalletRecord {
            private_key: self.private_key_hex(),
            public_key: self.public_key_hex(),
            address: self.address_hex(),
        }
    }

    /// Get the private key as a hex string
    pub fn private_key_hex(&self) -> String {
        hex::encode(self.secret_key.secret_bytes())
    }

    /// Get the public key as a hex string (uncompressed, `04` prefix)
    pub fn public_key_hex(&self) -> String {
        hex::encode(self.public_key.serialize_uncompressed())
    }

    /// The 20-byte account address
    pub fn address(&self) -> Address {
        self.address
    }

    /// The address in EIP-55 mixed-case checksum form
    pub fn address_hex(&self) -> String {
        format_address(&self.address)
    }

    /// Hash a message with Keccak-256 and sign the digest
    pub fn sign_message(&self, message: &[u8]) -> Result<Signature, KeyError> {
        self.sign_hash(&keccak256(message))
    }
}

impl HashSigner for KeyPair {
    fn address(&self) -> Address {
        self.address
    }

    fn sign_hash(&self, hash: &B256) -> Result<Signature, KeyError> {
        let secp = Secp256k1::new();
        let message = Message::from_digest_slice(hash.as_slice())?;
        let signature = secp.sign_ecdsa_recoverable(&message, &self.secret_key);
        Signature::from_secp(&signature)
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("address", &self.address_hex())
            .field("secret_key", &"[REDACTED]")
            .finish()
    }
}

/// Convert a public key to its 20-byte address
pub fn public_key_to_address(public_key: &PublicKey) -> Address {
    let uncompressed = public_key.serialize_uncompressed();
    let hash = keccak256(&uncompressed[1..]);
    Address::from_slice(&hash[12..])
}

/// Parse a public key from hex string (compressed or uncompressed)
pub fn public_key_from_hex(hex_key: &str) -> Result<PublicKey, KeyError> {
    let bytes =
        hex::decode(strip_hex_prefix(hex_key.trim())).map_err(|_| KeyError::InvalidPublicKey)?;
    PublicKey::from_slice(&bytes).map_err(|_| KeyError::InvalidPublicKey)
}

/// Parse a 40-hex-digit address, with or without `0x`, in any case
pub fn parse_address(text: &str) -> Result<Address, KeyError> {
    let digits = strip_hex_prefix(text.trim());
    if digits.len() != 40 {
        return Err(KeyError::InvalidAddress(text.to_string()));
    }
    let bytes = hex::decode(digits).map_err(|_| KeyError::InvalidAddress(text.to_string()))?;
    Ok(Address::from_slice(&bytes))
}

/// Check whether a string is a well-formed address
pub fn is_valid_address(text: &str) -> bool {
    parse_address(text).is_ok()
}

/// Format an address in EIP-55 checksum form
pub fn format_address(address: &Address) -> String {
    address.to_checksum(None)
}

/// Verify that `signature` over `message` was produced by `claimed`
///
/// Malformed signatures yield `false`.
pub fn verify_signature(message: &[u8], signature: &[u8], claimed: &Address) -> bool {
    let Ok(signature) = Signature::from_bytes(signature) else {
        return false;
    };
    match recover_address(&keccak256(message), &signature) {
        Ok(signer) => signer == *claimed,
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const DEV_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

    #[test]
    fn test_key_pair_generation() {
        let kp = KeyPair::generate().unwrap();
        assert_eq!(kp.private_key_hex().len(), 64);
        assert_eq!(kp.public_key_hex().len(), 130);
        assert!(kp.public_key_hex().starts_with("04"));
        assert_eq!(kp.address_hex().len(), 42);
        assert!(kp.address_hex().starts_with("0x"));
    }

    #[test]
    fn test_generated_keys_differ() {
        let a = KeyPair::generate().unwrap();
        let b = KeyPair::generate().unwrap();
        assert_ne!(a.private_key_hex(), b.private_key_hex());
        assert_ne!(a.address(), b.address());
    }

    #[test]
    fn test_known_address_derivation() {
        let kp = KeyPair::from_private_key_hex(DEV_KEY).unwrap();
        assert_eq!(kp.address_hex(), DEV_ADDRESS);
    }

    #[test]
    fn test_key_pair_from_hex() {
        let kp1 = KeyPair::generate().unwrap();
        let kp2 = KeyPair::from_private_key_hex(&kp1.private_key_hex()).unwrap();
        assert_eq!(kp1.public_key_hex(), kp2.public_key_hex());
        assert_eq!(kp1.address(), kp2.address());
    }

    #[test]
    fn test_invalid_private_keys() {
        assert!(KeyPair::from_private_key_hex("not hex").is_err());
        assert!(KeyPair::from_private_key_hex("abcd").is_err());
        assert!(KeyPair::from_private_key_hex(&"00".repeat(32)).is_err());
    }

    #[test]
    fn test_restore_matches_address_case_insensitively() {
        let kp = KeyPair::generate().unwrap();
        let mut record = kp.to_record();
        record.address = record.address.to_lowercase();

        let restored = KeyPair::restore(&record).unwrap();
        assert_eq!(restored.address(), kp.address());

        record.address = record.address.trim_start_matches("0x").to_uppercase();
        assert!(KeyPair::restore(&record).is_ok());
    }

    #[test]
    fn test_restore_rejects_mismatched_address() {
        let kp = KeyPair::generate().unwrap();
        let other = KeyPair::generate().unwrap();
        let mut record = kp.to_record();
        record.address = other.address_hex();

        assert!(matches!(
            KeyPair::restore(&record),
            Err(KeyError::AddressMismatch { .. })
        ));
    }

    #[test]
    fn test_restore_rejects_malformed_key() {
        let mut record = KeyPair::generate().unwrap().to_record();
        record.private_key = "zz".repeat(32);
        assert!(matches!(
            KeyPair::restore(&record),
            Err(KeyError::InvalidPrivateKey)
        ));
    }

    #[test]
    fn test_sign_and_verify() {
        let kp = KeyPair::generate().unwrap();
        let message = b"Hello, ledger!";

        let signature = kp.sign_message(message).unwrap().to_bytes();
        assert!(verify_signature(message, &signature, &kp.address()));
    }

    #[test]
    fn test_verify_rejects_wrong_inputs() {
        let kp = KeyPair::generate().unwrap();
        let other = KeyPair::generate().unwrap();
        let message = b"original";
        let signature = kp.sign_message(message).unwrap().to_bytes();

        assert!(!verify_signature(b"tampered", &signature, &kp.address()));
        assert!(!verify_signature(message, &signature, &other.address()));

        let foreign = other.sign_message(message).unwrap().to_bytes();
        assert!(!verify_signature(message, &foreign, &kp.address()));
    }

    #[test]
    fn test_verify_malformed_signature_is_false() {
        let kp = KeyPair::generate().unwrap();
        assert!(!verify_signature(b"m", &[], &kp.address()));
        assert!(!verify_signature(b"m", &[0u8; 65], &kp.address()));
        assert!(!verify_signature(b"m", &[0xffu8; 65], &kp.address()));
    }

    #[test]
    fn test_address_parsing() {
        assert!(is_valid_address(DEV_ADDRESS));
        assert!(is_valid_address(&DEV_ADDRESS.to_lowercase()));
        assert!(is_valid_address(&DEV_ADDRESS[2..]));
        assert!(!is_valid_address("0xinvalid"));
        assert!(!is_valid_address("0x742d35Cc6634C0532925a3b8D4C9db96C4b4d8"));
        assert!(!is_valid_address(""));

        let parsed = parse_address(&DEV_ADDRESS.to_lowercase()).unwrap();
        assert_eq!(format_address(&parsed), DEV_ADDRESS);
    }

    #[test]
    fn test_public_key_round_trip() {
        let kp = KeyPair::generate().unwrap();
        let parsed = public_key_from_hex(&kp.public_key_hex()).unwrap();
        assert_eq!(public_key_to_address(&parsed), kp.address());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let kp = KeyPair::from_private_key_hex(DEV_KEY).unwrap();
        let debug = format!("{:?}", kp);
        assert!(!debug.contains(&DEV_KEY[2..]));
        assert!(debug.contains("REDACTED"));
    }
}
