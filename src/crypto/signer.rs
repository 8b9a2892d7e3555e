//! Recoverable signatures and the signing seam
//!
//! Everything above this module talks to the curve through two calls:
//! [`HashSigner::sign_hash`] and [`recover_public_key`]. Swapping the
//! elliptic-curve backend only touches this file and `keys.rs`.

use alloy::primitives::{Address, B256, U256};
use secp256k1::ecdsa::{RecoverableSignature, RecoveryId};
use secp256k1::{Message, PublicKey, Secp256k1};

use super::hash::strip_hex_prefix;
use super::keys::{public_key_to_address, KeyError};

/// Length of an encoded signature: `r || s || v`
pub const SIGNATURE_LENGTH: usize = 65;

/// A recoverable ECDSA signature over a 32-byte hash
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    compact: [u8; 64],
    recovery_id: u8,
}

impl Signature {
    /// The `r` component
    pub fn r(&self) -> U256 {
        U256::from_be_slice(&self.compact[..32])
    }

    /// The `s` component
    pub fn s(&self) -> U256 {
        U256::from_be_slice(&self.compact[32..])
    }

    /// Recovery id (0 or 1 for signatures produced here)
    pub fn recovery_id(&self) -> u8 {
        self.recovery_id
    }

    /// Encode as 65 bytes `r || s || v` with `v` in {0, 1}
    pub fn to_bytes(&self) -> [u8; SIGNATURE_LENGTH] {
        let mut out = [0u8; SIGNATURE_LENGTH];
        out[..64].copy_from_slice(&self.compact);
        out[64] = self.recovery_id;
        out
    }

    /// `0x`-prefixed hex of [`Signature::to_bytes`]
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.to_bytes()))
    }

    /// Decode a 65-byte signature; `v` may be 0/1 or the legacy 27/28
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeyError> {
        if bytes.len() != SIGNATURE_LENGTH {
            return Err(KeyError::InvalidSignature);
        }

        let recovery_id = match bytes[64] {
            v @ 0..=3 => v,
            v @ 27..=30 => v - 27,
            _ => return Err(KeyError::InvalidSignature),
        };

        let mut compact = [0u8; 64];
        compact.copy_from_slice(&bytes[..64]);
        Ok(Self {
            compact,
            recovery_id,
        })
    }

    /// Decode from hex, with or without the `0x` prefix
    pub fn from_hex(text: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(strip_hex_prefix(text.trim()))
            .map_err(|_| KeyError::InvalidSignature)?;
        Self::from_bytes(&bytes)
    }

    fn to_secp(self) -> Result<RecoverableSignature, KeyError> {
        let recovery_id = RecoveryId::from_i32(i32::from(self.recovery_id))
            .map_err(|_| KeyError::InvalidSignature)?;
        RecoverableSignature::from_compact(&self.compact, recovery_id)
            .map_err(|_| KeyError::InvalidSignature)
    }

    pub(crate) fn from_secp(signature: &RecoverableSignature) -> Result<Self, KeyError> {
        let (recovery_id, compact) = signature.serialize_compact();
        let recovery_id =
            u8::try_from(recovery_id.to_i32()).map_err(|_| KeyError::InvalidSignature)?;
        Ok(Self {
            compact,
            recovery_id,
        })
    }
}

/// Anything that can produce recoverable signatures over 32-byte hashes
pub trait HashSigner {
    /// Address the signatures recover to
    fn address(&self) -> Address;

    /// Sign a prehashed 32-byte digest
    fn sign_hash(&self, hash: &B256) -> Result<Signature, KeyError>;
}

/// Recover the signer's public key from a hash and signature
pub fn recover_public_key(hash: &B256, signature: &Signature) -> Result<PublicKey, KeyError> {
    let secp = Secp256k1::new();
    let message = Message::from_digest_slice(hash.as_slice())?;
    let signature = signature.to_secp()?;
    Ok(secp.recover_ecdsa(&message, &signature)?)
}

/// Recover the signer's address from a hash and signature
pub fn recover_address(hash: &B256, signature: &Signature) -> Result<Address, KeyError> {
    recover_public_key(hash, signature).map(|key| public_key_to_address(&key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{keccak256, KeyPair};

    #[test]
    fn test_sign_and_recover() {
        let kp = KeyPair::generate().unwrap();
        let hash = keccak256(b"recover me");

        let signature = kp.sign_hash(&hash).unwrap();
        assert_eq!(recover_address(&hash, &signature).unwrap(), kp.address());
        assert_eq!(recover_public_key(&hash, &signature).unwrap(), kp.public_key);
    }

    #[test]
    fn test_signature_byte_encoding() {
        let kp = KeyPair::generate().unwrap();
        let signature = kp.sign_hash(&keccak256(b"bytes")).unwrap();

        let bytes = signature.to_bytes();
        assert_eq!(bytes.len(), SIGNATURE_LENGTH);
        assert!(bytes[64] <= 1);
        assert_eq!(Signature::from_bytes(&bytes).unwrap(), signature);
        assert_eq!(Signature::from_hex(&signature.to_hex()).unwrap(), signature);
    }

    #[test]
    fn test_legacy_v_accepted() {
        let kp = KeyPair::generate().unwrap();
        let hash = keccak256(b"legacy");
        let signature = kp.sign_hash(&hash).unwrap();

        let mut bytes = signature.to_bytes();
        bytes[64] += 27;
        let decoded = Signature::from_bytes(&bytes).unwrap();
        assert_eq!(recover_address(&hash, &decoded).unwrap(), kp.address());
    }

    #[test]
    fn test_malformed_signatures_rejected() {
        assert!(Signature::from_bytes(&[0u8; 64]).is_err());
        assert!(Signature::from_bytes(&[0u8; 66]).is_err());

        let mut bad_v = [1u8; 65];
        bad_v[64] = 5;
        assert!(Signature::from_bytes(&bad_v).is_err());
        assert!(Signature::from_hex("0xnothex").is_err());
    }

    #[test]
    fn test_r_and_s_components() {
        let kp = KeyPair::generate().unwrap();
        let signature = kp.sign_hash(&keccak256(b"components")).unwrap();
        let bytes = signature.to_bytes();

        assert_eq!(signature.r(), U256::from_be_slice(&bytes[..32]));
        assert_eq!(signature.s(), U256::from_be_slice(&bytes[32..64]));
        assert!(signature.r() > U256::ZERO);
    }
}
