//! Cryptographic key types for wallet identity and signing.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::TypesError;

/// A 32-byte Ed25519 public key, displayed as base58 (the on-chain address form).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PublicKey(pub [u8; 32]);

/// A 32-byte Ed25519 private key (the secret seed).
///
/// This type intentionally does not implement `Debug`, `Serialize`, or `Clone`
/// to prevent accidental exposure. Key bytes are zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey(pub [u8; 32]);

/// A 64-byte Ed25519 signature. The first signature of a transaction is also
/// its identifier on the network.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature(pub [u8; 64]);

/// An Ed25519 key pair (public + private).
///
/// Use `solvault_crypto::keypair_from_mnemonic()` or
/// `solvault_crypto::keypair_from_seed()` to construct key pairs.
pub struct KeyPair {
    pub public: PublicKey,
    pub private: PrivateKey,
}

impl PublicKey {
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Decode a base58 address. Only the length is checked: any 32-byte value
    /// is a syntactically valid identifier.
    pub fn from_base58(s: &str) -> Result<Self, TypesError> {
        let bytes = bs58::decode(s.trim())
            .into_vec()
            .map_err(|e| TypesError::InvalidPublicKey(format!("{s}: {e}")))?;
        let arr: [u8; 32] = bytes.try_into().map_err(|v: Vec<u8>| {
            TypesError::InvalidPublicKey(format!("{s}: expected 32 bytes, got {}", v.len()))
        })?;
        Ok(Self(arr))
    }

    pub fn to_base58(&self) -> String {
        bs58::encode(&self.0).into_string()
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base58())
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_base58())
    }
}

impl FromStr for PublicKey {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_base58(s)
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_base58())
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_base58(&s).map_err(serde::de::Error::custom)
    }
}

impl Signature {
    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }

    pub fn from_base58(s: &str) -> Result<Self, TypesError> {
        let bytes = bs58::decode(s.trim())
            .into_vec()
            .map_err(|e| TypesError::InvalidSignature(format!("{s}: {e}")))?;
        let arr: [u8; 64] = bytes.try_into().map_err(|v: Vec<u8>| {
            TypesError::InvalidSignature(format!("{s}: expected 64 bytes, got {}", v.len()))
        })?;
        Ok(Self(arr))
    }

    pub fn to_base58(&self) -> String {
        bs58::encode(&self.0).into_string()
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base58())
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.to_base58();
        write!(f, "Signature({}..)", &s[..s.len().min(8)])
    }
}

impl FromStr for Signature {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_base58(s)
    }
}

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_base58())
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_base58(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_program_id_decodes_to_zero_bytes() {
        let pk = PublicKey::from_base58("11111111111111111111111111111111").unwrap();
        assert_eq!(pk.0, [0u8; 32]);
        assert_eq!(pk.to_string(), "11111111111111111111111111111111");
    }

    #[test]
    fn known_mint_roundtrips() {
        let usdc = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";
        let pk: PublicKey = usdc.parse().unwrap();
        assert_eq!(pk.to_base58(), usdc);
    }

    #[test]
    fn malformed_addresses_rejected() {
        assert!(PublicKey::from_base58("").is_err());
        assert!(PublicKey::from_base58("not-base58-0OIl").is_err());
        assert!(PublicKey::from_base58("abc").is_err());
        // 64-byte value is a signature, not a key
        let sig = bs58::encode([7u8; 64]).into_string();
        assert!(PublicKey::from_base58(&sig).is_err());
    }

    #[test]
    fn public_key_serializes_as_base58_string() {
        let pk = PublicKey::new([1u8; 32]);
        let json = serde_json::to_string(&pk).unwrap();
        assert_eq!(json, format!("\"{}\"", pk.to_base58()));
        let back: PublicKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, pk);
    }

    #[test]
    fn signature_parse_checks_length() {
        let sig = Signature([9u8; 64]);
        let parsed: Signature = sig.to_string().parse().unwrap();
        assert_eq!(parsed, sig);
        assert!(Signature::from_base58(&PublicKey::new([1u8; 32]).to_base58()).is_err());
    }
}
