//! BIP39 mnemonic generation and Ed25519 key derivation.
//!
//! Generates a 24-word mnemonic (256-bit entropy) and derives an Ed25519
//! keypair along Solana's account path `m/44'/501'/0'/0'`:
//!
//! 1. Validate the phrase and derive the 64-byte BIP39 seed (empty passphrase)
//! 2. Walk the path with SLIP-0010 hardened derivation
//! 3. The resulting 32-byte key is the Ed25519 secret seed

use std::fmt;

use bip39::Mnemonic as Bip39Mnemonic;
use solvault_types::{KeyPair, PrivateKey};
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::keys::keypair_from_private;
use crate::slip10::{derive_ed25519, parse_derivation_path};

/// Account derivation path shared by Solana wallets.
pub const SOLANA_DERIVATION_PATH: &str = "m/44'/501'/0'/0'";

/// Entropy size for generated phrases (256 bits, 24 words).
const ENTROPY_BYTES: usize = 32;

/// Errors arising from mnemonic operations.
#[derive(Debug, Error)]
pub enum MnemonicError {
    #[error("invalid mnemonic phrase: {0}")]
    InvalidMnemonic(String),

    #[error("invalid derivation path: {0}")]
    InvalidPath(String),

    #[error("key derivation failed: {0}")]
    DerivationFailed(String),

    #[error("entropy source unavailable: {0}")]
    Entropy(String),
}

/// A checksum-validated, whitespace-normalised BIP39 phrase.
///
/// The words are wiped from memory on drop and never printed by `Debug`.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Mnemonic(String);

impl Mnemonic {
    /// Normalise and validate a user-supplied phrase.
    pub fn parse(phrase: &str) -> Result<Self, MnemonicError> {
        let normalized = normalize(phrase);
        Bip39Mnemonic::parse_normalized(&normalized)
            .map_err(|e| MnemonicError::InvalidMnemonic(e.to_string()))?;
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn word_count(&self) -> usize {
        self.0.split(' ').count()
    }

    /// Derive the account keypair for this phrase.
    pub fn to_keypair(&self) -> Result<KeyPair, MnemonicError> {
        keypair_from_mnemonic(&self.0)
    }
}

impl fmt::Debug for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mnemonic(<{} words>)", self.word_count())
    }
}

fn normalize(phrase: &str) -> String {
    phrase
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Generate a new 24-word BIP39 mnemonic from 256 bits of OS entropy.
pub fn generate_mnemonic() -> Result<Mnemonic, MnemonicError> {
    let mut entropy = Zeroizing::new([0u8; ENTROPY_BYTES]);
    getrandom::getrandom(&mut entropy[..]).map_err(|e| MnemonicError::Entropy(e.to_string()))?;
    let mnemonic = Bip39Mnemonic::from_entropy(&entropy[..])
        .map_err(|e| MnemonicError::DerivationFailed(e.to_string()))?;
    Ok(Mnemonic(mnemonic.to_string()))
}

/// Validate that a phrase is a well-formed BIP39 mnemonic (wordlist + checksum).
pub fn validate_mnemonic(phrase: &str) -> bool {
    Bip39Mnemonic::parse_normalized(&normalize(phrase)).is_ok()
}

/// Derive the Ed25519 account keypair from a BIP39 mnemonic phrase.
///
/// Deterministic: the same phrase always yields the same keypair.
pub fn keypair_from_mnemonic(phrase: &str) -> Result<KeyPair, MnemonicError> {
    let mnemonic = Bip39Mnemonic::parse_normalized(&normalize(phrase))
        .map_err(|e| MnemonicError::InvalidMnemonic(e.to_string()))?;

    let seed = Zeroizing::new(mnemonic.to_seed_normalized(""));
    let path = parse_derivation_path(SOLANA_DERIVATION_PATH)?;
    let node = derive_ed25519(&seed[..], &path)?;

    Ok(keypair_from_private(PrivateKey(node.key)))
}
