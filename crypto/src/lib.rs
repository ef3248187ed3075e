//! Key custody primitives for the Solvault wallet.
//!
//! - **BIP39** mnemonic generation and checksum validation (24 words, 256-bit entropy)
//! - **SLIP-0010** hardened Ed25519 derivation along Solana's account path
//!   `m/44'/501'/0'/0'`
//! - **Ed25519** signing and verification

pub mod keys;
pub mod mnemonic;
pub mod sign;
pub mod slip10;

pub use keys::{keypair_from_private, keypair_from_seed, public_from_private};
pub use mnemonic::{
    generate_mnemonic, keypair_from_mnemonic, validate_mnemonic, Mnemonic, MnemonicError,
    SOLANA_DERIVATION_PATH,
};
pub use sign::{sign_message, verify_signature};
pub use slip10::{derive_ed25519, parse_derivation_path, ExtendedKey};
