//! Fundamental types for the Solvault wallet.
//!
//! This crate defines the value types shared across every other crate in the
//! workspace: public identifiers, key material, signatures, blockhashes,
//! amounts, network selection and token descriptors.

pub mod amount;
pub mod error;
pub mod hash;
pub mod keys;
pub mod network;
pub mod token;

pub use amount::{parse_ui_amount, Balance, LAMPORTS_PER_SOL, SOL_DECIMALS};
pub use error::TypesError;
pub use hash::Blockhash;
pub use keys::{KeyPair, PrivateKey, PublicKey, Signature};
pub use network::{Commitment, NetworkId};
pub use token::{Asset, TokenDescriptor};
