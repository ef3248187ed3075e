//! Parse errors for the shared value types.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypesError {
    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    #[error("invalid blockhash: {0}")]
    InvalidBlockhash(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("unknown network: {0}")]
    UnknownNetwork(String),

    #[error("unknown commitment level: {0}")]
    UnknownCommitment(String),
}
