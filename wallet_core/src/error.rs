use solvault_crypto::MnemonicError;
use solvault_rpc::RpcError;
use solvault_store::StoreError;
use solvault_transactions::TransactionError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    #[error("credential storage failed: {0}")]
    Storage(#[from] StoreError),

    #[error("no endpoint reachable ({attempted} tried)")]
    AllEndpointsUnreachable { attempted: usize },

    #[error("invalid recipient address: {0}")]
    InvalidRecipient(String),

    /// Carries the node's message unchanged.
    #[error("insufficient funds: {0}")]
    InsufficientFunds(String),

    #[error("transaction submission failed: {0}")]
    Submission(String),

    #[error("timed out: {0}")]
    Timeout(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("unknown asset {0}")]
    UnknownAsset(String),

    #[error("operation not allowed while {0}")]
    InvalidState(&'static str),

    #[error("not connected to any endpoint")]
    NotConnected,

    #[error("faucet unavailable on {0}")]
    FaucetUnavailable(String),

    #[error("session changed while the request was in flight")]
    SessionChanged,

    #[error("node RPC error: {0}")]
    Rpc(RpcError),

    #[error("configuration error: {0}")]
    Config(String),
}

impl From<MnemonicError> for WalletError {
    fn from(e: MnemonicError) -> Self {
        WalletError::InvalidMnemonic(e.to_string())
    }
}

impl From<RpcError> for WalletError {
    fn from(e: RpcError) -> Self {
        match e {
            RpcError::Timeout(endpoint) => WalletError::Timeout(format!("request to {endpoint}")),
            other => WalletError::Rpc(other),
        }
    }
}

impl From<TransactionError> for WalletError {
    fn from(e: TransactionError) -> Self {
        match e {
            TransactionError::ZeroAmount => WalletError::InvalidAmount(e.to_string()),
            other => WalletError::Submission(other.to_string()),
        }
    }
}

impl WalletError {
    /// Classify a failed `sendTransaction`: funds problems keep the node's
    /// wording, everything else is a submission failure.
    pub(crate) fn from_submission(e: RpcError) -> Self {
        let insufficient = e.is_insufficient_funds();
        match e {
            RpcError::Node { message, .. } if insufficient => WalletError::InsufficientFunds(message),
            RpcError::Timeout(endpoint) => {
                WalletError::Timeout(format!("submission to {endpoint}"))
            }
            other => WalletError::Submission(other.to_string()),
        }
    }
}
