//! Response shapes returned by [`ChainClient`](crate::ChainClient) and the
//! raw JSON-RPC payloads they are decoded from.

use serde::Deserialize;
use solvault_types::{Commitment, PublicKey};

/// `getVersion` result.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NodeVersion {
    #[serde(rename = "solana-core")]
    pub solana_core: String,
    #[serde(rename = "feature-set", default)]
    pub feature_set: Option<u64>,
}

/// A token account owned by the wallet for a particular mint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenAccount {
    pub address: PublicKey,
    /// Balance in base units.
    pub amount: u64,
    pub decimals: u8,
}

/// Where a submitted transaction stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureStatus {
    pub slot: u64,
    /// Highest commitment reached so far, if reported.
    pub confirmation: Option<Commitment>,
    /// Execution error rendered as text; `None` when the transaction succeeded.
    pub err: Option<String>,
}

impl SignatureStatus {
    /// Whether the transaction has reached at least `target`.
    pub fn reached(&self, target: Commitment) -> bool {
        self.confirmation.is_some_and(|c| c >= target)
    }
}

// ── Raw JSON-RPC payloads ──────────────────────────────────────────────

/// Envelope used by methods that return `{ context, value }`.
#[derive(Debug, Deserialize)]
pub(crate) struct WithContext<T> {
    pub value: T,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RpcErrorObject {
    pub code: i64,
    pub message: String,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RpcBlockhash {
    pub blockhash: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RpcTokenAmount {
    pub amount: String,
    pub decimals: u8,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RpcKeyedAccount {
    pub pubkey: String,
    pub account: RpcAccount,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RpcAccount {
    pub data: RpcParsedData,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RpcParsedData {
    pub parsed: RpcParsed,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RpcParsed {
    pub info: RpcTokenInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RpcTokenInfo {
    pub token_amount: RpcTokenAmount,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RpcSignatureStatus {
    pub slot: u64,
    #[serde(default)]
    pub err: Option<serde_json::Value>,
    #[serde(default)]
    pub confirmation_status: Option<Commitment>,
}

impl From<RpcSignatureStatus> for SignatureStatus {
    fn from(raw: RpcSignatureStatus) -> Self {
        Self {
            slot: raw.slot,
            confirmation: raw.confirmation_status,
            err: raw.err.filter(|e| !e.is_null()).map(|e| e.to_string()),
        }
    }
}
