//! RPC error types.

use thiserror::Error;

/// Fragments the node uses when a transfer fails for lack of funds. Matched
/// case-insensitively against the error message and attached data.
const INSUFFICIENT_FUNDS_MARKERS: &[&str] = &[
    "insufficient funds",
    "insufficient lamports",
    "insufficientfundsforfee",
    "no record of a prior credit",
];

/// SPL Token reports insufficient funds as custom error 1.
const TOKEN_ERROR_PREFIX: &str = "custom program error: 0x";

/// JSON-RPC "invalid params".
const INVALID_PARAMS: i64 = -32602;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RpcError {
    #[error("request to {endpoint} failed: {reason}")]
    Transport { endpoint: String, reason: String },

    #[error("request to {0} timed out")]
    Timeout(String),

    #[error("{endpoint} returned HTTP {status}")]
    Http { endpoint: String, status: u16 },

    #[error("node error {code}: {message}")]
    Node {
        code: i64,
        message: String,
        data: Option<String>,
    },

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl RpcError {
    /// Whether the node rejected the request because an account lacks funds.
    pub fn is_insufficient_funds(&self) -> bool {
        let RpcError::Node { message, data, .. } = self else {
            return false;
        };
        let haystack = format!("{} {}", message, data.as_deref().unwrap_or_default()).to_lowercase();
        INSUFFICIENT_FUNDS_MARKERS
            .iter()
            .any(|marker| haystack.contains(marker))
            || haystack
                .match_indices(TOKEN_ERROR_PREFIX)
                .any(|(at, prefix)| custom_error_code(&haystack[at + prefix.len()..]) == Some(1))
    }

    /// Whether the node has never heard of the mint it was asked about. A
    /// cluster answers this way for mints that only exist on another cluster.
    pub fn is_unknown_mint(&self) -> bool {
        matches!(
            self,
            RpcError::Node { code: INVALID_PARAMS, message, .. }
                if message.to_lowercase().contains("could not find mint")
        )
    }
}

fn custom_error_code(tail: &str) -> Option<u64> {
    let digits: String = tail.chars().take_while(char::is_ascii_hexdigit).collect();
    u64::from_str_radix(&digits, 16).ok()
}
