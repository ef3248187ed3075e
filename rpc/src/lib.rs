//! Chain access for the Solvault wallet.
//!
//! [`ChainClient`] is the narrow capability the wallet session talks to:
//! liveness, balances, token accounts, blockhashes, submission, confirmation
//! status and faucet requests. [`HttpRpcClient`] implements it over Solana's
//! JSON-RPC 2.0 HTTP interface.

pub mod client;
pub mod error;
pub mod http;
pub mod types;

pub use client::ChainClient;
pub use error::RpcError;
pub use http::HttpRpcClient;
pub use types::{NodeVersion, SignatureStatus, TokenAccount};
