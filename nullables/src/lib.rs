//! Nullable infrastructure for deterministic testing.
//!
//! The wallet reaches the outside world through two seams: the
//! [`ChainClient`](solvault_rpc::ChainClient) capability and the
//! [`CredentialStore`](solvault_store::CredentialStore) trait. This crate
//! provides in-memory implementations of both that:
//! - Return scripted, deterministic values
//! - Record every call for assertions
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod chain;
pub mod store;

pub use chain::{CallGate, NullChainClient};
pub use store::NullCredentialStore;
