//! Abstract storage traits for Solvault.
//!
//! Every storage backend (LMDB, in-memory for testing) implements these
//! traits. The wallet session depends only on the traits.

pub mod credential;
pub mod error;

pub use credential::{CredentialStore, CREDENTIAL_KEY};
pub use error::StoreError;
