//! LMDB storage backend for Solvault.
//!
//! Implements the storage traits from `solvault-store` using the `heed` LMDB
//! bindings. LMDB write transactions are atomic and durable on commit, which
//! gives the credential record its crash-safety.

pub mod credential;
pub mod environment;
pub mod error;

pub use credential::LmdbCredentialStore;
pub use environment::LmdbEnvironment;
pub use error::LmdbError;
