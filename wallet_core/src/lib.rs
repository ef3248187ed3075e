//! Wallet core library for Solvault.
//!
//! Provides everything a front end needs to run a wallet:
//! - **Configuration**: TOML-backed [`WalletConfig`], resolved once at startup
//! - **Connection manager**: ordered endpoint failover with liveness probes
//! - **Wallet session**: the credential lifecycle state machine, balance
//!   queries, transfers and faucet requests, all through `&self`

pub mod config;
pub mod connection;
pub mod error;
pub mod session;

pub use config::WalletConfig;
pub use connection::{ActiveConnection, ConnectionManager};
pub use error::WalletError;
pub use session::{AssetBalance, SessionState, WalletSession};
