//! Shared utilities for Solvault.

pub mod logging;

pub use logging::{init_logging, LogFormat};
