//! Recognised SPL tokens and the asset selector used by balance and send.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::PublicKey;

/// Maps a ticker symbol to its on-chain mint. Static configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenDescriptor {
    pub symbol: String,
    pub mint: PublicKey,
    /// Decimal places shown when the wallet holds no account for this mint yet.
    pub decimals: u8,
}

impl TokenDescriptor {
    pub fn new(symbol: impl Into<String>, mint: PublicKey, decimals: u8) -> Self {
        Self {
            symbol: symbol.into(),
            mint,
            decimals,
        }
    }
}

/// Which balance to read or which asset to move.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Asset {
    /// Native SOL.
    Native,
    /// An SPL token, by configured symbol.
    Token(String),
}

impl Asset {
    /// Parse a user-facing selector: `SOL` (any case) means native,
    /// anything else is a token symbol.
    pub fn from_symbol(symbol: &str) -> Self {
        if symbol.eq_ignore_ascii_case("SOL") {
            Self::Native
        } else {
            Self::Token(symbol.to_uppercase())
        }
    }

    pub fn symbol(&self) -> &str {
        match self {
            Self::Native => "SOL",
            Self::Token(s) => s,
        }
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
