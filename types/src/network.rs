//! Network identifier and commitment level.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::TypesError;

/// Identifies which Solana cluster the wallet talks to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NetworkId {
    /// The production cluster.
    MainnetBeta,
    /// The public development cluster (faucet available).
    Devnet,
    /// The public test cluster (faucet available).
    Testnet,
    /// A local test validator.
    Localnet,
}

impl NetworkId {
    /// Public endpoints tried in order when the configuration lists none.
    pub fn default_endpoints(&self) -> &'static [&'static str] {
        match self {
            Self::MainnetBeta => &[
                "https://api.mainnet-beta.solana.com",
                "https://solana-mainnet.g.alchemy.com/v2/demo",
                "https://rpc.ankr.com/solana",
            ],
            Self::Devnet => &["https://api.devnet.solana.com", "https://rpc.ankr.com/solana_devnet"],
            Self::Testnet => &["https://api.testnet.solana.com"],
            Self::Localnet => &["http://127.0.0.1:8899"],
        }
    }

    /// Whether real value moves on this cluster. Faucet requests are refused here.
    pub fn is_production(&self) -> bool {
        matches!(self, Self::MainnetBeta)
    }

    /// Human-readable name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MainnetBeta => "mainnet-beta",
            Self::Devnet => "devnet",
            Self::Testnet => "testnet",
            Self::Localnet => "localnet",
        }
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NetworkId {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mainnet" | "mainnet-beta" => Ok(Self::MainnetBeta),
            "devnet" => Ok(Self::Devnet),
            "testnet" => Ok(Self::Testnet),
            "localnet" | "local" => Ok(Self::Localnet),
            other => Err(TypesError::UnknownNetwork(other.to_string())),
        }
    }
}

/// How settled a transaction must be before it counts as confirmed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Commitment {
    Processed,
    Confirmed,
    Finalized,
}

impl Commitment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Processed => "processed",
            Self::Confirmed => "confirmed",
            Self::Finalized => "finalized",
        }
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Commitment {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "processed" => Ok(Self::Processed),
            "confirmed" => Ok(Self::Confirmed),
            "finalized" => Ok(Self::Finalized),
            other => Err(TypesError::UnknownCommitment(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_network_names() {
        assert_eq!("mainnet".parse::<NetworkId>().unwrap(), NetworkId::MainnetBeta);
        assert_eq!("Devnet".parse::<NetworkId>().unwrap(), NetworkId::Devnet);
        assert!("moonnet".parse::<NetworkId>().is_err());
    }

    #[test]
    fn only_mainnet_is_production() {
        assert!(NetworkId::MainnetBeta.is_production());
        assert!(!NetworkId::Devnet.is_production());
        assert!(!NetworkId::Testnet.is_production());
        assert!(!NetworkId::Localnet.is_production());
    }

    #[test]
    fn every_network_has_endpoints() {
        for net in [
            NetworkId::MainnetBeta,
            NetworkId::Devnet,
            NetworkId::Testnet,
            NetworkId::Localnet,
        ] {
            assert!(!net.default_endpoints().is_empty());
        }
    }

    #[test]
    fn parse_commitment_names() {
        assert_eq!("Finalized".parse::<Commitment>().unwrap(), Commitment::Finalized);
        assert!("max".parse::<Commitment>().is_err());
    }

    #[test]
    fn commitment_ordering_follows_finality() {
        assert!(Commitment::Processed < Commitment::Confirmed);
        assert!(Commitment::Confirmed < Commitment::Finalized);
    }
}
