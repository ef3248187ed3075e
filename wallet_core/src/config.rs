//! Wallet configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use solvault_types::{Commitment, NetworkId, PublicKey, TokenDescriptor, LAMPORTS_PER_SOL};
use solvault_utils::LogFormat;

use crate::WalletError;

/// Configuration for a wallet installation.
///
/// Loaded once at startup via [`WalletConfig::from_toml_file`] (or built
/// programmatically for tests) and never mutated afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WalletConfig {
    /// Which cluster to talk to.
    #[serde(default = "default_network")]
    pub network: NetworkId,

    /// Candidate endpoints, tried in order. Empty means the network's defaults.
    #[serde(default)]
    pub endpoints: Vec<String>,

    /// Commitment used for queries and as the confirmation target.
    #[serde(default = "default_commitment")]
    pub commitment: Commitment,

    /// Directory holding the credential database.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Upper bound on each liveness probe.
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,

    /// Pause between a failed probe and the next endpoint.
    #[serde(default = "default_failover_backoff_ms")]
    pub failover_backoff_ms: u64,

    /// Upper bound on any single RPC request.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// How long to wait for a submitted transaction to reach `commitment`.
    #[serde(default = "default_confirm_timeout_secs")]
    pub confirm_timeout_secs: u64,

    #[serde(default = "default_confirm_poll_interval_ms")]
    pub confirm_poll_interval_ms: u64,

    /// Faucet grant, in lamports.
    #[serde(default = "default_airdrop_lamports")]
    pub airdrop_lamports: u64,

    /// Recognised SPL tokens.
    #[serde(default = "default_tokens")]
    pub tokens: Vec<TokenDescriptor>,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_network() -> NetworkId {
    NetworkId::Devnet
}

fn default_commitment() -> Commitment {
    Commitment::Confirmed
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./solvault_data")
}

fn default_probe_timeout_ms() -> u64 {
    5_000
}

fn default_failover_backoff_ms() -> u64 {
    500
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_confirm_timeout_secs() -> u64 {
    60
}

fn default_confirm_poll_interval_ms() -> u64 {
    1_000
}

fn default_airdrop_lamports() -> u64 {
    2 * LAMPORTS_PER_SOL
}

fn default_tokens() -> Vec<TokenDescriptor> {
    // Mainnet mints of the two stablecoins the wallet lists out of the box.
    vec![
        TokenDescriptor::new(
            "USDC",
            PublicKey::new([
                198, 250, 122, 243, 190, 219, 173, 58, 61, 101, 243, 106, 171, 201, 116, 49, 177,
                187, 228, 194, 210, 246, 224, 228, 124, 166, 2, 3, 69, 47, 93, 97,
            ]),
            6,
        ),
        TokenDescriptor::new(
            "USDT",
            PublicKey::new([
                206, 1, 14, 96, 175, 237, 178, 39, 23, 189, 99, 25, 47, 84, 20, 90, 63, 150, 90,
                51, 187, 130, 210, 199, 2, 158, 178, 206, 30, 32, 130, 100,
            ]),
            6,
        ),
    ]
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl WalletConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, WalletError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| WalletError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, WalletError> {
        let config: Self = toml::from_str(s).map_err(|e| WalletError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, WalletError> {
        toml::to_string_pretty(self).map_err(|e| WalletError::Config(e.to_string()))
    }

    /// Reject values that would make the wallet unusable.
    pub fn validate(&self) -> Result<(), WalletError> {
        let durations = [
            ("probe_timeout_ms", self.probe_timeout_ms),
            ("request_timeout_secs", self.request_timeout_secs),
            ("confirm_timeout_secs", self.confirm_timeout_secs),
            ("confirm_poll_interval_ms", self.confirm_poll_interval_ms),
        ];
        if let Some((name, _)) = durations.iter().find(|(_, value)| *value == 0) {
            return Err(WalletError::Config(format!("{name} must be positive")));
        }
        let mut seen = std::collections::HashSet::new();
        for token in &self.tokens {
            if token.symbol.eq_ignore_ascii_case("SOL") {
                return Err(WalletError::Config("SOL is the native asset, not a token".into()));
            }
            if !seen.insert(token.symbol.to_uppercase()) {
                return Err(WalletError::Config(format!(
                    "token {} configured twice",
                    token.symbol
                )));
            }
        }
        Ok(())
    }

    /// The endpoint pool: configured endpoints, or the network's defaults when none are set.
    pub fn resolved_endpoints(&self) -> Vec<String> {
        if self.endpoints.is_empty() {
            self.network
                .default_endpoints()
                .iter()
                .map(|e| e.to_string())
                .collect()
        } else {
            self.endpoints.clone()
        }
    }

    /// Look up a configured token by symbol, case-insensitively.
    pub fn token(&self, symbol: &str) -> Option<&TokenDescriptor> {
        self.tokens
            .iter()
            .find(|t| t.symbol.eq_ignore_ascii_case(symbol))
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    pub fn failover_backoff(&self) -> Duration {
        Duration::from_millis(self.failover_backoff_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn confirm_timeout(&self) -> Duration {
        Duration::from_secs(self.confirm_timeout_secs)
    }

    pub fn confirm_poll_interval(&self) -> Duration {
        Duration::from_millis(self.confirm_poll_interval_ms)
    }
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            network: default_network(),
            endpoints: Vec::new(),
            commitment: default_commitment(),
            data_dir: default_data_dir(),
            probe_timeout_ms: default_probe_timeout_ms(),
            failover_backoff_ms: default_failover_backoff_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            confirm_timeout_secs: default_confirm_timeout_secs(),
            confirm_poll_interval_ms: default_confirm_poll_interval_ms(),
            airdrop_lamports: default_airdrop_lamports(),
            tokens: default_tokens(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
        }
    }
}
