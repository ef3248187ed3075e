//! Solvault command-line wallet.

mod commands;

use clap::Parser;
use solvault_types::{Commitment, NetworkId};
use solvault_utils::LogFormat;
use solvault_wallet_core::WalletConfig;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "solvault", version, about = "Solana wallet: keys, balances, transfers")]
struct Cli {
    /// Cluster: "mainnet-beta", "devnet", "testnet" or "localnet".
    /// Defaults to the config file's value, then devnet.
    #[arg(long, global = true, env = "SOLVAULT_NETWORK")]
    network: Option<NetworkId>,

    /// RPC endpoints to try in order (comma-separated). Replaces the configured list.
    #[arg(long, global = true, env = "SOLVAULT_ENDPOINTS", value_delimiter = ',')]
    endpoints: Vec<String>,

    /// Commitment level for queries and confirmation.
    #[arg(long, global = true, env = "SOLVAULT_COMMITMENT")]
    commitment: Option<Commitment>,

    /// Directory holding the credential database.
    #[arg(long, global = true, env = "SOLVAULT_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, global = true, env = "SOLVAULT_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, global = true, env = "SOLVAULT_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Path to a TOML configuration file. File settings are the base;
    /// CLI flags and env vars override them.
    #[arg(long, global = true, env = "SOLVAULT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: commands::Command,
}

impl Cli {
    fn resolve_config(&self) -> anyhow::Result<WalletConfig> {
        let base = match &self.config {
            Some(path) => WalletConfig::from_toml_file(path)?,
            None => WalletConfig::default(),
        };
        let config = WalletConfig {
            network: self.network.unwrap_or(base.network),
            endpoints: if self.endpoints.is_empty() {
                base.endpoints.clone()
            } else {
                self.endpoints.clone()
            },
            commitment: self.commitment.unwrap_or(base.commitment),
            data_dir: self.data_dir.clone().unwrap_or_else(|| base.data_dir.clone()),
            log_level: self.log_level.clone().unwrap_or_else(|| base.log_level.clone()),
            log_format: self.log_format.unwrap_or(base.log_format),
            ..base
        };
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;
    solvault_utils::init_logging(config.log_format, &config.log_level);

    if let Some(path) = &cli.config {
        tracing::debug!(path = %path.display(), "loaded config file");
    }
    tracing::debug!(network = %config.network, endpoints = ?config.resolved_endpoints(), "configuration resolved");

    commands::run(cli.command, config).await
}
