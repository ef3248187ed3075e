//! Subcommand handlers. Each builds a session over the on-disk credential
//! store, runs one operation and prints the outcome.

use std::io::{self, BufRead, Write};

use anyhow::{bail, Context};
use solvault_store_lmdb::LmdbCredentialStore;
use solvault_types::Asset;
use solvault_wallet_core::{SessionState, WalletConfig, WalletSession};

#[derive(clap::Subcommand)]
pub enum Command {
    /// Generate a new 24-word wallet. The phrase is saved only after you confirm it.
    Create {
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
    /// Import an existing mnemonic, read from standard input.
    Import,
    /// Print the wallet address.
    Address,
    /// Show balances: SOL and every configured token, or a single asset.
    Balance {
        /// "SOL" or a configured token symbol.
        #[arg(long)]
        asset: Option<String>,
    },
    /// Transfer SOL or a configured token and wait for confirmation.
    Send {
        /// Recipient address (base58).
        to: String,
        /// Amount in display units, e.g. "0.5".
        amount: String,
        /// "SOL" or a configured token symbol.
        #[arg(long, default_value = "SOL")]
        asset: String,
    },
    /// Request test SOL from the cluster faucet (not available on mainnet).
    Airdrop,
    /// Erase the stored mnemonic from this machine.
    Logout,
    /// Print the effective configuration as TOML.
    Config,
}

type Session = WalletSession<LmdbCredentialStore>;

pub async fn run(command: Command, config: WalletConfig) -> anyhow::Result<()> {
    match command {
        Command::Config => {
            print!("{}", config.to_toml_string()?);
            Ok(())
        }
        Command::Create { yes } => {
            let (session, state) = open_session(config)?;
            create(&session, state, yes)
        }
        Command::Import => {
            let (session, state) = open_session(config)?;
            import(&session, state)
        }
        Command::Address => {
            let session = open_wallet(config)?;
            if let Some(address) = session.public_key() {
                println!("{address}");
            }
            Ok(())
        }
        Command::Balance { asset } => {
            let session = open_wallet(config)?;
            session.connect().await?;
            balance(&session, asset.as_deref()).await
        }
        Command::Send { to, amount, asset } => {
            let session = open_wallet(config)?;
            session.connect().await?;
            let asset = Asset::from_symbol(&asset);
            let signature = session.send(&to, &asset, &amount).await?;
            println!("sent {amount} {asset} to {to}");
            println!("signature: {signature}");
            Ok(())
        }
        Command::Airdrop => {
            let session = open_wallet(config)?;
            session.connect().await?;
            let signature = session.request_test_funds().await?;
            println!("airdrop confirmed: {signature}");
            Ok(())
        }
        Command::Logout => {
            let session = open_wallet(config)?;
            session.logout()?;
            println!("wallet removed from this machine");
            Ok(())
        }
    }
}

fn open_session(config: WalletConfig) -> anyhow::Result<(Session, SessionState)> {
    let store = LmdbCredentialStore::open(&config.data_dir)
        .with_context(|| format!("opening credential store in {}", config.data_dir.display()))?;
    let session = WalletSession::new(config, store);
    let state = session.start()?;
    Ok((session, state))
}

/// Open the store and require a loaded wallet.
fn open_wallet(config: WalletConfig) -> anyhow::Result<Session> {
    let (session, state) = open_session(config)?;
    if state != SessionState::Active {
        bail!("no wallet on this machine; run `solvault create` or `solvault import` first");
    }
    Ok(session)
}

fn require_empty(state: SessionState) -> anyhow::Result<()> {
    if state == SessionState::Active {
        bail!("a wallet already exists; run `solvault logout` first");
    }
    Ok(())
}

fn create(session: &Session, state: SessionState, yes: bool) -> anyhow::Result<()> {
    require_empty(state)?;
    let mnemonic = session.create_new()?;

    println!("Write down these words in order. They are the only way to recover this wallet.\n");
    for (i, word) in mnemonic.as_str().split(' ').enumerate() {
        println!("{:>2}. {word}", i + 1);
    }
    println!();

    if !yes && !prompt_yes("Saved the phrase? Type 'yes' to store the wallet: ")? {
        session.abandon()?;
        println!("aborted; nothing was stored");
        return Ok(());
    }
    let address = session.confirm()?;
    println!("wallet created: {address}");
    Ok(())
}

fn import(session: &Session, state: SessionState) -> anyhow::Result<()> {
    require_empty(state)?;
    eprint!("Enter your mnemonic phrase: ");
    io::stderr().flush()?;
    let mut phrase = String::new();
    io::stdin().lock().read_line(&mut phrase)?;
    let address = session.import(&phrase)?;
    println!("wallet imported: {address}");
    Ok(())
}

async fn balance(session: &Session, asset: Option<&str>) -> anyhow::Result<()> {
    if let Some(symbol) = asset {
        let asset = Asset::from_symbol(symbol);
        let balance = session.get_balance(&asset).await?;
        println!("{balance} {asset}");
        return Ok(());
    }
    for row in session.get_all_balances().await? {
        match row.balance {
            Ok(balance) => println!("{:<6} {balance}", row.asset.symbol()),
            Err(e) => println!("{:<6} unavailable ({e})", row.asset.symbol()),
        }
    }
    Ok(())
}

fn prompt_yes(question: &str) -> anyhow::Result<bool> {
    eprint!("{question}");
    io::stderr().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(answer.trim().eq_ignore_ascii_case("yes"))
}
