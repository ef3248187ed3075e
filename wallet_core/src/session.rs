//! The wallet session: sole owner of the live signing key.
//!
//! State machine:
//!
//! ```text
//! Uninitialized ──start──▶ Active                      (credential found)
//!               ──start──▶ AwaitingImportOrCreate      (none found)
//! AwaitingImportOrCreate ──import──▶ Active
//!                        ──create_new──▶ AwaitingConfirmation
//! AwaitingConfirmation ──confirm──▶ Active
//!                      ──abandon──▶ AwaitingImportOrCreate
//! Active ──logout──▶ AwaitingImportOrCreate
//! ```
//!
//! All methods take `&self`. The state lock is held only for in-memory work
//! and credential store calls, never across an `.await`. Each transition
//! bumps a generation counter; network operations record the generation
//! before awaiting and discard their result with
//! [`WalletError::SessionChanged`] if it moved in the meantime.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use solvault_crypto::{generate_mnemonic, Mnemonic};
use solvault_rpc::{ChainClient, HttpRpcClient, RpcError};
use solvault_store::CredentialStore;
use solvault_transactions::{system, token, Instruction, Message, SignedTransaction};
use solvault_types::{
    parse_ui_amount, Asset, Balance, Blockhash, Commitment, KeyPair, PublicKey, Signature, TokenDescriptor,
    SOL_DECIMALS,
};
use tracing::{debug, info, warn};

use crate::connection::{ActiveConnection, ConnectionManager};
use crate::{WalletConfig, WalletError};

/// Externally visible session state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    AwaitingImportOrCreate,
    AwaitingConfirmation,
    Active,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::AwaitingImportOrCreate => "awaiting import or create",
            Self::AwaitingConfirmation => "awaiting confirmation",
            Self::Active => "active",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of [`WalletSession::get_all_balances`].
#[derive(Debug)]
pub struct AssetBalance {
    pub asset: Asset,
    pub balance: Result<Balance, WalletError>,
}

enum Phase {
    Uninitialized,
    AwaitingImportOrCreate,
    AwaitingConfirmation { pending: Mnemonic },
    Active { keypair: KeyPair },
}

impl Phase {
    fn state(&self) -> SessionState {
        match self {
            Phase::Uninitialized => SessionState::Uninitialized,
            Phase::AwaitingImportOrCreate => SessionState::AwaitingImportOrCreate,
            Phase::AwaitingConfirmation { .. } => SessionState::AwaitingConfirmation,
            Phase::Active { .. } => SessionState::Active,
        }
    }
}

struct Inner {
    phase: Phase,
    generation: u64,
    connection: Option<ActiveConnection>,
}

impl Inner {
    fn transition(&mut self, phase: Phase) {
        let from = self.phase.state();
        self.phase = phase;
        self.generation += 1;
        debug!(%from, to = %self.phase.state(), generation = self.generation, "session transition");
    }

    fn require(&self, expected: SessionState) -> Result<(), WalletError> {
        let current = self.phase.state();
        if current == expected {
            Ok(())
        } else {
            Err(WalletError::InvalidState(current.as_str()))
        }
    }
}

/// What a network operation needs, captured under the lock before awaiting.
struct Snapshot {
    owner: PublicKey,
    generation: u64,
    client: Arc<dyn ChainClient>,
}

pub struct WalletSession<S: CredentialStore> {
    config: WalletConfig,
    store: S,
    inner: Mutex<Inner>,
}

impl<S: CredentialStore> WalletSession<S> {
    pub fn new(config: WalletConfig, store: S) -> Self {
        Self {
            config,
            store,
            inner: Mutex::new(Inner {
                phase: Phase::Uninitialized,
                generation: 0,
                connection: None,
            }),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn state(&self) -> SessionState {
        self.lock().phase.state()
    }

    /// The active wallet's address, if a key is loaded.
    pub fn public_key(&self) -> Option<PublicKey> {
        match &self.lock().phase {
            Phase::Active { keypair } => Some(keypair.public),
            _ => None,
        }
    }

    /// Endpoint of the installed connection, if any.
    pub fn endpoint(&self) -> Option<String> {
        self.lock().connection.as_ref().map(|c| c.endpoint.clone())
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ── Lifecycle ──────────────────────────────────────────────────────

    /// Load the stored credential, if any.
    pub fn start(&self) -> Result<SessionState, WalletError> {
        let mut inner = self.lock();
        inner.require(SessionState::Uninitialized)?;

        let next = match self.store.load()? {
            Some(mnemonic) => match mnemonic.to_keypair() {
                Ok(keypair) => {
                    info!(address = %keypair.public, "restored wallet from stored credential");
                    Phase::Active { keypair }
                }
                Err(e) => {
                    warn!(error = %e, "stored credential could not be derived");
                    Phase::AwaitingImportOrCreate
                }
            },
            None => {
                info!("no stored credential");
                Phase::AwaitingImportOrCreate
            }
        };
        inner.transition(next);
        Ok(inner.phase.state())
    }

    /// Adopt an existing mnemonic. Nothing changes unless it validates and persists.
    pub fn import(&self, phrase: &str) -> Result<PublicKey, WalletError> {
        let mnemonic = Mnemonic::parse(phrase)?;
        let keypair = mnemonic.to_keypair()?;

        let mut inner = self.lock();
        inner.require(SessionState::AwaitingImportOrCreate)?;
        self.store.save(&mnemonic)?;
        let address = keypair.public;
        inner.transition(Phase::Active { keypair });
        info!(address = %address, "wallet imported");
        Ok(address)
    }

    /// Generate a fresh mnemonic and hold it until [`Self::confirm`]. The
    /// returned phrase is for display; nothing is persisted yet.
    pub fn create_new(&self) -> Result<Mnemonic, WalletError> {
        let mut inner = self.lock();
        inner.require(SessionState::AwaitingImportOrCreate)?;
        let mnemonic = generate_mnemonic()?;
        inner.transition(Phase::AwaitingConfirmation {
            pending: mnemonic.clone(),
        });
        Ok(mnemonic)
    }

    /// Persist the pending mnemonic and activate it.
    pub fn confirm(&self) -> Result<PublicKey, WalletError> {
        let mut inner = self.lock();
        let Phase::AwaitingConfirmation { pending } = &inner.phase else {
            return Err(WalletError::InvalidState(inner.phase.state().as_str()));
        };
        let keypair = pending.to_keypair()?;
        self.store.save(pending)?;
        let address = keypair.public;
        inner.transition(Phase::Active { keypair });
        info!(address = %address, "new wallet confirmed");
        Ok(address)
    }

    /// Discard the pending mnemonic.
    pub fn abandon(&self) -> Result<(), WalletError> {
        let mut inner = self.lock();
        inner.require(SessionState::AwaitingConfirmation)?;
        inner.transition(Phase::AwaitingImportOrCreate);
        info!("pending mnemonic discarded");
        Ok(())
    }

    /// Erase the stored credential and drop the key.
    pub fn logout(&self) -> Result<(), WalletError> {
        let mut inner = self.lock();
        inner.require(SessionState::Active)?;
        self.store.clear()?;
        inner.transition(Phase::AwaitingImportOrCreate);
        info!("logged out");
        Ok(())
    }

    // ── Connection ─────────────────────────────────────────────────────

    /// Connect over HTTP JSON-RPC to the first live configured endpoint.
    pub async fn connect(&self) -> Result<ActiveConnection, WalletError> {
        let timeout = self.config.request_timeout();
        let commitment = self.config.commitment;
        self.connect_with(|url| {
            HttpRpcClient::new(url, timeout, commitment).map(|c| Arc::new(c) as Arc<dyn ChainClient>)
        })
        .await
    }

    /// Connect using `open` to build a client for each candidate endpoint.
    pub async fn connect_with<F>(&self, open: F) -> Result<ActiveConnection, WalletError>
    where
        F: Fn(&str) -> Result<Arc<dyn ChainClient>, RpcError>,
    {
        let manager = ConnectionManager::new(
            self.config.resolved_endpoints(),
            self.config.probe_timeout(),
            self.config.failover_backoff(),
        );
        let connection = manager.connect(open).await?;
        self.lock().connection = Some(connection.clone());
        Ok(connection)
    }

    fn snapshot(&self) -> Result<Snapshot, WalletError> {
        let inner = self.lock();
        let Phase::Active { keypair } = &inner.phase else {
            return Err(WalletError::InvalidState(inner.phase.state().as_str()));
        };
        let connection = inner.connection.as_ref().ok_or(WalletError::NotConnected)?;
        Ok(Snapshot {
            owner: keypair.public,
            generation: inner.generation,
            client: connection.client.clone(),
        })
    }

    fn ensure_generation(&self, generation: u64) -> Result<(), WalletError> {
        if self.lock().generation == generation {
            Ok(())
        } else {
            Err(WalletError::SessionChanged)
        }
    }

    /// `None` for the native asset, otherwise the configured descriptor.
    fn resolve_asset(&self, asset: &Asset) -> Result<Option<&TokenDescriptor>, WalletError> {
        match asset {
            Asset::Native => Ok(None),
            Asset::Token(symbol) => self
                .config
                .token(symbol)
                .map(Some)
                .ok_or_else(|| WalletError::UnknownAsset(symbol.clone())),
        }
    }

    // ── Queries ────────────────────────────────────────────────────────

    pub async fn get_balance(&self, asset: &Asset) -> Result<Balance, WalletError> {
        let token = self.resolve_asset(asset)?;
        let snap = self.snapshot()?;
        let balance = fetch_balance(snap.client.as_ref(), &snap.owner, token).await?;
        self.ensure_generation(snap.generation)?;
        Ok(balance)
    }

    /// SOL followed by every configured token. Each row fails individually.
    pub async fn get_all_balances(&self) -> Result<Vec<AssetBalance>, WalletError> {
        let snap = self.snapshot()?;
        let client = snap.client.as_ref();
        let assets = std::iter::once((Asset::Native, None)).chain(
            self.config
                .tokens
                .iter()
                .map(|t| (Asset::Token(t.symbol.to_uppercase()), Some(t))),
        );
        let mut rows = Vec::with_capacity(self.config.tokens.len() + 1);
        for (asset, token) in assets {
            let balance = fetch_balance(client, &snap.owner, token).await;
            if let Err(e) = &balance {
                warn!(%asset, error = %e, "balance lookup failed");
            }
            rows.push(AssetBalance { asset, balance });
        }
        self.ensure_generation(snap.generation)?;
        Ok(rows)
    }

    // ── Transfers ──────────────────────────────────────────────────────

    /// Transfer `amount` (a decimal string in display units) of `asset` to
    /// `destination` and wait for confirmation.
    ///
    /// The recipient and amount are validated before any network call. Once
    /// the transaction has been submitted its signature is returned even if
    /// the session changes during the confirmation wait.
    pub async fn send(
        &self,
        destination: &str,
        asset: &Asset,
        amount: &str,
    ) -> Result<Signature, WalletError> {
        let recipient = PublicKey::from_base58(destination.trim())
            .map_err(|e| WalletError::InvalidRecipient(e.to_string()))?;
        let token = self.resolve_asset(asset)?;
        let configured_decimals = token.map_or(SOL_DECIMALS, |t| t.decimals);
        let raw = parse_amount(amount, configured_decimals)?;
        let snap = self.snapshot()?;

        let client = snap.client.as_ref();
        let instruction = match token {
            None => system::transfer(&snap.owner, &recipient, raw)?,
            Some(token) => {
                token_transfer(client, &snap.owner, &recipient, token, amount, raw).await?
            }
        };
        let blockhash = client.get_latest_blockhash().await?;
        let tx = self.sign_current(snap.generation, instruction, blockhash)?;
        let wire = tx.to_wire()?;

        let signature = client
            .send_transaction(&wire)
            .await
            .map_err(WalletError::from_submission)?;
        info!(%signature, to = %recipient, asset = %asset, amount, "transfer submitted");

        self.await_confirmation(client, &signature).await?;
        info!(%signature, "transfer confirmed");
        Ok(signature)
    }

    /// Build, check generation and sign under one lock.
    fn sign_current(
        &self,
        generation: u64,
        instruction: Instruction,
        blockhash: Blockhash,
    ) -> Result<SignedTransaction, WalletError> {
        let inner = self.lock();
        if inner.generation != generation {
            return Err(WalletError::SessionChanged);
        }
        let Phase::Active { keypair } = &inner.phase else {
            return Err(WalletError::SessionChanged);
        };
        let message = Message::compile(&keypair.public, &[instruction], blockhash)?;
        Ok(SignedTransaction::sign(&message, keypair)?)
    }

    /// Ask the cluster faucet for the configured grant and wait for it to land.
    pub async fn request_test_funds(&self) -> Result<Signature, WalletError> {
        let network = self.config.network;
        if network.is_production() {
            return Err(WalletError::FaucetUnavailable(network.to_string()));
        }
        let snap = self.snapshot()?;
        let lamports = self.config.airdrop_lamports;
        let client = snap.client.as_ref();
        let signature = client.request_airdrop(&snap.owner, lamports).await?;
        info!(%signature, address = %snap.owner, lamports, "airdrop requested");
        self.await_confirmation(client, &signature).await?;
        Ok(signature)
    }

    /// Poll until the configured commitment is reached, the transaction fails,
    /// or the confirmation timeout elapses.
    async fn await_confirmation(
        &self,
        client: &dyn ChainClient,
        signature: &Signature,
    ) -> Result<(), WalletError> {
        let target = self.config.commitment;
        let interval = self.config.confirm_poll_interval();
        let timeout = self.config.confirm_timeout();

        let poll = poll_until(client, signature, target, interval);
        tokio::time::timeout(timeout, poll).await.map_err(|_| {
            WalletError::Timeout(format!(
                "transaction {signature} not {target} after {}s",
                timeout.as_secs()
            ))
        })?
    }
}

async fn poll_until(
    client: &dyn ChainClient,
    signature: &Signature,
    target: Commitment,
    interval: Duration,
) -> Result<(), WalletError> {
    loop {
        if let Some(status) = client.get_signature_status(signature).await? {
            if let Some(err) = status.err {
                return Err(WalletError::Submission(format!(
                    "transaction {signature} failed: {err}"
                )));
            }
            if status.reached(target) {
                return Ok(());
            }
            debug!(%signature, slot = status.slot, confirmation = ?status.confirmation, "awaiting {target}");
        }
        tokio::time::sleep(interval).await;
    }
}

async fn fetch_balance(
    client: &dyn ChainClient,
    owner: &PublicKey,
    token: Option<&TokenDescriptor>,
) -> Result<Balance, WalletError> {
    let Some(token) = token else {
        return Ok(Balance::lamports(client.get_balance(owner).await?));
    };
    Ok(match client.get_token_account(owner, &token.mint).await? {
        Some(account) => Balance::new(account.amount, account.decimals),
        None => Balance::zero(token.decimals),
    })
}

/// Resolve both token accounts and the mint's on-chain precision, then
/// build the SPL transfer.
async fn token_transfer(
    client: &dyn ChainClient,
    owner: &PublicKey,
    recipient: &PublicKey,
    token: &TokenDescriptor,
    amount: &str,
    configured_raw: u64,
) -> Result<Instruction, WalletError> {
    let decimals = client.get_mint_decimals(&token.mint).await?;
    let raw = if decimals == token.decimals {
        configured_raw
    } else {
        warn!(token = %token.symbol, configured = token.decimals, on_chain = decimals, "mint precision differs from configuration");
        parse_amount(amount, decimals)?
    };

    let source = client
        .get_token_account(owner, &token.mint)
        .await?
        .ok_or_else(|| {
            WalletError::InsufficientFunds(format!("no {} account for {owner}", token.symbol))
        })?;
    let destination = client
        .get_token_account(recipient, &token.mint)
        .await?
        .ok_or_else(|| {
            WalletError::Submission(format!(
                "recipient {recipient} has no {} token account",
                token.symbol
            ))
        })?;
    Ok(token::transfer(&source.address, &destination.address, owner, raw)?)
}

fn parse_amount(amount: &str, decimals: u8) -> Result<u64, WalletError> {
    parse_ui_amount(amount.trim(), decimals).map_err(|e| WalletError::InvalidAmount(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use solvault_nullables::NullCredentialStore;

    fn session() -> WalletSession<NullCredentialStore> {
        WalletSession::new(WalletConfig::default(), NullCredentialStore::new())
    }

    #[test]
    fn starts_uninitialized() {
        let s = session();
        assert_eq!(s.state(), SessionState::Uninitialized);
        assert!(s.public_key().is_none());
    }

    #[test]
    fn operations_before_start_are_rejected() {
        let s = session();
        assert!(matches!(s.create_new(), Err(WalletError::InvalidState(_))));
        assert!(matches!(s.logout(), Err(WalletError::InvalidState(_))));
        assert!(matches!(s.confirm(), Err(WalletError::InvalidState(_))));
    }

    #[test]
    fn transitions_bump_generation() {
        let s = session();
        s.start().unwrap();
        let g1 = s.lock().generation;
        s.create_new().unwrap();
        s.abandon().unwrap();
        assert_eq!(s.lock().generation, g1 + 2);
    }

    #[test]
    fn amount_parsing_keeps_precision() {
        assert_eq!(parse_amount("0.000000001", 9).unwrap(), 1);
        assert_eq!(parse_amount(" 1.5 ", 6).unwrap(), 1_500_000);
        assert!(matches!(parse_amount("0.0000001", 6), Err(WalletError::InvalidAmount(_))));
        assert!(matches!(parse_amount("abc", 9), Err(WalletError::InvalidAmount(_))));
    }
}
