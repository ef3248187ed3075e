//! Nullable chain client: scripted responses, recorded calls, no network.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use solvault_rpc::{ChainClient, NodeVersion, RpcError, SignatureStatus, TokenAccount};
use solvault_types::{Blockhash, Commitment, PublicKey, Signature};
use tokio::sync::Notify;

/// Pauses the next gated call (balance or blockhash lookup) until released.
///
/// Lets a test change session state while a request is in flight.
#[derive(Clone, Default)]
pub struct CallGate {
    entered: Arc<Notify>,
    release: Arc<Notify>,
}

impl CallGate {
    /// Resolves once a gated call is parked on this gate.
    pub async fn entered(&self) {
        self.entered.notified().await;
    }

    /// Let the parked call return.
    pub fn release(&self) {
        self.release.notify_one();
    }
}

struct ChainState {
    reachable: bool,
    version: String,
    balances: HashMap<PublicKey, u64>,
    token_accounts: HashMap<(PublicKey, PublicKey), TokenAccount>,
    mint_decimals: HashMap<PublicKey, u8>,
    unknown_mints: HashSet<PublicKey>,
    blockhash: Blockhash,
    send_error: Option<RpcError>,
    native_balance_error: Option<RpcError>,
    token_lookup_error: Option<RpcError>,
    airdrop_error: Option<RpcError>,
    scripted_statuses: VecDeque<Option<SignatureStatus>>,
    settled_status: Option<SignatureStatus>,
    gate: Option<CallGate>,
    calls: Vec<&'static str>,
    submitted: Vec<Vec<u8>>,
    airdrops: Vec<(PublicKey, u64)>,
    next_signature: u8,
}

/// An in-memory [`ChainClient`] for a single fake endpoint.
///
/// Defaults: reachable, zero balances, no token accounts, every submitted
/// transaction immediately finalized.
pub struct NullChainClient {
    endpoint: String,
    state: Mutex<ChainState>,
}

impl NullChainClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            state: Mutex::new(ChainState {
                reachable: true,
                version: "1.18.0".to_string(),
                balances: HashMap::new(),
                token_accounts: HashMap::new(),
                mint_decimals: HashMap::new(),
                unknown_mints: HashSet::new(),
                blockhash: Blockhash::new([7u8; 32]),
                send_error: None,
                native_balance_error: None,
                token_lookup_error: None,
                airdrop_error: None,
                scripted_statuses: VecDeque::new(),
                settled_status: Some(SignatureStatus {
                    slot: 1,
                    confirmation: Some(Commitment::Finalized),
                    err: None,
                }),
                gate: None,
                calls: Vec::new(),
                submitted: Vec::new(),
                airdrops: Vec::new(),
                next_signature: 1,
            }),
        }
    }

    /// An endpoint that fails every call with a transport error.
    pub fn unreachable(endpoint: impl Into<String>) -> Self {
        let client = Self::new(endpoint);
        client.set_reachable(false);
        client
    }

    pub fn set_reachable(&self, reachable: bool) {
        self.lock().reachable = reachable;
    }

    pub fn set_balance(&self, owner: PublicKey, lamports: u64) {
        self.lock().balances.insert(owner, lamports);
    }

    pub fn set_token_account(&self, owner: PublicKey, mint: PublicKey, account: TokenAccount) {
        self.lock().token_accounts.insert((owner, mint), account);
    }

    pub fn set_mint_decimals(&self, mint: PublicKey, decimals: u8) {
        self.lock().mint_decimals.insert(mint, decimals);
    }

    /// Fail every `send_transaction` with `err`.
    pub fn fail_sends_with(&self, err: RpcError) {
        self.lock().send_error = Some(err);
    }

    /// Behave like a cluster that has never seen `mint`: token account
    /// lookups find nothing and supply lookups fail with invalid params.
    pub fn forget_mint(&self, mint: PublicKey) {
        let mut state = self.lock();
        state.mint_decimals.remove(&mint);
        state.unknown_mints.insert(mint);
    }

    /// Fail every native balance lookup with `err`.
    pub fn fail_native_balance_with(&self, err: RpcError) {
        self.lock().native_balance_error = Some(err);
    }

    /// Fail every token account lookup with `err`.
    pub fn fail_token_lookups_with(&self, err: RpcError) {
        self.lock().token_lookup_error = Some(err);
    }

    pub fn fail_airdrops_with(&self, err: RpcError) {
        self.lock().airdrop_error = Some(err);
    }

    /// Statuses returned by successive `get_signature_status` calls. Once
    /// exhausted, the settled status (see [`Self::settle_with`]) is returned.
    pub fn script_statuses(&self, statuses: impl IntoIterator<Item = Option<SignatureStatus>>) {
        self.lock().scripted_statuses.extend(statuses);
    }

    /// Status returned after the scripted statuses run out.
    pub fn settle_with(&self, status: Option<SignatureStatus>) {
        self.lock().settled_status = status;
    }

    /// Park the next balance or blockhash call on a gate.
    pub fn gate_next(&self) -> CallGate {
        let gate = CallGate::default();
        self.lock().gate = Some(gate.clone());
        gate
    }

    /// Method names called so far, in order.
    pub fn calls(&self) -> Vec<&'static str> {
        self.lock().calls.clone()
    }

    /// Number of times `method` was called.
    pub fn call_count(&self, method: &str) -> usize {
        self.lock().calls.iter().filter(|c| **c == method).count()
    }

    /// Wire bytes of every transaction submitted.
    pub fn submitted(&self) -> Vec<Vec<u8>> {
        self.lock().submitted.clone()
    }

    pub fn airdrops(&self) -> Vec<(PublicKey, u64)> {
        self.lock().airdrops.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ChainState> {
        self.state.lock().unwrap()
    }

    /// Record the call and fail it if the endpoint is down.
    fn enter(&self, method: &'static str) -> Result<(), RpcError> {
        let mut state = self.lock();
        state.calls.push(method);
        if state.reachable {
            Ok(())
        } else {
            Err(RpcError::Transport {
                endpoint: self.endpoint.clone(),
                reason: "connection refused".to_string(),
            })
        }
    }

    async fn pass_gate(&self) {
        let gate = self.lock().gate.take();
        if let Some(gate) = gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }
    }

    fn fresh_signature(&self) -> Signature {
        let mut state = self.lock();
        let n = state.next_signature;
        state.next_signature = n.wrapping_add(1);
        Signature([n; 64])
    }
}

#[async_trait]
impl ChainClient for NullChainClient {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn get_version(&self) -> Result<NodeVersion, RpcError> {
        self.enter("getVersion")?;
        Ok(NodeVersion {
            solana_core: self.lock().version.clone(),
            feature_set: None,
        })
    }

    async fn get_balance(&self, owner: &PublicKey) -> Result<u64, RpcError> {
        self.enter("getBalance")?;
        self.pass_gate().await;
        let state = self.lock();
        if let Some(err) = &state.native_balance_error {
            return Err(err.clone());
        }
        Ok(state.balances.get(owner).copied().unwrap_or(0))
    }

    async fn get_token_account(
        &self,
        owner: &PublicKey,
        mint: &PublicKey,
    ) -> Result<Option<TokenAccount>, RpcError> {
        self.enter("getTokenAccountsByOwner")?;
        let state = self.lock();
        if let Some(err) = &state.token_lookup_error {
            return Err(err.clone());
        }
        if state.unknown_mints.contains(mint) {
            return Ok(None);
        }
        Ok(state.token_accounts.get(&(*owner, *mint)).cloned())
    }

    async fn get_mint_decimals(&self, mint: &PublicKey) -> Result<u8, RpcError> {
        self.enter("getTokenSupply")?;
        self.lock()
            .mint_decimals
            .get(mint)
            .copied()
            .ok_or_else(|| RpcError::Node {
                code: -32602,
                message: "Invalid param: could not find mint".to_string(),
                data: None,
            })
    }

    async fn get_latest_blockhash(&self) -> Result<Blockhash, RpcError> {
        self.enter("getLatestBlockhash")?;
        self.pass_gate().await;
        Ok(self.lock().blockhash)
    }

    async fn send_transaction(&self, wire: &[u8]) -> Result<Signature, RpcError> {
        self.enter("sendTransaction")?;
        {
            let mut state = self.lock();
            if let Some(err) = &state.send_error {
                return Err(err.clone());
            }
            state.submitted.push(wire.to_vec());
        }
        Ok(self.fresh_signature())
    }

    async fn get_signature_status(
        &self,
        _signature: &Signature,
    ) -> Result<Option<SignatureStatus>, RpcError> {
        self.enter("getSignatureStatuses")?;
        let mut state = self.lock();
        Ok(match state.scripted_statuses.pop_front() {
            Some(status) => status,
            None => state.settled_status.clone(),
        })
    }

    async fn request_airdrop(&self, to: &PublicKey, lamports: u64) -> Result<Signature, RpcError> {
        self.enter("requestAirdrop")?;
        {
            let mut state = self.lock();
            if let Some(err) = &state.airdrop_error {
                return Err(err.clone());
            }
            state.airdrops.push((*to, lamports));
        }
        Ok(self.fresh_signature())
    }
}
