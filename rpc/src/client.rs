//! The chain capability trait.

use async_trait::async_trait;
use solvault_types::{Blockhash, PublicKey, Signature};

use crate::{NodeVersion, RpcError, SignatureStatus, TokenAccount};

/// Everything the wallet needs from a network endpoint.
///
/// Implementations do not retry: a failed call surfaces to the caller, who
/// decides whether to reconnect.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// URL this client is bound to.
    fn endpoint(&self) -> &str;

    /// Liveness probe.
    async fn get_version(&self) -> Result<NodeVersion, RpcError>;

    /// Native balance in lamports.
    async fn get_balance(&self, owner: &PublicKey) -> Result<u64, RpcError>;

    /// The owner's token account for `mint`, or `None` if it has none yet or
    /// the cluster does not know the mint.
    async fn get_token_account(
        &self,
        owner: &PublicKey,
        mint: &PublicKey,
    ) -> Result<Option<TokenAccount>, RpcError>;

    /// Decimal places of a mint.
    async fn get_mint_decimals(&self, mint: &PublicKey) -> Result<u8, RpcError>;

    async fn get_latest_blockhash(&self) -> Result<Blockhash, RpcError>;

    /// Submit a signed transaction in wire form. Returns its signature.
    async fn send_transaction(&self, wire: &[u8]) -> Result<Signature, RpcError>;

    /// Current status of a submitted transaction, `None` if the node has not seen it.
    async fn get_signature_status(
        &self,
        signature: &Signature,
    ) -> Result<Option<SignatureStatus>, RpcError>;

    /// Ask the cluster faucet for `lamports`. Only served by non-production clusters.
    async fn request_airdrop(&self, to: &PublicKey, lamports: u64) -> Result<Signature, RpcError>;
}
