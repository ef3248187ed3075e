//! [`ChainClient`] over Solana JSON-RPC 2.0 / HTTP.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use solvault_types::{Blockhash, Commitment, PublicKey, Signature};
use tracing::{debug, trace};

use crate::types::{
    RpcBlockhash, RpcErrorObject, RpcKeyedAccount, RpcSignatureStatus, RpcTokenAmount,
    WithContext,
};
use crate::{ChainClient, NodeVersion, RpcError, SignatureStatus, TokenAccount};

/// JSON-RPC client bound to a single endpoint.
pub struct HttpRpcClient {
    http: reqwest::Client,
    endpoint: String,
    commitment: Commitment,
    next_id: AtomicU64,
}

impl HttpRpcClient {
    /// Build a client for `endpoint`. Every request is bounded by `request_timeout`.
    pub fn new(
        endpoint: impl Into<String>,
        request_timeout: Duration,
        commitment: Commitment,
    ) -> Result<Self, RpcError> {
        let endpoint = endpoint.into();
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .connect_timeout(request_timeout)
            .build()
            .map_err(|e| RpcError::Transport {
                endpoint: endpoint.clone(),
                reason: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self {
            http,
            endpoint,
            commitment,
            next_id: AtomicU64::new(1),
        })
    }

    fn commitment_config(&self) -> Value {
        json!({ "commitment": self.commitment.as_str() })
    }

    /// Issue a single JSON-RPC call and decode its `result`.
    async fn rpc_call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T, RpcError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });
        trace!(endpoint = %self.endpoint, method, id, "rpc request");

        let response = self
            .http
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RpcError::Http {
                endpoint: self.endpoint.clone(),
                status: status.as_u16(),
            });
        }

        let json: Value = response
            .json()
            .await
            .map_err(|e| RpcError::InvalidResponse(format!("{method}: invalid JSON: {e}")))?;
        decode_response(method, json)
    }

    fn transport_error(&self, e: reqwest::Error) -> RpcError {
        if e.is_timeout() {
            RpcError::Timeout(self.endpoint.clone())
        } else {
            RpcError::Transport {
                endpoint: self.endpoint.clone(),
                reason: e.to_string(),
            }
        }
    }
}

/// Split a JSON-RPC response into its error object or decoded result.
fn decode_response<T: DeserializeOwned>(method: &str, mut json: Value) -> Result<T, RpcError> {
    if let Some(err) = json.get_mut("error").map(Value::take) {
        if !err.is_null() {
            let err: RpcErrorObject = serde_json::from_value(err)
                .map_err(|e| RpcError::InvalidResponse(format!("{method}: malformed error: {e}")))?;
            return Err(RpcError::Node {
                code: err.code,
                message: err.message,
                data: err.data.filter(|d| !d.is_null()).map(|d| d.to_string()),
            });
        }
    }
    let result = json
        .get_mut("result")
        .map(Value::take)
        .ok_or_else(|| RpcError::InvalidResponse(format!("{method}: missing result")))?;
    serde_json::from_value(result)
        .map_err(|e| RpcError::InvalidResponse(format!("{method}: unexpected result shape: {e}")))
}

/// A mint the node does not know has no accounts on this cluster.
fn token_accounts_or_empty(
    resp: Result<WithContext<Vec<RpcKeyedAccount>>, RpcError>,
    mint: &PublicKey,
) -> Result<Vec<RpcKeyedAccount>, RpcError> {
    match resp {
        Ok(resp) => Ok(resp.value),
        Err(e) if e.is_unknown_mint() => {
            debug!(mint = %mint, "mint unknown to this cluster; treating as no account");
            Ok(Vec::new())
        }
        Err(e) => Err(e),
    }
}

fn parse_token_account(raw: RpcKeyedAccount) -> Result<TokenAccount, RpcError> {
    let address = PublicKey::from_base58(&raw.pubkey)
        .map_err(|e| RpcError::InvalidResponse(format!("token account address: {e}")))?;
    let RpcTokenAmount { amount, decimals } = raw.account.data.parsed.info.token_amount;
    let amount = amount
        .parse::<u64>()
        .map_err(|e| RpcError::InvalidResponse(format!("token amount {amount:?}: {e}")))?;
    Ok(TokenAccount {
        address,
        amount,
        decimals,
    })
}

fn parse_signature(method: &str, s: &str) -> Result<Signature, RpcError> {
    Signature::from_base58(s).map_err(|e| RpcError::InvalidResponse(format!("{method}: {e}")))
}

#[async_trait]
impl ChainClient for HttpRpcClient {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn get_version(&self) -> Result<NodeVersion, RpcError> {
        self.rpc_call("getVersion", json!([])).await
    }

    async fn get_balance(&self, owner: &PublicKey) -> Result<u64, RpcError> {
        let resp: WithContext<u64> = self
            .rpc_call(
                "getBalance",
                json!([owner.to_base58(), self.commitment_config()]),
            )
            .await?;
        Ok(resp.value)
    }

    async fn get_token_account(
        &self,
        owner: &PublicKey,
        mint: &PublicKey,
    ) -> Result<Option<TokenAccount>, RpcError> {
        let resp = self
            .rpc_call(
                "getTokenAccountsByOwner",
                json!([
                    owner.to_base58(),
                    { "mint": mint.to_base58() },
                    { "encoding": "jsonParsed", "commitment": self.commitment.as_str() },
                ]),
            )
            .await;
        let mut accounts = token_accounts_or_empty(resp, mint)?.into_iter();
        let Some(first) = accounts.next() else {
            return Ok(None);
        };
        let extra = accounts.count();
        if extra > 0 {
            debug!(owner = %owner, mint = %mint, extra, "owner holds several accounts for mint; using the first");
        }
        parse_token_account(first).map(Some)
    }

    async fn get_mint_decimals(&self, mint: &PublicKey) -> Result<u8, RpcError> {
        let resp: WithContext<RpcTokenAmount> = self
            .rpc_call(
                "getTokenSupply",
                json!([mint.to_base58(), self.commitment_config()]),
            )
            .await?;
        Ok(resp.value.decimals)
    }

    async fn get_latest_blockhash(&self) -> Result<Blockhash, RpcError> {
        let resp: WithContext<RpcBlockhash> = self
            .rpc_call("getLatestBlockhash", json!([self.commitment_config()]))
            .await?;
        resp.value
            .blockhash
            .parse()
            .map_err(|e| RpcError::InvalidResponse(format!("getLatestBlockhash: {e}")))
    }

    async fn send_transaction(&self, wire: &[u8]) -> Result<Signature, RpcError> {
        let encoded = BASE64.encode(wire);
        let sig: String = self
            .rpc_call(
                "sendTransaction",
                json!([
                    encoded,
                    {
                        "encoding": "base64",
                        "preflightCommitment": self.commitment.as_str(),
                    },
                ]),
            )
            .await?;
        parse_signature("sendTransaction", &sig)
    }

    async fn get_signature_status(
        &self,
        signature: &Signature,
    ) -> Result<Option<SignatureStatus>, RpcError> {
        let resp: WithContext<Vec<Option<RpcSignatureStatus>>> = self
            .rpc_call(
                "getSignatureStatuses",
                json!([[signature.to_base58()], { "searchTransactionHistory": false }]),
            )
            .await?;
        Ok(resp
            .value
            .into_iter()
            .next()
            .flatten()
            .map(SignatureStatus::from))
    }

    async fn request_airdrop(&self, to: &PublicKey, lamports: u64) -> Result<Signature, RpcError> {
        let sig: String = self
            .rpc_call(
                "requestAirdrop",
                json!([to.to_base58(), lamports, self.commitment_config()]),
            )
            .await?;
        parse_signature("requestAirdrop", &sig)
    }
}
