//! Ordered endpoint failover.
//!
//! The manager walks the endpoint pool once, in order, probing each endpoint
//! with `getVersion`. The first endpoint that answers wins; endpoints after
//! it are never contacted. Between failures it waits a fixed backoff. There
//! is no background health checking: once handed out, an
//! [`ActiveConnection`] is used until a caller decides to reconnect.

use std::sync::Arc;
use std::time::Duration;

use solvault_rpc::{ChainClient, NodeVersion, RpcError};
use tracing::{debug, info, warn};

use crate::WalletError;

/// A live link to one endpoint. Cheap to clone.
#[derive(Clone)]
pub struct ActiveConnection {
    pub endpoint: String,
    pub version: NodeVersion,
    pub client: Arc<dyn ChainClient>,
}

impl std::fmt::Debug for ActiveConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActiveConnection")
            .field("endpoint", &self.endpoint)
            .field("version", &self.version.solana_core)
            .finish()
    }
}

pub struct ConnectionManager {
    endpoints: Vec<String>,
    probe_timeout: Duration,
    backoff: Duration,
}

impl ConnectionManager {
    pub fn new(endpoints: Vec<String>, probe_timeout: Duration, backoff: Duration) -> Self {
        Self {
            endpoints,
            probe_timeout,
            backoff,
        }
    }

    /// Probe the pool in order and bind to the first endpoint that answers.
    ///
    /// `open` builds a client for an endpoint URL. Each endpoint is attempted
    /// exactly once.
    pub async fn connect<F>(&self, open: F) -> Result<ActiveConnection, WalletError>
    where
        F: Fn(&str) -> Result<Arc<dyn ChainClient>, RpcError>,
    {
        let total = self.endpoints.len();
        for (i, endpoint) in self.endpoints.iter().enumerate() {
            match self.probe(endpoint, &open).await {
                Ok((client, version)) => {
                    info!(endpoint = %endpoint, version = %version.solana_core, "connected");
                    return Ok(ActiveConnection {
                        endpoint: endpoint.clone(),
                        version,
                        client,
                    });
                }
                Err(reason) => {
                    warn!(endpoint = %endpoint, attempt = i + 1, total, %reason, "endpoint unreachable");
                    if i + 1 < total && !self.backoff.is_zero() {
                        debug!(backoff_ms = self.backoff.as_millis() as u64, "waiting before next endpoint");
                        tokio::time::sleep(self.backoff).await;
                    }
                }
            }
        }
        Err(WalletError::AllEndpointsUnreachable { attempted: total })
    }

    async fn probe<F>(
        &self,
        endpoint: &str,
        open: &F,
    ) -> Result<(Arc<dyn ChainClient>, NodeVersion), String>
    where
        F: Fn(&str) -> Result<Arc<dyn ChainClient>, RpcError>,
    {
        let client = open(endpoint).map_err(|e| e.to_string())?;
        match tokio::time::timeout(self.probe_timeout, client.get_version()).await {
            Ok(Ok(version)) => Ok((client, version)),
            Ok(Err(e)) => Err(e.to_string()),
            Err(_) => Err(format!("no answer within {:?}", self.probe_timeout)),
        }
    }
}
