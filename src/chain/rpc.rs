//! Ethereum node access over HTTP, backed by an `alloy` provider

use alloy::providers::{Provider, RootProvider};
use alloy::transports::http::reqwest::Url;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;

use super::NodeRpc;

pub struct HttpNode {
    provider: RootProvider,
    url: String,
    timeout: Duration,
}

impl HttpNode {
    pub fn new(url: &str, timeout_ms: u64) -> Result<Self> {
        let parsed: Url = url
            .parse()
            .with_context(|| format!("Invalid RPC URL: {}", url))?;
        Ok(Self {
            provider: RootProvider::new_http(parsed),
            url: url.to_string(),
            timeout: Duration::from_millis(timeout_ms),
        })
    }

    /// Run one node call, failing once the configured timeout elapses
    async fn bounded<T, E, F>(&self, method: &str, call: F) -> Result<T>
    where
        F: Future<Output = std::result::Result<T, E>>,
        E: std::error::Error + Send + Sync + 'static,
    {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result.with_context(|| format!("Failed to call {} on {}", method, self.url)),
            Err(_) => anyhow::bail!(
                "{} on {} timed out after {}ms",
                method,
                self.url,
                self.timeout.as_millis()
            ),
        }
    }
}

#[async_trait]
impl NodeRpc for HttpNode {
    async fn is_live(&self) -> Result<bool> {
        let version = self
            .bounded("web3_clientVersion", async {
                self.provider.get_client_version().await
            })
            .await;
        match version {
            Ok(version) => {
                log::debug!("node {} answered: {}", self.url, version);
                Ok(true)
            }
            Err(e) => {
                log::debug!("node {} not live: {:#}", self.url, e);
                Ok(false)
            }
        }
    }

    async fn chain_id(&self) -> Result<u64> {
        self.bounded("eth_chainId", async { self.provider.get_chain_id().await })
            .await
    }

    async fn block_number(&self) -> Result<u64> {
        self.bounded("eth_blockNumber", async {
            self.provider.get_block_number().await
        })
        .await
    }

    async fn send_raw_transaction(&self, raw: &[u8]) -> Result<String> {
        let pending = self
            .bounded("eth_sendRawTransaction", async {
                self.provider.send_raw_transaction(raw).await
            })
            .await?;
        Ok(alloy::hex::encode_prefixed(pending.tx_hash()))
    }

    fn endpoint(&self) -> &str {
        &self.url
    }
}
