pub mod rpc;

use anyhow::Result;
use async_trait::async_trait;

pub use rpc::HttpNode;

/// The node facts the harness consumes
#[async_trait]
pub trait NodeRpc: Send + Sync {
    /// Endpoint answers a trivial request
    async fn is_live(&self) -> Result<bool>;

    async fn chain_id(&self) -> Result<u64>;

    /// Latest block number
    async fn block_number(&self) -> Result<u64>;

    /// Broadcast a signed transaction, returning its hash
    async fn send_raw_transaction(&self, raw: &[u8]) -> Result<String>;

    fn endpoint(&self) -> &str;
}
