use anyhow::Result;
use async_trait::async_trait;

use super::{Findings, Probe, ProbeEnv, ProbeOutcome};

/// Node liveness plus chain id and latest block
pub struct ConnectivityProbe;

#[async_trait]
impl Probe for ConnectivityProbe {
    fn name(&self) -> &str {
        "Web3 Connection"
    }

    async fn run(&self, env: &ProbeEnv<'_>, findings: &mut Findings) -> Result<ProbeOutcome> {
        let endpoint = env.rpc.endpoint();

        match env.rpc.is_live().await {
            Ok(true) => findings.note(format!("node at {} is live", endpoint)),
            Ok(false) => return Ok(ProbeOutcome::failed(format!("node at {} is not reachable", endpoint))),
            Err(e) => return Ok(ProbeOutcome::failed(format!("liveness check failed: {:#}", e))),
        }

        let chain_id = match env.rpc.chain_id().await {
            Ok(id) => id,
            Err(e) => return Ok(ProbeOutcome::failed(format!("chain id query failed: {:#}", e))),
        };
        let block = match env.rpc.block_number().await {
            Ok(n) => n,
            Err(e) => return Ok(ProbeOutcome::failed(format!("block number query failed: {:#}", e))),
        };

        findings.note(format!("Chain ID: {}", chain_id));
        findings.note(format!("Latest block: {}", block));
        Ok(ProbeOutcome::passed(format!("chain {} at block {}", chain_id, block)))
    }
}
