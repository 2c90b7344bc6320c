use anyhow::Result;
use async_trait::async_trait;

use super::{Findings, Probe, ProbeEnv, ProbeOutcome};
use crate::identity::fixed_transfer;

/// Builds the fixed transfer and signs it with the run's identity
pub struct TransactionProbe;

#[async_trait]
impl Probe for TransactionProbe {
    fn name(&self) -> &str {
        "Transaction Creation"
    }

    async fn run(&self, env: &ProbeEnv<'_>, findings: &mut Findings) -> Result<ProbeOutcome> {
        let signed = env
            .identity
            .sign_transaction(fixed_transfer(env.config.chain_id))?;

        if !signed.is_well_formed() {
            return Ok(ProbeOutcome::failed("signed transaction is empty or has a zero hash"));
        }

        findings.note(format!("Transaction hash: {}", signed.hash_hex()));
        findings.note(format!("Raw length: {} bytes", signed.raw().len()));
        Ok(ProbeOutcome::passed(signed.hash_hex()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::TestIdentity;
    use crate::probe::testing::{test_config, FakeNode};
    use crate::runner::state::ProbeStatus;

    #[tokio::test]
    async fn test_signs_fixed_transfer() {
        let config = test_config();
        let identity = TestIdentity::generate().unwrap();
        let node = FakeNode::unreachable();
        let env = ProbeEnv { config: &config, identity: &identity, rpc: &node, browser: None };

        let outcome = TransactionProbe.run(&env, &mut Findings::default()).await.unwrap();
        assert_eq!(outcome.status, ProbeStatus::Passed);

        let hash = outcome.message.unwrap();
        assert!(hash.starts_with("0x"));
        assert_eq!(hash.len(), 66);
    }
}
