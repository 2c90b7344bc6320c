use anyhow::Result;
use async_trait::async_trait;

use super::{Findings, Probe, ProbeEnv, ProbeOutcome};
use crate::identity::TestIdentity;

/// Key round-trip and message signing on a fresh identity
pub struct IdentityOpsProbe;

#[async_trait]
impl Probe for IdentityOpsProbe {
    fn name(&self) -> &str {
        "Account Operations"
    }

    async fn run(&self, env: &ProbeEnv<'_>, findings: &mut Findings) -> Result<ProbeOutcome> {
        let identity = TestIdentity::generate()?;
        findings.note(format!("Account created: {}", identity.address()));

        let rebuilt = TestIdentity::from_private_key_hex(&identity.private_key_hex())?;
        if rebuilt.address() != identity.address() {
            return Ok(ProbeOutcome::failed(format!(
                "reconstructed address {} does not match {}",
                rebuilt.address(),
                identity.address()
            )));
        }
        findings.note("Private key round-trip preserved the address");

        let message = format!("Test message for {}", env.config.product_name);
        let signature = identity.sign_message(message.as_bytes())?;
        findings.note(format!("Message signed ({} bytes)", signature.as_bytes().len()));

        Ok(ProbeOutcome::passed(format!(
            "round-trip and signing ok for {}",
            identity.address()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::testing::{test_config, FakeNode};
    use crate::runner::state::ProbeStatus;

    #[tokio::test]
    async fn test_identity_operations_pass() {
        let config = test_config();
        let identity = TestIdentity::generate().unwrap();
        let node = FakeNode::unreachable();
        let env = ProbeEnv { config: &config, identity: &identity, rpc: &node, browser: None };

        let mut findings = Findings::default();
        let outcome = IdentityOpsProbe.run(&env, &mut findings).await.unwrap();
        assert_eq!(outcome.status, ProbeStatus::Passed);
        assert_eq!(findings.notes().len(), 3);
    }
}
