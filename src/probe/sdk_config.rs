use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use std::collections::BTreeMap;

use super::{Findings, Probe, ProbeEnv, ProbeOutcome};
use crate::identity::is_address;
use crate::utils::config::HarnessConfig;

/// Configuration object the frontend SDK is initialised with
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SdkConfig {
    pub network: String,
    pub rpc_url: String,
    pub contracts: BTreeMap<String, String>,
}

impl SdkConfig {
    pub fn from_harness(config: &HarnessConfig) -> Self {
        Self {
            network: config.network.clone(),
            rpc_url: config.rpc_url.clone(),
            contracts: config.contracts.clone(),
        }
    }

    /// `(name, address, valid)` per contract, in name order
    pub fn address_checks(&self) -> Vec<(&str, &str, bool)> {
        self.contracts
            .iter()
            .map(|(name, addr)| (name.as_str(), addr.as_str(), is_address(addr)))
            .collect()
    }
}

/// Builds the SDK configuration and reports address validity.
/// Invalid addresses are warnings only.
pub struct SdkConfigProbe;

#[async_trait]
impl Probe for SdkConfigProbe {
    fn name(&self) -> &str {
        "SDK Integration"
    }

    async fn run(&self, env: &ProbeEnv<'_>, findings: &mut Findings) -> Result<ProbeOutcome> {
        let sdk = SdkConfig::from_harness(env.config);
        findings.note(format!(
            "SDK configuration prepared for {} ({})",
            sdk.network, sdk.rpc_url
        ));

        let checks = sdk.address_checks();
        let mut valid = 0;
        for (name, address, ok) in &checks {
            if *ok {
                valid += 1;
                findings.note(format!("Valid contract address for {}: {}", name, address));
            } else {
                findings.warn(format!("Invalid contract address for {}: {}", name, address));
            }
        }

        Ok(ProbeOutcome::passed(format!(
            "{}/{} contract addresses valid",
            valid,
            checks.len()
        )))
    }
}
