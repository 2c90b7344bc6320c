use alloy::json_abi::{Function, JsonAbi, StateMutability};
use alloy::primitives::Address;
use anyhow::{Context, Result};
use async_trait::async_trait;

use super::{Findings, Probe, ProbeEnv, ProbeOutcome};
use crate::identity::selector;

/// Interface of the game registry contract the frontend talks to
const REGISTRY_ABI: &str = r#"[
    {
        "inputs": [],
        "name": "registerPlayer",
        "outputs": [],
        "stateMutability": "nonpayable",
        "type": "function"
    },
    {
        "inputs": [{"name": "player", "type": "address", "internalType": "address"}],
        "name": "getPlayerData",
        "outputs": [{
            "name": "",
            "type": "tuple",
            "internalType": "struct Registry.Player",
            "components": [
                {"name": "registered", "type": "bool", "internalType": "bool"},
                {"name": "score", "type": "uint256", "internalType": "uint256"}
            ]
        }],
        "stateMutability": "view",
        "type": "function"
    }
]"#;

/// Call payload: target plus calldata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallPayload {
    pub to: Address,
    pub data: Vec<u8>,
}

pub fn registry_abi() -> Result<JsonAbi> {
    serde_json::from_str(REGISTRY_ABI).context("embedded ABI is malformed")
}

pub fn is_mutating(function: &Function) -> bool {
    matches!(
        function.state_mutability,
        StateMutability::NonPayable | StateMutability::Payable
    )
}

/// Encode a zero-argument call to `function` on `to`
pub fn encode_call(to: Address, function: &Function) -> CallPayload {
    CallPayload {
        to,
        data: selector(&function.signature()).to_vec(),
    }
}

/// Computes the selector of the registry's mutating function and assembles a call
pub struct ContractCallProbe;

#[async_trait]
impl Probe for ContractCallProbe {
    fn name(&self) -> &str {
        "Contract Interaction"
    }

    async fn run(&self, env: &ProbeEnv<'_>, findings: &mut Findings) -> Result<ProbeOutcome> {
        let abi = registry_abi()?;
        let function = match abi.functions().find(|f| is_mutating(f)) {
            Some(f) => f,
            None => return Ok(ProbeOutcome::failed("interface has no mutating function")),
        };

        let target: Address = env
            .config
            .call_target
            .parse()
            .context("callTarget is not a valid address")?;

        let payload = encode_call(target, function);
        if payload.data.len() != 4 {
            return Ok(ProbeOutcome::failed(format!(
                "selector for {} is {} bytes",
                function.signature(),
                payload.data.len()
            )));
        }

        let selector_hex = alloy::hex::encode_prefixed(&payload.data);
        findings.note(format!("Function selector for {}: {}", function.signature(), selector_hex));
        findings.note(format!("Call prepared for {}", payload.to));
        Ok(ProbeOutcome::passed(format!("{} -> {}", function.signature(), selector_hex)))
    }
}
