//! Ephemeral test identities
//!
//! Keys, addresses, message framing and transaction encoding all come from
//! `alloy`. This module wires one run's identity together; the probes only
//! call it and inspect what comes back.

pub mod transaction;

use alloy::primitives::{keccak256, Address, Signature, B256};
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::SignerSync;
use anyhow::{bail, Context, Result};
use rand::RngCore;

pub use transaction::{fixed_transfer, SignedTransaction};

/// Function selector: first 4 bytes of the Keccak-256 of the canonical signature
pub fn selector(signature: &str) -> [u8; 4] {
    let digest = keccak256(signature.as_bytes());
    [digest[0], digest[1], digest[2], digest[3]]
}

/// 40 hex digits with an optional `0x`. Mixed case must carry a valid EIP-55 checksum.
pub fn is_address(candidate: &str) -> bool {
    let body = candidate.strip_prefix("0x").unwrap_or(candidate);
    let prefixed = format!("0x{}", body);
    let mixed_case = body.chars().any(|c| c.is_ascii_lowercase())
        && body.chars().any(|c| c.is_ascii_uppercase());

    if mixed_case {
        Address::parse_checksummed(&prefixed, None).is_ok()
    } else {
        prefixed.parse::<Address>().is_ok()
    }
}

/// A signing key and its address, owned by a single run
#[derive(Clone)]
pub struct TestIdentity {
    signer: PrivateKeySigner,
}

impl TestIdentity {
    /// Generate a fresh identity from the OS random source
    pub fn generate() -> Result<Self> {
        let mut secret = [0u8; 32];
        rand::rngs::OsRng
            .try_fill_bytes(&mut secret)
            .context("OS random source unavailable")?;
        Self::from_private_key(&secret)
    }

    /// Reconstruct an identity from 32 raw private key bytes
    pub fn from_private_key(secret: &[u8]) -> Result<Self> {
        if secret.len() != 32 {
            bail!("private key must be 32 bytes, got {}", secret.len());
        }
        let signer = PrivateKeySigner::from_bytes(&B256::from_slice(secret))
            .context("invalid private key")?;
        Ok(Self { signer })
    }

    /// Reconstruct an identity from a hex private key (`0x` optional)
    pub fn from_private_key_hex(secret: &str) -> Result<Self> {
        let bytes = alloy::hex::decode(secret).context("private key is not hex")?;
        Self::from_private_key(&bytes)
    }

    pub fn address(&self) -> Address {
        self.signer.address()
    }

    pub fn private_key_bytes(&self) -> B256 {
        self.signer.to_bytes()
    }

    pub fn private_key_hex(&self) -> String {
        alloy::hex::encode_prefixed(self.private_key_bytes())
    }

    /// Sign `message` with personal-message framing (EIP-191)
    pub fn sign_message(&self, message: &[u8]) -> Result<Signature> {
        self.signer
            .sign_message_sync(message)
            .context("message signing failed")
    }

    /// Sign a legacy transaction; its `chain_id` gives replay protection (EIP-155)
    pub fn sign_transaction(&self, tx: alloy::consensus::TxLegacy) -> Result<SignedTransaction> {
        SignedTransaction::sign(tx, &self.signer)
    }
}

impl std::fmt::Debug for TestIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestIdentity")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HARDHAT_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn test_selector_known_vectors() {
        assert_eq!(alloy::hex::encode(selector("transfer(address,uint256)")), "a9059cbb");
        let first = selector("registerPlayer()");
        assert_eq!(first, selector("registerPlayer()"));
        assert_ne!(first, selector("getPlayerData(address)"));
    }

    #[test]
    fn test_is_address() {
        // EIP-55 vectors
        assert!(is_address("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"));
        assert!(is_address("0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359"));
        // Single case skips the checksum
        assert!(is_address("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed"));
        assert!(is_address("0x5AAEB6053F3E94C9B9A09F33669435E7EF1BEAED"));
        assert!(is_address("5aaeb6053f3e94c9b9a09f33669435e7ef1beaed"));
        assert!(is_address("0x1234567890123456789012345678901234567890"));
        // Broken checksum, bad length, non-hex
        assert!(!is_address("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAeD"));
        assert!(!is_address("0x1234"));
        assert!(!is_address("0xnotanaddress"));
        assert!(!is_address(""));
    }

    #[test]
    fn test_known_key_derives_known_address() {
        let identity = TestIdentity::from_private_key_hex(HARDHAT_KEY).unwrap();
        assert_eq!(
            identity.address().to_checksum(None),
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
        );
        assert_eq!(identity.private_key_hex(), HARDHAT_KEY);
    }

    #[test]
    fn test_private_key_round_trip() {
        for _ in 0..5 {
            let identity = TestIdentity::generate().unwrap();
            let rebuilt = TestIdentity::from_private_key_hex(&identity.private_key_hex()).unwrap();
            assert_eq!(rebuilt.address(), identity.address());
        }
    }

    #[test]
    fn test_rejects_invalid_private_key() {
        assert!(TestIdentity::from_private_key(&[0u8; 32]).is_err());
        assert!(TestIdentity::from_private_key(&[1u8; 31]).is_err());
        assert!(TestIdentity::from_private_key_hex("0xnothex").is_err());
    }

    #[test]
    fn test_message_signature_recovers_signer() {
        let identity = TestIdentity::generate().unwrap();
        let message = b"Test message for LithosProtocol";
        let signature = identity.sign_message(message).unwrap();

        assert_eq!(signature.as_bytes().len(), 65);
        assert_eq!(
            signature.recover_address_from_msg(message).unwrap(),
            identity.address()
        );
    }
}
