use alloy::consensus::{SignableTransaction, Signed, TxEnvelope, TxLegacy};
use alloy::eips::eip2718::Encodable2718;
use alloy::primitives::{Address, Bytes, Signature, TxKind, B256, U256};
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::SignerSync;
use anyhow::{Context, Result};

pub const WEI_PER_GWEI: u128 = 1_000_000_000;
/// 0.001 ether
pub const TRANSFER_VALUE_WEI: u64 = 1_000_000_000_000_000;

/// The transfer every run signs: 0.001 ether to the zero address,
/// 21000 gas at 20 gwei, nonce 0.
pub fn fixed_transfer(chain_id: u64) -> TxLegacy {
    TxLegacy {
        chain_id: Some(chain_id),
        nonce: 0,
        gas_price: 20 * WEI_PER_GWEI,
        gas_limit: 21_000,
        to: TxKind::Call(Address::ZERO),
        value: U256::from(TRANSFER_VALUE_WEI),
        input: Bytes::new(),
    }
}

/// A signed legacy transaction, ready for `eth_sendRawTransaction`
#[derive(Debug, Clone)]
pub struct SignedTransaction {
    inner: Signed<TxLegacy>,
}

impl SignedTransaction {
    pub(super) fn sign(tx: TxLegacy, signer: &PrivateKeySigner) -> Result<Self> {
        let signature = signer
            .sign_hash_sync(&tx.signature_hash())
            .context("transaction signing failed")?;
        Ok(Self {
            inner: tx.into_signed(signature),
        })
    }

    pub fn hash(&self) -> B256 {
        *self.inner.hash()
    }

    pub fn hash_hex(&self) -> String {
        alloy::hex::encode_prefixed(self.hash())
    }

    pub fn signature(&self) -> &Signature {
        self.inner.signature()
    }

    pub fn tx(&self) -> &TxLegacy {
        self.inner.tx()
    }

    /// Network encoding of the signed transaction
    pub fn raw(&self) -> Vec<u8> {
        TxEnvelope::from(self.inner.clone()).encoded_2718()
    }

    /// Non-empty encoding and a non-zero hash
    pub fn is_well_formed(&self) -> bool {
        !self.raw().is_empty() && self.hash() != B256::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::TestIdentity;

    #[test]
    fn test_fixed_transfer_fields() {
        let tx = fixed_transfer(1337);
        assert_eq!(tx.chain_id, Some(1337));
        assert_eq!(tx.value, U256::from(10u64.pow(15)));
        assert_eq!(tx.gas_limit, 21_000);
        assert_eq!(tx.gas_price, 20_000_000_000);
        assert_eq!(tx.to, TxKind::Call(Address::ZERO));
    }

    #[test]
    fn test_signature_recovers_signer() {
        let identity = TestIdentity::generate().unwrap();
        let signed = identity.sign_transaction(fixed_transfer(1337)).unwrap();

        assert!(signed.is_well_formed());
        let recovered = signed
            .signature()
            .recover_address_from_prehash(&signed.tx().signature_hash())
            .unwrap();
        assert_eq!(recovered, identity.address());
    }

    #[test]
    fn test_raw_encoding_is_rlp_list() {
        let identity = TestIdentity::generate().unwrap();
        let raw = identity.sign_transaction(fixed_transfer(1337)).unwrap().raw();
        // Legacy transactions carry no type byte
        assert!(raw[0] >= 0xc0);
    }

    #[test]
    fn test_signing_is_deterministic() {
        let identity = TestIdentity::generate().unwrap();
        let first = identity.sign_transaction(fixed_transfer(1337)).unwrap();
        let second = identity.sign_transaction(fixed_transfer(1337)).unwrap();
        assert_eq!(first.hash(), second.hash());
        assert_eq!(first.raw(), second.raw());
    }

    #[test]
    fn test_chain_id_changes_hash() {
        let identity = TestIdentity::generate().unwrap();
        let local = identity.sign_transaction(fixed_transfer(1337)).unwrap();
        let mainnet = identity.sign_transaction(fixed_transfer(1)).unwrap();
        assert_ne!(local.hash(), mainnet.hash());
    }
}
