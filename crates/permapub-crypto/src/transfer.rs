use alloy_consensus::{SignableTransaction, TxEnvelope, TxLegacy};
use alloy_eips::eip2718::Encodable2718;
use alloy_primitives::{Address, Bytes, TxKind, U256};

use crate::wallet::{Wallet, WalletError};

/// Gas limit of a plain value transfer.
pub const TRANSFER_GAS: u64 = 21_000;

/// A plain value transfer in legacy (EIP-155) transaction form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LegacyTransfer {
    pub chain_id: u64,
    pub nonce: u64,
    /// Wei per gas.
    pub gas_price: u128,
    pub gas_limit: u64,
    pub to: Address,
    pub value: U256,
}

impl LegacyTransfer {
    fn to_tx(&self) -> TxLegacy {
        TxLegacy {
            chain_id: Some(self.chain_id),
            nonce: self.nonce,
            gas_price: self.gas_price,
            gas_limit: self.gas_limit,
            to: TxKind::Call(self.to),
            value: self.value,
            input: Bytes::new(),
        }
    }

    /// Sign and return the raw transaction bytes for `eth_sendRawTransaction`.
    pub fn sign(&self, wallet: &Wallet) -> Result<Vec<u8>, WalletError> {
        let tx = self.to_tx();
        let signature = wallet.sign_hash(&tx.signature_hash())?;
        Ok(TxEnvelope::from(tx.into_signed(signature)).encoded_2718())
    }
}
