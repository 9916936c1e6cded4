use std::str::FromStr;

use alloy_primitives::utils::{format_units, parse_units};
use alloy_primitives::{Address, Signature, B256, U256};
use alloy_signer::SignerSync;
use alloy_signer_local::PrivateKeySigner;

/// EVM wallet holding a secp256k1 private key.
///
/// The same key signs data items for the storage node and value transfers
/// on the funding chain.
pub struct Wallet {
    signer: PrivateKeySigner,
}

impl Wallet {
    /// Build a wallet from a hex private key (with or without `0x`).
    pub fn from_private_key(key: &str) -> Result<Self, WalletError> {
        let signer = PrivateKeySigner::from_str(key.trim()).map_err(|_| WalletError::InvalidKey)?;
        Ok(Self { signer })
    }

    /// Generate a new random wallet.
    pub fn random() -> Self {
        Self {
            signer: PrivateKeySigner::random(),
        }
    }

    /// The wallet's EVM address.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Uncompressed SEC1 public key (`0x04 || x || y`).
    pub fn owner(&self) -> [u8; 65] {
        let point = self
            .signer
            .credential()
            .verifying_key()
            .to_encoded_point(false);
        let mut owner = [0u8; 65];
        owner.copy_from_slice(point.as_bytes());
        owner
    }

    /// Sign `message` as an EIP-191 personal message.
    pub fn sign_message(&self, message: &[u8]) -> Result<Signature, WalletError> {
        self.signer
            .sign_message_sync(message)
            .map_err(|e| WalletError::Signing(e.to_string()))
    }

    /// Sign a 32-byte prehash directly.
    pub fn sign_hash(&self, hash: &B256) -> Result<Signature, WalletError> {
        self.signer
            .sign_hash_sync(hash)
            .map_err(|e| WalletError::Signing(e.to_string()))
    }
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Wallet({}, key: <redacted>)", self.address())
    }
}

/// Convert a decimal string in display units (`"0.05"`) to base units.
pub fn parse_amount(amount: &str, decimals: u8) -> Result<U256, WalletError> {
    let amount = amount.trim();
    if amount.is_empty() || amount.starts_with('-') {
        return Err(WalletError::InvalidAmount(amount.to_string()));
    }
    let parsed = parse_units(amount, decimals)
        .map_err(|e| WalletError::InvalidAmount(format!("{amount}: {e}")))?;
    Ok(parsed.get_absolute())
}

/// Convert base units to a decimal display string with trailing zeros removed.
pub fn format_amount(amount: U256, decimals: u8) -> Result<String, WalletError> {
    let formatted = format_units(amount, decimals)
        .map_err(|e| WalletError::InvalidAmount(e.to_string()))?;
    if !formatted.contains('.') {
        return Ok(formatted);
    }
    Ok(formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string())
}

/// Errors from wallet operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum WalletError {
    #[error("invalid private key")]
    InvalidKey,
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    #[error("signing failed: {0}")]
    Signing(String),
}
