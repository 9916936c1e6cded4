//! Cryptographic primitives for permapub.
//!
//! Provides content digests of files on disk, an EVM wallet built on
//! `alloy-signer-local`, the ANS-104 data item envelope the storage node
//! accepts, and the signed value transfer used to fund the node account.
//!
//! Signing, transaction encoding and hashing are delegated to `alloy` and
//! `sha2`.

pub mod data_item;
pub mod deep_hash;
pub mod hasher;
pub mod transfer;
pub mod wallet;

pub use data_item::{content_type_for, DataItem, Tag};
pub use deep_hash::{deep_hash, DeepHashChunk};
pub use hasher::{FileHasher, HasherError};
pub use transfer::LegacyTransfer;
pub use wallet::{format_amount, parse_amount, Wallet, WalletError};

pub use alloy_primitives::{Address, U256};
