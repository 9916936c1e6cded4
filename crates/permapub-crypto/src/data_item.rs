//! ANS-104 data items: the signed envelope the storage node accepts.
//!
//! Binary layout:
//! ```text
//! [2 bytes: signature type (little-endian u16, 3 = ethereum)]
//! [65 bytes: signature (r || s || v)]
//! [65 bytes: owner (uncompressed secp256k1 public key)]
//! [1 byte: target present (0)]
//! [1 byte: anchor present (0)]
//! [8 bytes: number of tags (little-endian u64)]
//! [8 bytes: encoded tag length (little-endian u64)]
//! [N bytes: tags (Avro array of {name: bytes, value: bytes})]
//! [M bytes: data]
//! ```

use std::path::Path;

use tracing::debug;

use crate::deep_hash::{deep_hash, DeepHashChunk};
use crate::wallet::{Wallet, WalletError};

pub const SIGNATURE_TYPE_ETHEREUM: u16 = 3;
const SIGNATURE_LEN: usize = 65;
const OWNER_LEN: usize = 65;
const HEADER_LEN: usize = 2 + SIGNATURE_LEN + OWNER_LEN + 1 + 1 + 8 + 8;

/// A name/value tag attached to a data item.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub value: String,
}

impl Tag {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A signed, serialized data item.
#[derive(Clone, Debug)]
pub struct DataItem {
    bytes: Vec<u8>,
    tag_count: usize,
    tags_len: usize,
}

impl DataItem {
    /// Sign `data` with `wallet` and serialize the envelope.
    pub fn sign(wallet: &Wallet, data: &[u8], tags: &[Tag]) -> Result<Self, WalletError> {
        let owner = wallet.owner();
        let raw_tags = encode_tags(tags);
        let sig_type = SIGNATURE_TYPE_ETHEREUM.to_string();

        let message = deep_hash(&DeepHashChunk::List(vec![
            DeepHashChunk::Blob(b"dataitem"),
            DeepHashChunk::Blob(b"1"),
            DeepHashChunk::Blob(sig_type.as_bytes()),
            DeepHashChunk::Blob(&owner),
            DeepHashChunk::Blob(&[]),
            DeepHashChunk::Blob(&[]),
            DeepHashChunk::Blob(&raw_tags),
            DeepHashChunk::Blob(data),
        ]));
        let signature = wallet.sign_message(&message)?.as_bytes();

        let mut bytes = Vec::with_capacity(HEADER_LEN + raw_tags.len() + data.len());
        bytes.extend_from_slice(&SIGNATURE_TYPE_ETHEREUM.to_le_bytes());
        bytes.extend_from_slice(&signature);
        bytes.extend_from_slice(&owner);
        bytes.push(0);
        bytes.push(0);
        bytes.extend_from_slice(&(tags.len() as u64).to_le_bytes());
        bytes.extend_from_slice(&(raw_tags.len() as u64).to_le_bytes());
        bytes.extend_from_slice(&raw_tags);
        bytes.extend_from_slice(data);

        debug!(bytes = bytes.len(), tags = tags.len(), "signed data item");
        Ok(Self {
            bytes,
            tag_count: tags.len(),
            tags_len: raw_tags.len(),
        })
    }

    pub fn tag_count(&self) -> usize {
        self.tag_count
    }

    /// The payload carried by this item.
    pub fn data(&self) -> &[u8] {
        &self.bytes[HEADER_LEN + self.tags_len..]
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Infer a `Content-Type` tag value from a file extension.
pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        Some("json") => "application/json",
        Some("mp4") => "video/mp4",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}

/// Avro-encode tags as an array of `{name: bytes, value: bytes}` records.
///
/// An empty tag list encodes to zero bytes.
fn encode_tags(tags: &[Tag]) -> Vec<u8> {
    let mut out = Vec::new();
    if tags.is_empty() {
        return out;
    }
    encode_long(tags.len() as i64, &mut out);
    for tag in tags {
        encode_bytes(tag.name.as_bytes(), &mut out);
        encode_bytes(tag.value.as_bytes(), &mut out);
    }
    encode_long(0, &mut out);
    out
}

fn encode_bytes(data: &[u8], out: &mut Vec<u8>) {
    encode_long(data.len() as i64, out);
    out.extend_from_slice(data);
}

/// Zigzag varint, as Avro encodes `long`.
fn encode_long(n: i64, out: &mut Vec<u8>) {
    let mut z = ((n << 1) ^ (n >> 63)) as u64;
    while z >= 0x80 {
        out.push((z as u8 & 0x7f) | 0x80);
        z >>= 7;
    }
    out.push(z as u8);
}

#[cfg(test)]
impl DataItem {
    fn signature(&self) -> &[u8] {
        &self.bytes[2..2 + SIGNATURE_LEN]
    }

    fn owner(&self) -> &[u8] {
        &self.bytes[2 + SIGNATURE_LEN..2 + SIGNATURE_LEN + OWNER_LEN]
    }
}
