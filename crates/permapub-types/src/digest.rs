use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TypeError;

/// Content digest of a file: the BLAKE3 hash of its raw bytes.
///
/// Identical content always produces the same `ContentDigest`, regardless of
/// file name, location, or modification time. The digest is the deduplication
/// key of the upload ledger and is persisted as a 64-character hex string.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentDigest([u8; 32]);

impl ContentDigest {
    /// Compute a `ContentDigest` from raw bytes.
    pub fn of(data: &[u8]) -> Self {
        Self(*blake3::hash(data).as_bytes())
    }

    /// Create a `ContentDigest` from a pre-computed hash.
    pub fn from_hash(hash: [u8; 32]) -> Self {
        Self(hash)
    }

    /// The raw 32-byte hash.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Hex-encoded string representation.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Short hex representation (first 8 characters).
    pub fn short_hex(&self) -> String {
        hex::encode(&self.0[..4])
    }

    /// Parse from a hex string.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        if bytes.len() != 32 {
            return Err(TypeError::InvalidLength {
                expected: 32,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl fmt::Debug for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentDigest({})", self.short_hex())
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for ContentDigest {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl From<[u8; 32]> for ContentDigest {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

// Serialized as hex so the digest can key a JSON object.
impl Serialize for ContentDigest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ContentDigest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn of_is_deterministic() {
        let data = b"hello world";
        assert_eq!(ContentDigest::of(data), ContentDigest::of(data));
    }

    #[test]
    fn different_data_produces_different_digests() {
        assert_ne!(ContentDigest::of(b"hello"), ContentDigest::of(b"world"));
    }

    #[test]
    fn matches_plain_blake3() {
        let digest = ContentDigest::of(b"abc");
        assert_eq!(digest.as_bytes(), blake3::hash(b"abc").as_bytes());
    }

    #[test]
    fn short_hex_is_8_chars() {
        assert_eq!(ContentDigest::of(b"test").short_hex().len(), 8);
    }

    #[test]
    fn display_is_full_hex() {
        let digest = ContentDigest::of(b"test");
        let display = format!("{digest}");
        assert_eq!(display.len(), 64);
        assert_eq!(display, digest.to_hex());
    }

    #[test]
    fn rejects_short_hex() {
        // 40 hex characters: a SHA-1 sized key.
        let err = ContentDigest::from_hex(&"ab".repeat(20)).unwrap_err();
        assert_eq!(
            err,
            TypeError::InvalidLength {
                expected: 32,
                actual: 20
            }
        );
    }

    #[test]
    fn rejects_non_hex() {
        assert!(matches!(
            ContentDigest::from_hex("zz"),
            Err(TypeError::InvalidHex(_))
        ));
    }

    #[test]
    fn serializes_as_hex_string() {
        let digest = ContentDigest::of(b"serde test");
        let json = serde_json::to_string(&digest).unwrap();
        assert_eq!(json, format!("\"{}\"", digest.to_hex()));
        let parsed: ContentDigest = serde_json::from_str(&json).unwrap();
        assert_eq!(digest, parsed);
    }

    #[test]
    fn usable_as_json_map_key() {
        let mut map = std::collections::BTreeMap::new();
        map.insert(ContentDigest::of(b"key"), 1u8);
        let json = serde_json::to_string(&map).unwrap();
        let parsed: std::collections::BTreeMap<ContentDigest, u8> =
            serde_json::from_str(&json).unwrap();
        assert_eq!(map, parsed);
    }

    proptest! {
        #[test]
        fn hex_parse_inverts_display(bytes in proptest::array::uniform32(any::<u8>())) {
            let digest = ContentDigest::from_hash(bytes);
            prop_assert_eq!(digest.to_string().parse::<ContentDigest>().unwrap(), digest);
        }
    }
}
