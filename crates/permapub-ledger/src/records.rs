use std::collections::BTreeMap;

use permapub_types::{ContentDigest, RemoteId};
use serde::{Deserialize, Serialize};

/// Persisted value of one ledger entry.
///
/// Field names match the on-disk format: `{"hash": <remote id>, "file": <path>}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRecord {
    #[serde(rename = "hash")]
    pub remote_id: RemoteId,
    #[serde(rename = "file")]
    pub source_path: String,
}

/// One confirmed upload: the content digest together with its record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LedgerEntry {
    pub digest: ContentDigest,
    pub remote_id: RemoteId,
    pub source_path: String,
}

/// Result of inserting into a [`Ledger`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordOutcome {
    /// A new entry was created.
    Inserted,
    /// The digest was already recorded; the existing entry was kept.
    AlreadyPresent { existing: RemoteId },
}

/// Mapping from content digest to the upload that stored it.
///
/// Serialized as a single JSON object keyed by hex digest.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ledger {
    entries: BTreeMap<ContentDigest, LedgerRecord>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remote id recorded for `digest`, if any.
    pub fn lookup(&self, digest: &ContentDigest) -> Option<&RemoteId> {
        self.entries.get(digest).map(|r| &r.remote_id)
    }

    /// Full entry recorded for `digest`, if any.
    pub fn entry(&self, digest: &ContentDigest) -> Option<LedgerEntry> {
        self.entries.get(digest).map(|r| LedgerEntry {
            digest: *digest,
            remote_id: r.remote_id.clone(),
            source_path: r.source_path.clone(),
        })
    }

    /// Insert a record unless the digest is already present.
    pub fn insert(&mut self, digest: ContentDigest, record: LedgerRecord) -> RecordOutcome {
        match self.entries.get(&digest) {
            Some(existing) => RecordOutcome::AlreadyPresent {
                existing: existing.remote_id.clone(),
            },
            None => {
                self.entries.insert(digest, record);
                RecordOutcome::Inserted
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
