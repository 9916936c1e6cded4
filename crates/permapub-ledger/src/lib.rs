//! Upload ledger for permapub.
//!
//! The ledger maps a file's [`ContentDigest`](permapub_types::ContentDigest)
//! to the [`RemoteId`](permapub_types::RemoteId) the storage network assigned
//! when that content was first uploaded. It is what makes publishing
//! idempotent: content with a ledger entry is never paid for twice.
//!
//! This crate provides:
//! - [`Ledger`] -- the in-memory index with first-writer-wins insertion
//! - [`UploadLedger`] -- load / lookup / lock / record boundary
//! - [`LedgerLock`] -- exclusive writer lock, held from lookup to record
//! - [`JsonFileLedger`] -- the persisted JSON store, locked and atomically
//!   replaced on every mutation
//! - [`InMemoryLedger`] -- implementation for tests and embedding
//!
//! # Rules
//!
//! 1. Entries are created only for confirmed uploads.
//! 2. An existing entry is canonical; it is never overwritten or deleted.
//! 3. A missing or malformed store is an error, never an empty ledger.

pub mod error;
pub mod file;
pub mod lock;
pub mod memory;
pub mod records;
pub mod traits;

pub use error::{LedgerError, LedgerResult};
pub use file::JsonFileLedger;
pub use lock::LedgerLock;
pub use memory::InMemoryLedger;
pub use records::{Ledger, LedgerEntry, LedgerRecord, RecordOutcome};
pub use traits::UploadLedger;
