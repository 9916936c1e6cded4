//! Foundation types for permapub.
//!
//! Every other permapub crate depends on `permapub-types`.
//!
//! # Key Types
//!
//! - [`ContentDigest`] -- Content-addressed fingerprint of a file (BLAKE3)
//! - [`RemoteId`] -- Identifier assigned by the storage network to an upload

pub mod digest;
pub mod error;
pub mod remote;

pub use digest::ContentDigest;
pub use error::TypeError;
pub use remote::RemoteId;
