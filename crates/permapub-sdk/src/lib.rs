//! Publishing pipeline for permapub.
//!
//! Composes the lower crates into the operations the CLI exposes:
//!
//! - [`CostEstimator`] -- price quotes in base and display units
//! - [`Uploader`] -- content-addressed upload, at most once per ledger
//! - [`MetadataPublisher`] -- writes `<output dir>/<id>.json` and uploads it
//!   through the same ledger
//! - [`Publisher`] -- `balance`, `fund` and the full `upload` pipeline over
//!   a [`PublishContext`]

pub mod context;
pub mod error;
pub mod estimator;
pub mod pipeline;
pub mod publisher;
pub mod uploader;

#[cfg(test)]
mod testing;

pub use context::{PublishContext, PublishPaths};
pub use error::{SdkError, SdkResult};
pub use estimator::{CostEstimator, Price};
pub use pipeline::{Balance, Funding, Publisher, UploadReport, UploadRequest};
pub use publisher::{MetadataPublisher, PublishedMetadata};
pub use uploader::{Resolution, Uploader};

// Re-export key types
pub use permapub_client::{ClientConfig, Currency, StorageNetwork};
pub use permapub_ledger::UploadLedger;
pub use permapub_types::{ContentDigest, RemoteId};
