//! Metadata composition for permapub.
//!
//! Turns a base template, the remote id of an uploaded image, an optional
//! name, and `key=value` attribute pairs into a complete metadata document.
//! Composition is all-or-nothing: any invalid attribute pair aborts it
//! before a document exists.
//!
//! # Key Types
//!
//! - [`MetadataTemplate`] -- Base document as read from disk
//! - [`AttributeSpec`] -- One parsed `key=value` pair
//! - [`MetadataComposer`] -- Builds a [`MetadataDocument`]
//! - [`MetadataDocument`] -- Fully composed document, ready to serialize

pub mod attribute;
pub mod composer;
pub mod document;
pub mod error;

pub use attribute::{Attribute, AttributeSpec};
pub use composer::{MetadataComposer, FILE_MARKER};
pub use document::{MetadataDocument, MetadataTemplate};
pub use error::{MetadataError, MetadataResult};
