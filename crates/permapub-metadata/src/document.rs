//! Base templates and composed metadata documents.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::attribute::Attribute;
use crate::error::{MetadataError, MetadataResult};

/// Base metadata document supplied by the operator.
///
/// Every known field is optional. Keys other than `name`, `description`,
/// `image`, and `attributes` are carried through to the composed document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataTemplate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Literal text, or `file://<path>` to substitute a text file's contents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Always replaced during composition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Vec<Attribute>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MetadataTemplate {
    /// Read and parse a template from disk.
    pub fn load(path: impl AsRef<Path>) -> MetadataResult<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|source| MetadataError::TemplateIo {
            path: path.to_path_buf(),
            source,
        })?;
        let template: Self =
            serde_json::from_str(&data).map_err(|e| MetadataError::MalformedTemplate {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        debug!(path = %path.display(), "loaded metadata template");
        Ok(template)
    }
}

/// Fully composed metadata document.
///
/// Unlike [`MetadataTemplate`], `image` and `attributes` are always present.
/// Serializes with a fixed key order (`name`, `description`, `image`,
/// `attributes`, then any extra template keys in sorted order), so equal
/// documents always produce identical bytes.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MetadataDocument {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub image: String,
    pub attributes: Vec<Attribute>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MetadataDocument {
    /// Compact JSON bytes of the document.
    pub fn to_canonical_json(&self) -> MetadataResult<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| MetadataError::Serialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_is_a_valid_template() {
        let template: MetadataTemplate = serde_json::from_str("{}").unwrap();
        assert_eq!(template, MetadataTemplate::default());
    }

    #[test]
    fn unknown_keys_are_kept() {
        let template: MetadataTemplate =
            serde_json::from_str(r#"{"name":"N","external_url":"https://example.org"}"#).unwrap();
        assert_eq!(template.name.as_deref(), Some("N"));
        assert_eq!(template.extra["external_url"], "https://example.org");
    }

    #[test]
    fn load_reports_missing_and_malformed_templates() {
        let dir = tempfile::tempdir().unwrap();
        let missing = MetadataTemplate::load(dir.path().join("base.json")).unwrap_err();
        assert!(matches!(missing, MetadataError::TemplateIo { .. }));

        let path = dir.path().join("base.json");
        std::fs::write(&path, r#"{"attributes": "nope"}"#).unwrap();
        let malformed = MetadataTemplate::load(&path).unwrap_err();
        assert!(matches!(malformed, MetadataError::MalformedTemplate { .. }));
    }

    #[test]
    fn canonical_json_has_fixed_key_order() {
        let mut extra = Map::new();
        extra.insert("zeta".into(), Value::from(1));
        extra.insert("alpha".into(), Value::from(2));
        let doc = MetadataDocument {
            name: Some("N".into()),
            description: None,
            image: "https://arweave.net/x".into(),
            attributes: vec![],
            extra,
        };
        let json = String::from_utf8(doc.to_canonical_json().unwrap()).unwrap();
        assert_eq!(
            json,
            r#"{"name":"N","image":"https://arweave.net/x","attributes":[],"alpha":2,"zeta":1}"#
        );
    }
}
