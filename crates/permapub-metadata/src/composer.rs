use std::path::{Path, PathBuf};

use permapub_types::RemoteId;
use tracing::debug;
use url::Url;

use crate::attribute::AttributeSpec;
use crate::document::{MetadataDocument, MetadataTemplate};
use crate::error::{MetadataError, MetadataResult};

/// Description prefix that refers to an external text file.
pub const FILE_MARKER: &str = "file://";

/// Builds metadata documents from a template.
///
/// The only I/O the composer performs is reading a `file://` description;
/// relative references resolve against `base_dir`.
#[derive(Clone, Debug)]
pub struct MetadataComposer {
    gateway: Url,
    base_dir: PathBuf,
}

impl MetadataComposer {
    /// Composer producing image URLs under `gateway`, resolving description
    /// files against the current directory.
    pub fn new(gateway: Url) -> Self {
        Self {
            gateway,
            base_dir: PathBuf::from("."),
        }
    }

    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    /// Canonical URL of stored content: `<gateway>/<remote id>`.
    pub fn content_url(&self, id: &RemoteId) -> String {
        format!("{}/{}", self.gateway.as_str().trim_end_matches('/'), id)
    }

    /// Compose a document.
    ///
    /// Attribute pairs are validated before anything else happens; the first
    /// invalid pair aborts composition and no document is produced.
    pub fn build<S: AsRef<str>>(
        &self,
        template: MetadataTemplate,
        image: &RemoteId,
        name_override: Option<&str>,
        attribute_pairs: &[S],
    ) -> MetadataResult<MetadataDocument> {
        let specs = AttributeSpec::parse_all(attribute_pairs)?;

        let description = match template.description {
            Some(desc) => match desc.strip_prefix(FILE_MARKER) {
                Some(reference) => Some(self.read_description(Path::new(reference))?),
                None => Some(desc),
            },
            None => None,
        };

        let name = match name_override {
            Some(name) => Some(name.to_string()),
            None => template.name,
        };

        let mut attributes = template.attributes.unwrap_or_default();
        attributes.extend(specs.into_iter().map(AttributeSpec::into_attribute));

        let document = MetadataDocument {
            name,
            description,
            image: self.content_url(image),
            attributes,
            extra: template.extra,
        };
        debug!(image = %document.image, attributes = document.attributes.len(), "composed metadata");
        Ok(document)
    }

    fn read_description(&self, reference: &Path) -> MetadataResult<String> {
        let path = self.base_dir.join(reference);
        std::fs::read_to_string(&path).map_err(|source| MetadataError::Description { path, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::Attribute;

    fn composer() -> MetadataComposer {
        MetadataComposer::new(Url::parse("https://arweave.net").unwrap())
    }

    fn rid(s: &str) -> RemoteId {
        RemoteId::new(s).unwrap()
    }

    fn template(json: &str) -> MetadataTemplate {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn appends_attribute_and_sets_image() {
        let doc = composer()
            .build(template(r#"{"attributes": []}"#), &rid("R"), None, &["color=red"])
            .unwrap();
        assert_eq!(doc.attributes, vec![Attribute::new("color", "red")]);
        assert_eq!(doc.image, "https://arweave.net/R");
    }

    #[test]
    fn creates_attributes_when_absent() {
        let doc = composer()
            .build(MetadataTemplate::default(), &rid("R"), None, &[] as &[&str])
            .unwrap();
        assert!(doc.attributes.is_empty());
        let json: serde_json::Value = serde_json::from_slice(&doc.to_canonical_json().unwrap()).unwrap();
        assert_eq!(json["attributes"], serde_json::json!([]));
    }

    #[test]
    fn keeps_template_attributes_before_new_ones_in_input_order() {
        let doc = composer()
            .build(
                template(r#"{"attributes": [{"trait_type": "base", "value": 1}]}"#),
                &rid("R"),
                None,
                &["b=2", "a=1"],
            )
            .unwrap();
        let keys: Vec<_> = doc.attributes.iter().map(|a| a.trait_type.as_str()).collect();
        assert_eq!(keys, ["base", "b", "a"]);
    }

    #[test]
    fn invalid_pairs_abort_composition() {
        for bad in ["=value", "key=", "novalue"] {
            let result = composer().build(
                template(r#"{"attributes": []}"#),
                &rid("R"),
                None,
                &["ok=1", bad],
            );
            assert!(
                matches!(result, Err(MetadataError::InvalidAttribute { .. })),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn invalid_pair_is_reported_before_description_io() {
        // The description file does not exist; the attribute error wins.
        let result = composer().build(
            template(r#"{"description": "file://missing.txt"}"#),
            &rid("R"),
            None,
            &["novalue"],
        );
        assert!(matches!(result, Err(MetadataError::InvalidAttribute { .. })));
    }

    #[test]
    fn description_is_read_from_referenced_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("desc.txt"), "Hello").unwrap();
        let doc = composer()
            .with_base_dir(dir.path())
            .build(
                template(r#"{"description": "file://desc.txt"}"#),
                &rid("R"),
                None,
                &[] as &[&str],
            )
            .unwrap();
        assert_eq!(doc.description.as_deref(), Some("Hello"));
    }

    #[test]
    fn literal_description_is_kept() {
        let doc = composer()
            .build(template(r#"{"description": "plain"}"#), &rid("R"), None, &[] as &[&str])
            .unwrap();
        assert_eq!(doc.description.as_deref(), Some("plain"));
    }

    #[test]
    fn missing_description_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = composer()
            .with_base_dir(dir.path())
            .build(
                template(r#"{"description": "file://nope.txt"}"#),
                &rid("R"),
                None,
                &[] as &[&str],
            )
            .unwrap_err();
        assert!(matches!(err, MetadataError::Description { .. }));
    }

    #[test]
    fn name_override_replaces_template_name() {
        let doc = composer()
            .build(template(r#"{"name": "Base"}"#), &rid("R"), Some("Custom #1"), &[] as &[&str])
            .unwrap();
        assert_eq!(doc.name.as_deref(), Some("Custom #1"));

        let doc = composer()
            .build(template(r#"{"name": "Base"}"#), &rid("R"), None, &[] as &[&str])
            .unwrap();
        assert_eq!(doc.name.as_deref(), Some("Base"));
    }

    #[test]
    fn template_image_is_overwritten() {
        let doc = composer()
            .build(template(r#"{"image": "old.png"}"#), &rid("new"), None, &[] as &[&str])
            .unwrap();
        assert_eq!(doc.image, "https://arweave.net/new");
    }

    #[test]
    fn content_url_tolerates_gateway_path() {
        let composer = MetadataComposer::new(Url::parse("https://gw.example/ar/").unwrap());
        assert_eq!(composer.content_url(&rid("abc")), "https://gw.example/ar/abc");
    }
}
