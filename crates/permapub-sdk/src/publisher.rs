use std::path::{Path, PathBuf};

use permapub_metadata::MetadataDocument;
use tracing::info;

use crate::error::{SdkError, SdkResult};
use crate::uploader::{Resolution, Uploader};

/// Metadata document written locally and resolved through the ledger.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublishedMetadata {
    /// Local artifact, `<output dir>/<name>.json`.
    pub path: PathBuf,
    pub resolution: Resolution,
}

/// Writes metadata artifacts and uploads them through an [`Uploader`], so
/// metadata is deduplicated exactly like images.
pub struct MetadataPublisher<'a> {
    uploader: &'a Uploader<'a>,
    output_dir: PathBuf,
}

impl<'a> MetadataPublisher<'a> {
    pub fn new(uploader: &'a Uploader<'a>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            uploader,
            output_dir: output_dir.into(),
        }
    }

    /// Path of the artifact for `output_name`.
    pub fn artifact_path(&self, output_name: &str) -> PathBuf {
        artifact_path(&self.output_dir, output_name)
    }

    /// Serialize `document`, write it to the artifact for `output_name`
    /// (overwriting any previous one), then resolve the artifact.
    pub async fn publish(
        &self,
        document: &MetadataDocument,
        output_name: &str,
    ) -> SdkResult<PublishedMetadata> {
        validate_output_name(output_name)?;
        let bytes = document.to_canonical_json()?;

        std::fs::create_dir_all(&self.output_dir)
            .map_err(|e| SdkError::io(&self.output_dir, e))?;
        let path = self.artifact_path(output_name);
        std::fs::write(&path, &bytes).map_err(|e| SdkError::io(&path, e))?;
        info!(path = %path.display(), bytes = bytes.len(), "wrote metadata");

        let resolution = self.uploader.resolve_or_upload(&path).await?;
        Ok(PublishedMetadata { path, resolution })
    }
}

pub(crate) fn artifact_path(output_dir: &Path, output_name: &str) -> PathBuf {
    output_dir.join(format!("{output_name}.json"))
}

/// Output names become file stems and must stay inside the output directory.
pub(crate) fn validate_output_name(name: &str) -> SdkResult<()> {
    if name.is_empty() {
        return Err(SdkError::MissingId);
    }
    if name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(SdkError::InvalidId(name.to_string()));
    }
    Ok(())
}
