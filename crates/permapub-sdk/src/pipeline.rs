//! The `balance`, `fund` and `upload` operations.

use std::path::PathBuf;

use permapub_client::{Currency, StorageNetwork};
use permapub_crypto::{Address, U256};
use permapub_metadata::{AttributeSpec, MetadataDocument, MetadataTemplate};
use tracing::info;

use crate::context::PublishContext;
use crate::error::{SdkError, SdkResult};
use crate::estimator::{CostEstimator, Price};
use crate::publisher::{validate_output_name, MetadataPublisher, PublishedMetadata};
use crate::uploader::{Resolution, Uploader};

/// Inputs of one `upload` invocation. `image` and `id` are required but
/// validated by [`Publisher::upload`] rather than by the type.
#[derive(Clone, Debug, Default)]
pub struct UploadRequest {
    pub image: Option<PathBuf>,
    pub id: Option<String>,
    pub name: Option<String>,
    /// `key=value` pairs, appended in order.
    pub attributes: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct UploadReport {
    pub price: Price,
    pub image: Resolution,
    pub image_url: String,
    pub document: MetadataDocument,
    pub metadata: PublishedMetadata,
    pub metadata_url: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Balance {
    pub address: Address,
    pub base_units: U256,
    pub display: String,
    pub currency: Currency,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Funding {
    pub tx_id: String,
    pub quantity: U256,
    pub display: String,
    pub currency: Currency,
}

/// Runs operations against a [`PublishContext`].
pub struct Publisher<'a> {
    ctx: &'a PublishContext,
}

impl<'a> Publisher<'a> {
    pub fn new(ctx: &'a PublishContext) -> Self {
        Self { ctx }
    }

    fn network(&self) -> &dyn StorageNetwork {
        self.ctx.network()
    }

    /// Node balance of the context wallet.
    pub async fn balance(&self) -> SdkResult<Balance> {
        let address = self.ctx.wallet().address();
        let base_units = self.network().get_balance(address).await?;
        Ok(Balance {
            address,
            base_units,
            display: self.network().convert(base_units)?,
            currency: self.network().currency(),
        })
    }

    /// Fund the node account with `amount` display units (`"0.05"`).
    pub async fn fund(&self, amount: &str) -> SdkResult<Funding> {
        let currency = self.network().currency();
        let base_units = currency.parse(amount)?;
        let receipt = self.network().fund(base_units).await?;
        info!(tx_id = %receipt.id, quantity = %receipt.quantity, "funded");
        Ok(Funding {
            display: self.network().convert(receipt.quantity)?,
            tx_id: receipt.id,
            quantity: receipt.quantity,
            currency,
        })
    }

    /// Publish an image and its metadata document.
    ///
    /// Every local input (arguments, attribute pairs, template) is checked
    /// before the first network call, so invalid input never costs an
    /// upload.
    pub async fn upload(&self, request: UploadRequest) -> SdkResult<UploadReport> {
        let image = request
            .image
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or(SdkError::MissingImage)?;
        let id = request
            .id
            .filter(|id| !id.is_empty())
            .ok_or(SdkError::MissingId)?;
        validate_output_name(&id)?;
        AttributeSpec::parse_all(&request.attributes)?;

        let template = MetadataTemplate::load(&self.ctx.paths().base_template)?;
        let size = std::fs::metadata(&image)
            .map_err(|e| SdkError::io(&image, e))?
            .len();

        let price = CostEstimator::new(self.network()).estimate(size).await?;
        info!(image = %image.display(), bytes = size, price = %price, "storage cost");

        let uploader = Uploader::new(self.network(), self.ctx.ledger());
        let image_res = uploader.resolve_or_upload(&image).await?;
        let composer = self.ctx.composer();

        let document = composer.build(
            template,
            &image_res.id,
            request.name.as_deref(),
            &request.attributes,
        )?;
        let metadata = MetadataPublisher::new(&uploader, &self.ctx.paths().output_dir)
            .publish(&document, &id)
            .await?;

        let metadata_url = composer.content_url(&metadata.resolution.id);
        info!(id = %id, metadata = %metadata_url, "published");
        Ok(UploadReport {
            price,
            image_url: document.image.clone(),
            image: image_res,
            document,
            metadata,
            metadata_url,
        })
    }
}
