use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "permapub",
    about = "Publish images and metadata to permanent storage, paying once per content",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Base metadata template [env: BASE_METADATA, default: base.json]
    #[arg(long, global = true)]
    pub base: Option<PathBuf>,

    /// Upload ledger store [env: UPLOADED_LIST, default: uploaded.json]
    #[arg(long, global = true)]
    pub ledger: Option<PathBuf>,

    /// Directory for metadata artifacts [env: OUTPUT_DIR, default: output]
    #[arg(long, global = true)]
    pub output_dir: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show the node balance of the configured wallet
    Balance,
    /// Fund the node account from the configured wallet
    Fund(FundArgs),
    /// Upload an image and publish its metadata
    Upload(UploadArgs),
}

#[derive(Args)]
pub struct FundArgs {
    /// Amount in display units, e.g. 0.05
    #[arg(short, long)]
    pub amount: String,
}

#[derive(Args)]
pub struct UploadArgs {
    /// Image file to upload
    #[arg(short, long)]
    pub image: Option<PathBuf>,
    /// Token id; names the metadata artifact `<output dir>/<id>.json`
    #[arg(long)]
    pub id: Option<String>,
    /// Overrides the template name
    #[arg(short, long)]
    pub name: Option<String>,
    /// Attribute as key=value, repeatable
    #[arg(short, long = "attr")]
    pub attr: Vec<String>,
}
