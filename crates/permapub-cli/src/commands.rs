use anyhow::Context;
use colored::Colorize;
use permapub_client::ClientConfig;
use permapub_sdk::{PublishContext, PublishPaths, Publisher, UploadRequest};
use serde_json::json;

use crate::cli::*;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let ctx = build_context(&cli)?;
    let publisher = Publisher::new(&ctx);
    let format = cli.format;

    match cli.command {
        Command::Balance => cmd_balance(&publisher, format).await,
        Command::Fund(args) => cmd_fund(&publisher, args, format).await,
        Command::Upload(args) => cmd_upload(&publisher, args, format).await,
    }
}

fn build_context(cli: &Cli) -> anyhow::Result<PublishContext> {
    let config = ClientConfig::from_env().context("loading configuration")?;
    let mut paths = PublishPaths::from_env();
    if let Some(base) = &cli.base {
        paths.base_template = base.clone();
    }
    if let Some(ledger) = &cli.ledger {
        paths.ledger = ledger.clone();
    }
    if let Some(dir) = &cli.output_dir {
        paths.output_dir = dir.clone();
    }
    PublishContext::from_config(&config, paths).context("initializing wallet and node client")
}

async fn cmd_balance(publisher: &Publisher<'_>, format: OutputFormat) -> anyhow::Result<()> {
    let balance = publisher.balance().await.context("querying balance")?;
    match format {
        OutputFormat::Json => print_json(json!({
            "address": balance.address.to_string(),
            "balance": balance.base_units.to_string(),
            "display": balance.display,
            "currency": balance.currency,
        })),
        OutputFormat::Text => {
            println!("Address: {}", balance.address.to_string().cyan());
            println!(
                "Balance: {} {} ({} base units)",
                balance.display.bold(),
                balance.currency.ticker(),
                balance.base_units.to_string().dimmed()
            );
        }
    }
    Ok(())
}

async fn cmd_fund(publisher: &Publisher<'_>, args: FundArgs, format: OutputFormat) -> anyhow::Result<()> {
    let funding = publisher
        .fund(&args.amount)
        .await
        .with_context(|| format!("funding {}", args.amount))?;
    match format {
        OutputFormat::Json => print_json(json!({
            "id": funding.tx_id,
            "quantity": funding.quantity.to_string(),
            "display": funding.display,
            "currency": funding.currency,
        })),
        OutputFormat::Text => {
            println!("{} Funded {} {}", "✓".green().bold(), funding.display.bold(), funding.currency.ticker());
            println!("  Transaction: {}", funding.tx_id.yellow());
            println!("  Quantity: {} base units", funding.quantity);
        }
    }
    Ok(())
}

async fn cmd_upload(publisher: &Publisher<'_>, args: UploadArgs, format: OutputFormat) -> anyhow::Result<()> {
    let request = UploadRequest {
        image: args.image,
        id: args.id,
        name: args.name,
        attributes: args.attr,
    };
    let report = publisher.upload(request).await?;

    let status = |cached: bool| if cached { "cached" } else { "uploaded" };
    match format {
        OutputFormat::Json => print_json(json!({
            "price": {
                "bytes": report.price.bytes,
                "base_units": report.price.base_units.to_string(),
                "display": report.price.display,
                "currency": report.price.currency,
            },
            "image": {
                "id": report.image.id.as_str(),
                "url": report.image_url,
                "cached": report.image.cached,
            },
            "metadata": {
                "id": report.metadata.resolution.id.as_str(),
                "url": report.metadata_url,
                "path": report.metadata.path.display().to_string(),
                "cached": report.metadata.resolution.cached,
            },
        })),
        OutputFormat::Text => {
            println!(
                "Storage cost for {} bytes: {}",
                report.price.bytes,
                report.price.to_string().bold()
            );
            println!(
                "  Image:    {} ({})",
                report.image_url.cyan(),
                status(report.image.cached).dimmed()
            );
            println!(
                "  Metadata: {} ({})",
                report.metadata_url.cyan(),
                status(report.metadata.resolution.cached).dimmed()
            );
            println!("  Written:  {}", report.metadata.path.display());
            println!("{} {}", "✓".green().bold(), report.metadata_url.bold());
        }
    }
    Ok(())
}

fn print_json(value: serde_json::Value) {
    println!("{value}");
}
