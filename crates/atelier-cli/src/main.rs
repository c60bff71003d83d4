//! Atelier CLI: run the image ingest pipeline and the pricing calculator
//! from a terminal.
//!
//! Storage and compression settings come from the environment (and `.env`),
//! see `atelier_core::Config`.

use std::path::{Path, PathBuf};

use anyhow::Context;
use atelier_cli::{content_type_for, init_tracing, resolve_context};
use atelier_core::pricing::{apply_discount, quote_from_earnings};
use atelier_core::validation::{validate_price, PriceBounds};
use atelier_core::{log_error, Config, ErrorMetadata, FeeSchedule, ProcessedAsset, RawAsset};
use atelier_processing::progress;
use atelier_processing::{
    decode_and_crop, ContentDigest, IngestPipeline, IterativeCompressor, UploadError,
};
use atelier_storage::create_storage;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Parser)]
#[command(name = "atelier", about = "Atelier image ingest and pricing tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Crop, compress and store an image, reusing an identical stored copy
    Ingest {
        /// Path to the image
        file: PathBuf,
        /// Target folder, normalized to storage-safe segments
        #[arg(long, conflicts_with_all = ["purpose", "identity"])]
        folder: Option<String>,
        /// Folder purpose, e.g. "products" or "avatars"
        #[arg(long, requires = "identity")]
        purpose: Option<String>,
        /// Owner identity (e.g. an email address), sanitized before use
        #[arg(long, requires = "purpose")]
        identity: Option<String>,
        /// Folder date as YYYY-MM-DD (default: today, UTC)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Crop and compress an image locally and print its content digest
    Digest {
        /// Path to the image
        file: PathBuf,
    },
    /// List stored objects directly inside a folder
    List {
        /// Folder to list
        folder: String,
    },
    /// Quote platform fee and artist earnings for a listing
    Price {
        /// Listing price
        #[arg(long, conflicts_with = "earnings", required_unless_present = "earnings")]
        listing: Option<Decimal>,
        /// Desired artist earnings; derives the listing price
        #[arg(long)]
        earnings: Option<Decimal>,
        /// Discount price, dropped unless below the listing price
        #[arg(long)]
        discount: Option<Decimal>,
    },
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

fn load_config() -> anyhow::Result<Config> {
    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

async fn read_asset(file: &Path) -> anyhow::Result<RawAsset> {
    let data = tokio::fs::read(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let file_name = file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "file".to_string());
    let content_type = content_type_for(&file_name);
    Ok(RawAsset::new(data, content_type, file_name))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Ingest {
            file,
            folder,
            purpose,
            identity,
            date,
        } => {
            let config = load_config()?;
            let context = resolve_context(
                folder.as_deref(),
                purpose.as_deref(),
                identity.as_deref(),
                date,
            )?;
            let asset = read_asset(&file).await?;

            let storage = create_storage(&config)
                .await
                .context("Failed to create storage backend")?;

            let (tx, mut rx) = progress::channel();
            let reporter = tokio::spawn(async move {
                while let Some(event) = rx.recv().await {
                    tracing::info!(event = ?event, "Ingest progress");
                }
            });

            let pipeline = IngestPipeline::from_config(storage, &config).with_progress(tx);
            let result = pipeline.ingest(asset, &context).await;
            drop(pipeline);
            if let Err(e) = reporter.await {
                tracing::debug!(error = %e, "Progress reporter stopped");
            }

            match result {
                Ok(stored) => print_json(&stored)?,
                Err(e) => {
                    log_error(&e, "ingest");
                    anyhow::bail!("{} ({})", e.client_message(), e.kind());
                }
            }
        }
        Commands::Digest { file } => {
            let config = Config::from_env().context("Failed to load configuration")?;
            config.compression.validate()?;
            let asset = read_asset(&file).await?;

            let target_max_bytes = config.compression.target_max_bytes;
            let compressor = IterativeCompressor::new(config.compression.clone());
            let processed = tokio::task::spawn_blocking(
                move || -> Result<ProcessedAsset, UploadError> {
                    let square = decode_and_crop(&asset.data)?;
                    compressor.compress(&square)
                },
            )
            .await??;

            let digest = ContentDigest::compute(config.digest_algorithm, processed.data());
            print_json(&serde_json::json!({
                "digest": digest.to_string(),
                "algorithm": digest.algorithm().to_string(),
                "content_type": processed.content_type(),
                "width": processed.width(),
                "height": processed.height(),
                "size_bytes": processed.size_bytes(),
                "attempts": processed.attempts(),
                "quality": processed.quality(),
                "within_budget": processed.size_bytes() <= target_max_bytes,
            }))?;
        }
        Commands::List { folder } => {
            let config = load_config()?;
            let storage = create_storage(&config)
                .await
                .context("Failed to create storage backend")?;

            let entries = storage.list(&folder).await?;
            let listing: Vec<_> = entries
                .iter()
                .map(|entry| {
                    serde_json::json!({
                        "path": entry.path,
                        "name": entry.name,
                        "size_bytes": entry.size_bytes,
                        "public_url": storage.public_url(&entry.path),
                    })
                })
                .collect();
            print_json(&listing)?;
        }
        Commands::Price {
            listing,
            earnings,
            discount,
        } => {
            let schedule = FeeSchedule::default();
            let listing_price = match (listing, earnings) {
                (Some(listing), _) => listing,
                (None, Some(earnings)) => quote_from_earnings(&schedule, earnings)?.listing_price,
                (None, None) => anyhow::bail!("Pass --listing or --earnings"),
            };
            validate_price(listing_price, PriceBounds::default())?;

            let quote = apply_discount(&schedule, listing_price, discount)?;
            print_json(&quote)?;
        }
    }

    Ok(())
}
