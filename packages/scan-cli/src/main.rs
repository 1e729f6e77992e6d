//! Resolve product barcodes into product facts plus a brand ethics finding.
//!
//! The report goes to stdout (text or JSON); logs go to stderr.

mod config;
mod render;
mod wiring;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ethical_scan::{classify, Barcode};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::render::render_text;
use crate::wiring::build_resolver;

#[derive(Parser)]
#[command(name = "ethical-scan")]
#[command(about = "Look up product facts and brand ethics for barcodes")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve one or more decoded barcodes
    Resolve {
        /// Barcode digits, as decoded from the symbol
        #[arg(required = true)]
        barcodes: Vec<String>,

        /// Print the report as pretty JSON
        #[arg(long)]
        json: bool,

        /// Brand ratings dataset (overrides BRAND_RATINGS_PATH)
        #[arg(long, value_name = "PATH")]
        ratings: Option<PathBuf>,
    },

    /// Show which domain a category string classifies into
    Classify { category: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,ethical_scan=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Resolve {
            barcodes,
            json,
            ratings,
        } => cmd_resolve(&barcodes, json, ratings).await,
        Commands::Classify { category } => {
            println!("{}", classify(&category));
            Ok(())
        }
    }
}

async fn cmd_resolve(raw: &[String], json: bool, ratings: Option<PathBuf>) -> Result<()> {
    let barcodes = raw
        .iter()
        .map(|code| Barcode::parse(code).with_context(|| format!("Cannot resolve {:?}", code)))
        .collect::<Result<Vec<_>>>()?;

    let config = Config::from_env();
    tracing::debug!(?config, "Configuration loaded");

    let resolver = build_resolver(&config, ratings).context("Failed to assemble resolver")?;
    let reports = resolver.resolve_many(&barcodes).await;

    if json {
        let output = if reports.len() == 1 {
            serde_json::to_string_pretty(&reports[0])?
        } else {
            serde_json::to_string_pretty(&reports)?
        };
        println!("{}", output);
    } else {
        let texts: Vec<String> = reports.iter().map(render_text).collect();
        print!("{}", texts.join("\n"));
    }

    Ok(())
}
