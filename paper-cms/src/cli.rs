//! # paper-cms CLI Interface (Module)
//!
//! Command parsing and the async entrypoint for the `paper-cms` binary.
//!
//! All pipeline logic (fetching, filtering, assembling, writing) lives in
//! `paper-cms-core`. This module is strictly CLI glue: it loads configuration,
//! builds the API client and hands both to the core.
//!
//! - [`Cli`] defines the user-facing subcommands.
//! - [`run`] is the programmatic entrypoint used by `main` and integration tests.
use crate::load_config::{api_config, load_config, sync_config};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use paper_cms_core::paper_api::PaperClient;
use paper_cms_core::persist::manifest_entries;
use paper_cms_core::synchronise::{fetch_paper_docs, synchronise};
use std::path::PathBuf;

/// CLI for paper-cms: publish Dropbox Paper folders as static site content.
#[derive(Parser)]
#[clap(
    name = "paper-cms",
    version,
    about = "Publish Dropbox Paper documents as Markdown content with a generated site sidebar"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch all allowed documents, write them with a manifest, and regenerate the site sidebar
    Sync {
        /// Path to the YAML config file
        #[clap(long)]
        config: PathBuf,
    },
    /// Fetch and assemble all allowed documents without writing; print the manifest as JSON
    Fetch {
        /// Path to the YAML config file
        #[clap(long)]
        config: PathBuf,
    },
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    // Emit a top-level 'trace_initialised' event at the very start
    tracing::info!("trace_initialised");

    match cli.command {
        Commands::Sync { config } => {
            let config = load_config(config)?;
            // Site config problems surface before any request is made.
            let sync = sync_config(&config)?;
            let client = PaperClient::new(api_config(&config)?)?;
            tracing::info!(command = "sync", "Starting synchronisation");

            match synchronise(&client, &sync).await {
                Ok(docs) => {
                    tracing::info!(command = "sync", documents = docs.len(), "Synchronisation complete");
                    println!(
                        "Synchronised {} documents into {}",
                        docs.len(),
                        sync.content_dir.display()
                    );
                    Ok(())
                }
                Err(e) => {
                    tracing::error!(command = "sync", error = %e, "Synchronisation failed");
                    Err(anyhow::Error::new(e).context("Synchronisation failed"))
                }
            }
        }
        Commands::Fetch { config } => {
            let config = load_config(config)?;
            let client = PaperClient::new(api_config(&config)?)?;
            tracing::info!(command = "fetch", "Fetching documents");

            let docs = fetch_paper_docs(&client, &config.content_dir, &config.sections)
                .await
                .map_err(|e| {
                    tracing::error!(command = "fetch", error = %e, "Fetch failed");
                    anyhow::Error::new(e).context("Fetch failed")
                })?;
            let json = serde_json::to_string_pretty(&manifest_entries(&docs))
                .context("Failed to serialize manifest")?;
            println!("{json}");
            Ok(())
        }
    }
}
