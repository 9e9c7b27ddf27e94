use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::browser::ChromiumBrowser;
use crate::load_config::load_config;
use crate::synchronise::synchronise;

/// CLI for gemini-archive: snapshot shared conversations into a local
/// self-contained HTML archive.
#[derive(Parser)]
#[clap(
    name = "gemini-archive",
    version,
    about = "Synchronise a directory of self-contained HTML snapshots with the shared conversations referenced from markdown files"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Reconcile the archive against discovered share links using the given config file
    Sync {
        /// Path to the YAML config file
        #[clap(long)]
        config: PathBuf,
    },
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    tracing::info!("trace_initialised");

    match cli.command {
        Commands::Sync { config } => {
            let config = load_config(config)?;

            let browser = ChromiumBrowser::launch()
                .await
                .map_err(|e| anyhow::anyhow!("Failed to launch browser: {e}"))?;
            println!("Synchronise starting...");
            let result = synchronise(&config, &browser).await;
            // The browser context outlives every page; shut it down before
            // surfacing the run result.
            if let Err(e) = browser.close().await {
                tracing::warn!(error = %e, "Failed to close browser cleanly");
            }

            match result {
                Ok(report) => {
                    println!("Synchronise complete.\nReport:");
                    println!("{:#?}", report);
                    Ok(())
                }
                Err(e) => {
                    eprintln!("[ERROR] Synchronisation failed: {}", e);
                    Err(anyhow::Error::msg(e))
                }
            }
        }
    }
}
