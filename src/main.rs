//! sdrive: download a file or folder from a Google Drive share link.
//!
//! Folders are mirrored recursively, one file at a time. Every transfer is a
//! ranged GET starting at the size of the local file, so an interrupted run
//! picks up where it stopped. Failed transfers wait for the network to come
//! back and retry up to a fixed ceiling.

#![warn(clippy::all)]

mod auth;
mod cli;
mod config;
mod connectivity;
mod download;
mod drive;
mod link;
pub mod retry;
mod shutdown;
mod types;

use std::time::Instant;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use download::format::{format_duration, format_size};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = match cli::Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // clap's own exit would use 2 for usage errors
            let _ = e.print();
            std::process::exit(if e.use_stderr() { 1 } else { 0 });
        }
    };

    let config = config::Config::from_cli(cli)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_filter())),
        )
        .init();
    tracing::debug!(?config, "Starting sdrive");

    let Some(item_id) = link::extract_id(&config.link) else {
        anyhow::bail!("Invalid Google Drive link: {}", config.link);
    };
    tracing::debug!("Resolved link to id {}", item_id);

    let tokens = auth::select_token_source(config.access_token.clone(), &config.token_file)?;
    let http = drive::client::build_http_client()?;
    let drive_client = drive::HttpDriveClient::new(http.clone(), tokens);

    let shutdown_token = shutdown::install_signal_handler()?;
    let connectivity = connectivity::ProbeConnectivity::new(
        http.clone(),
        config.connectivity_interval,
        config.connectivity_max_wait,
        shutdown_token.clone(),
    );
    let progress = download::progress::IndicatifReporter::new(config.no_progress_bar);
    let download_config = download::DownloadConfig {
        retry: retry::RetryConfig {
            max_attempts: config.max_attempts,
        },
    };

    let downloader = download::Downloader::new(
        &drive_client,
        &http,
        &connectivity,
        &progress,
        &download_config,
        shutdown_token.clone(),
    );

    let started = Instant::now();
    let total = downloader.download_item(item_id, &config.directory).await?;

    if shutdown_token.is_cancelled() {
        tracing::info!(
            "Interrupted after {}; run again to resume",
            format_size(total)
        );
    } else {
        tracing::info!(
            "Total downloaded: {} in {}",
            format_size(total),
            format_duration(started.elapsed())
        );
    }

    Ok(())
}
