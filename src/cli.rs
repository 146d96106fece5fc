use clap::Parser;

use crate::types::LogLevel;

#[derive(Parser, Debug)]
#[command(
    name = "sdrive",
    version,
    about = "Download a file or folder from a Google Drive share link"
)]
pub struct Cli {
    /// Google Drive share link (file or folder)
    pub link: String,

    /// Local directory the file or folder is written into
    #[arg(short = 'd', long, default_value = ".")]
    pub directory: String,

    /// OAuth access token for the Drive API.
    /// WARNING: passing via --access-token is visible in process listings.
    /// Prefer the SDRIVE_ACCESS_TOKEN environment variable instead.
    #[arg(long, env = "SDRIVE_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    /// JSON file holding {"access_token": "..."}, re-read before each request
    #[arg(long, default_value = "~/.sdrive/token.json")]
    pub token_file: String,

    /// Attempts per file (metadata fetch plus transfer) before giving up on it
    #[arg(long, default_value_t = 10)]
    pub max_attempts: u32,

    /// Seconds between connectivity probes while waiting for the network
    #[arg(long, default_value_t = 5)]
    pub connectivity_interval: u64,

    /// Give up waiting for connectivity after N seconds (default: wait forever)
    #[arg(long)]
    pub connectivity_max_wait: Option<u64>,

    /// Log level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,

    /// Disable progress bar
    #[arg(long)]
    pub no_progress_bar: bool,
}
