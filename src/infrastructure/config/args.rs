use super::app_config::LogLevel;
use crate::infrastructure::pexels::Orientation;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "pexgrid",
    version,
    about = "Search Pexels for photos from the terminal",
    long_about = None
)]
pub struct CliArgs {
    /// Search query.
    pub query: String,

    /// Number of result pages to load.
    #[arg(short, long, default_value_t = 1)]
    pub pages: u32,

    /// Download every thumbnail and report its decoded size.
    #[arg(short, long)]
    pub thumbnails: bool,

    /// Load the full-size image of the result with this id.
    #[arg(long, value_name = "ID")]
    pub open: Option<String>,

    /// Configuration file path.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Results per page (1-80).
    #[arg(long)]
    pub per_page: Option<u32>,

    /// Orientation filter.
    #[arg(long, value_enum)]
    pub orientation: Option<Orientation>,

    /// Pexels API key.
    #[arg(long, env = "PEXELS_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,
}
