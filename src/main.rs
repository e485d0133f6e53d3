use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use pexgrid::application::{FullImageLoader, ImageByteCache, SearchPaginator};
use pexgrid::infrastructure::{AppConfig, CliArgs, HttpTransport, PexelsClient, StorageManager};
use pexgrid::presentation::{Console, ConsoleOptions};

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = config.effective_log_path() {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    Ok(())
}

fn load_config(args: &CliArgs) -> Result<AppConfig> {
    let storage = StorageManager::new()?;
    let mut config = storage
        .load_config(args.config.as_deref())
        .wrap_err("Failed to load configuration")?;
    config.merge_with_args(args);
    Ok(config)
}

fn create_console(config: &AppConfig) -> Result<Console> {
    let api_key = config.api_key()?;
    let provider = Arc::new(PexelsClient::with_options(api_key, config.pexels_options())?);
    let transport = Arc::new(HttpTransport::new(config.timeout())?);

    let cache = ImageByteCache::new(transport);
    let paginator = SearchPaginator::new(provider);
    let viewer = FullImageLoader::new(cache.clone());

    Ok(Console::new(paginator, cache, viewer))
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();

    let args = CliArgs::parse();
    let config = load_config(&args)?;

    init_logging(&config)?;

    info!(name = pexgrid::NAME, version = pexgrid::VERSION, "Starting");

    let console = create_console(&config)?;
    let options = ConsoleOptions {
        query: args.query,
        pages: args.pages,
        thumbnails: args.thumbnails,
        open: args.open,
        max_concurrent_downloads: config.max_concurrent_downloads,
    };

    let mut stdout = std::io::stdout().lock();
    console.run(&options, &mut stdout).await
}
