//! Infrastructure layer with external service adapters.

/// Application configuration.
pub mod config;
/// HTTP transport.
pub mod http;
/// Pexels search API client.
pub mod pexels;

pub use config::{AppConfig, CliArgs, ConfigError, LogLevel, StorageManager};
pub use http::HttpTransport;
pub use pexels::{Orientation, PexelsClient, PexelsOptions};
