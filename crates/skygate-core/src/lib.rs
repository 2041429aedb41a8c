pub mod client;
pub mod config;
pub mod error;

pub use client::ApiClient;
pub use config::{ApiConfig, Config, DisplayConfig, SessionConfig, ValidationResult};
pub use error::{ApiError, FailureKind};

use anyhow::Result;

/// Initialize logging. Safe to call more than once; later calls are no-ops.
pub fn init() -> Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();

    tracing::info!("Skygate core initialized");
    Ok(())
}
