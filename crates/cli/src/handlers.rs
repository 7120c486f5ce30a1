//! Command handlers for the dbfs-upload CLI

use anyhow::{Context, Result};
use dbfs_upload_core::{
    load_config, load_credentials, load_dotenv, DbfsClient, Uploader, DBFS_DIR, DOTENV_FILE,
    SOURCE_DIR,
};
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Overwrite existing remote files
const OVERWRITE: bool = true;

/// Load settings, then upload the source directory
pub async fn handle_upload() -> Result<()> {
    let config = load_config().context("Failed to load configuration")?;

    let default_level = config
        .as_ref()
        .map(|c| c.log_level())
        .unwrap_or_else(|| "info".to_string());
    init_logging(&default_level);

    let dotenv = load_dotenv(Path::new(DOTENV_FILE)).context("Failed to load .env file")?;
    let credentials =
        load_credentials(&dotenv, config.as_ref()).context("Failed to load credentials")?;
    tracing::debug!(host = credentials.host(), "credentials loaded");

    let client = DbfsClient::new(credentials);
    let uploader = Uploader::new(client, SOURCE_DIR, DBFS_DIR);

    uploader
        .upload_files(OVERWRITE)
        .await
        .with_context(|| format!("Failed to upload {} to {}", SOURCE_DIR, DBFS_DIR))?;

    Ok(())
}

/// Structured logging to stderr; RUST_LOG wins over the config file
fn init_logging(default_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}
