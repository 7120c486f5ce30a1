use anyhow::Result;
use clap::Parser;
use color_eyre::config::HookBuilder;

mod handlers;

/// dbfs-upload - upload ./data to dbfs:/FileStore/tables
#[derive(Parser, Debug)]
#[command(name = "dbfs-upload")]
#[command(version)]
#[command(about = "Upload every file in ./data to dbfs:/FileStore/tables", long_about = None)]
#[command(after_help = "\
Environment:
  DATABRICKS_HOST    Workspace URL, e.g. https://adb-123.azuredatabricks.net
  DATABRICKS_TOKEN   Personal access token
  RUST_LOG           Log filter (default: info)

Values missing from the environment are read from ./.env, then from
~/.config/dbfs-upload/config.toml ([databricks] host / token).
Existing remote files are overwritten.")]
struct Cli {}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Setup error handling
    if let Err(e) = HookBuilder::default().install() {
        eprintln!("Warning: Failed to install error handler: {}", e);
    }

    // Only --help / --version; behavior comes from the environment
    let _cli = Cli::parse();

    handlers::handle_upload().await
}
