//! dbfs-upload-core - Core library for the dbfs-upload CLI
//!
//! This library uploads the regular files of a local directory into a
//! Databricks File System (DBFS) directory through the DBFS REST API,
//! including configuration loading and the REST client itself.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod path;
pub mod uploader;

// Re-export commonly used types
pub use api::{put_file, DbfsApi, Handle, BLOCK_SIZE};
pub use client::DbfsClient;
pub use config::{
    get_config_path, load_config, load_config_at, load_credentials, load_dotenv,
    resolve_credentials, ConfigFile, Credentials, DBFS_DIR, DOTENV_FILE, HOST_VAR, SOURCE_DIR,
    TOKEN_VAR,
};
pub use error::{Error, Result};
pub use path::DbfsPath;
pub use uploader::{list_source_files, remote_path_for, FileEntry, Uploader};
