//! Error types for dbfs-upload-core

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for dbfs-upload-core
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for dbfs-upload-core
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Required setting absent from both the environment and the config file
    #[error("Missing required setting {0} (set it in the environment or in the config file)")]
    MissingSetting(&'static str),

    /// Invalid configuration format
    #[error("Invalid configuration format: {0}")]
    InvalidConfig(String),

    /// Source directory could not be listed
    #[error("Cannot read directory {}: {source}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// One file of a batch failed
    #[error("Failed to upload {} to {dest}", path.display())]
    Upload {
        path: PathBuf,
        dest: String,
        #[source]
        source: Box<Error>,
    },

    /// Remote path rejected locally or by the API
    #[error("Invalid DBFS path: {0}")]
    InvalidPath(String),

    /// Authentication error
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Permission denied
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Destination exists and overwrite was not requested
    #[error("File already exists: {0}")]
    AlreadyExists(String),

    /// Not found error
    #[error("Not found: {0}")]
    NotFound(String),

    /// Any other error response from the DBFS API
    #[error("DBFS API error (HTTP {status}) {code}: {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    /// Network error
    #[error("Network error: {0}")]
    Network(String),

    /// HTTP client error
    #[error("HTTP client error: {0}")]
    HttpClient(String),

    /// Timeout
    #[error("Operation timed out")]
    Timeout,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::Timeout
        } else if err.is_connect() {
            Error::Network(err.to_string())
        } else if err.is_request() || err.is_builder() {
            Error::HttpClient(err.to_string())
        } else {
            Error::Network(err.to_string())
        }
    }
}
