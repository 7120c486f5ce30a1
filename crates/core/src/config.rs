//! Configuration management for dbfs-upload
//!
//! Credentials come from the process environment first, then from a `.env`
//! file in the working directory, then from an optional TOML file at
//! `~/.config/dbfs-upload/config.toml`.

use crate::error::{Error, Result};
use dirs::home_dir;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration directory name
const CONFIG_DIR: &str = "dbfs-upload";

/// Configuration file name
const CONFIG_FILE: &str = "config.toml";

/// Dotenv file read from the working directory
pub const DOTENV_FILE: &str = ".env";

/// Environment variable holding the workspace URL
pub const HOST_VAR: &str = "DATABRICKS_HOST";

/// Environment variable holding the personal access token
pub const TOKEN_VAR: &str = "DATABRICKS_TOKEN";

/// Local directory whose files are uploaded
pub const SOURCE_DIR: &str = "./data";

/// Remote directory every file lands in
pub const DBFS_DIR: &str = "dbfs:/FileStore/tables";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub databricks: DatabricksConfig,
    pub logging: Option<LoggingConfig>,
}

/// Databricks workspace configuration
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct DatabricksConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl fmt::Debug for DatabricksConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabricksConfig")
            .field("host", &self.host)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl ConfigFile {
    /// Log level from the file, or the default one
    pub fn log_level(&self) -> String {
        self.logging
            .as_ref()
            .map(|l| l.level.clone())
            .unwrap_or_else(default_log_level)
    }
}

/// Workspace URL and access token.
///
/// Nothing is checked here: a bad host or token only shows up when the
/// first request reaches the API.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    host: String,
    token: String,
}

impl Credentials {
    pub fn new(host: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            token: token.into(),
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("host", &self.host)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Config file location under `home`
fn config_path_in(home: Option<PathBuf>) -> Option<PathBuf> {
    home.map(|h| h.join(".config").join(CONFIG_DIR).join(CONFIG_FILE))
}

/// Get the configuration file path
pub fn get_config_path() -> Result<PathBuf> {
    config_path_in(home_dir())
        .ok_or_else(|| Error::Config("Cannot determine home directory".to_string()))
}

/// Parse configuration file contents
pub fn parse_config(content: &str) -> Result<ConfigFile> {
    toml::from_str(content)
        .map_err(|e| Error::InvalidConfig(format!("Failed to parse config file: {}", e)))
}

/// Load the configuration file, `None` when there is none.
///
/// Without a resolvable home directory there is no config file either.
pub fn load_config() -> Result<Option<ConfigFile>> {
    match config_path_in(home_dir()) {
        Some(config_path) => load_config_at(&config_path),
        None => {
            tracing::debug!("no home directory, skipping config file");
            Ok(None)
        }
    }
}

/// Load the configuration file at `config_path`, `None` when it does not exist
pub fn load_config_at(config_path: &Path) -> Result<Option<ConfigFile>> {
    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "no config file");
        return Ok(None);
    }

    let content = fs::read_to_string(config_path).map_err(|e| {
        Error::InvalidConfig(format!("Failed to read config file {}: {}", config_path.display(), e))
    })?;

    parse_config(&content).map(Some)
}

/// Read `KEY=value` pairs from a dotenv file, empty when it does not exist.
///
/// The process environment is left untouched.
pub fn load_dotenv(path: &Path) -> Result<HashMap<String, String>> {
    if !path.exists() {
        return Ok(HashMap::new());
    }

    let invalid = |e: dotenvy::Error| {
        Error::InvalidConfig(format!("Failed to parse {}: {}", path.display(), e))
    };

    let mut vars = HashMap::new();
    for item in dotenvy::from_path_iter(path).map_err(invalid)? {
        let (key, value) = item.map_err(invalid)?;
        vars.insert(key, value);
    }

    tracing::debug!(path = %path.display(), count = vars.len(), "dotenv file loaded");
    Ok(vars)
}

/// Merge an environment lookup with the config file.
///
/// Lookup values win. Empty values count as absent.
pub fn resolve_credentials<F>(lookup: F, file: Option<&ConfigFile>) -> Result<Credentials>
where
    F: Fn(&str) -> Option<String>,
{
    let pick = |var: &'static str, from_file: Option<&String>| -> Result<String> {
        lookup(var)
            .filter(|v| !v.is_empty())
            .or_else(|| from_file.filter(|v| !v.is_empty()).cloned())
            .ok_or(Error::MissingSetting(var))
    };

    let databricks = file.map(|f| &f.databricks);
    let host = pick(HOST_VAR, databricks.and_then(|d| d.host.as_ref()))?;
    let token = pick(TOKEN_VAR, databricks.and_then(|d| d.token.as_ref()))?;

    Ok(Credentials::new(host, token))
}

/// Resolve credentials from the process environment, the dotenv values and
/// the config file, in that order
pub fn load_credentials(
    dotenv: &HashMap<String, String>,
    file: Option<&ConfigFile>,
) -> Result<Credentials> {
    resolve_credentials(|var| env_or_dotenv(var, |v| std::env::var(v).ok(), dotenv), file)
}

fn env_or_dotenv<F>(var: &str, env: F, dotenv: &HashMap<String, String>) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    env(var)
        .filter(|v| !v.is_empty())
        .or_else(|| dotenv.get(var).cloned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    fn file_with(host: Option<&str>, token: Option<&str>) -> ConfigFile {
        ConfigFile {
            databricks: DatabricksConfig {
                host: host.map(str::to_string),
                token: token.map(str::to_string),
            },
            logging: None,
        }
    }

    #[test]
    fn test_resolve_from_env() {
        let creds = resolve_credentials(
            env(&[(HOST_VAR, "https://adb-1.azuredatabricks.net"), (TOKEN_VAR, "dapi123")]),
            None,
        )
        .unwrap();

        assert_eq!(creds.host(), "https://adb-1.azuredatabricks.net");
        assert_eq!(creds.token(), "dapi123");
    }

    #[test]
    fn test_resolve_missing_host() {
        let err = resolve_credentials(env(&[(TOKEN_VAR, "dapi123")]), None).unwrap_err();
        assert!(matches!(err, Error::MissingSetting(HOST_VAR)));
    }

    #[test]
    fn test_resolve_missing_token() {
        let err = resolve_credentials(env(&[(HOST_VAR, "https://h")]), None).unwrap_err();
        assert!(matches!(err, Error::MissingSetting(TOKEN_VAR)));
    }

    #[test]
    fn test_resolve_empty_env_value_is_missing() {
        let err = resolve_credentials(env(&[(HOST_VAR, ""), (TOKEN_VAR, "t")]), None).unwrap_err();
        assert!(matches!(err, Error::MissingSetting(HOST_VAR)));
    }

    #[test]
    fn test_resolve_falls_back_to_file() {
        let file = file_with(Some("https://from-file"), Some("file-token"));
        let creds = resolve_credentials(env(&[]), Some(&file)).unwrap();

        assert_eq!(creds.host(), "https://from-file");
        assert_eq!(creds.token(), "file-token");
    }

    #[test]
    fn test_resolve_env_wins_over_file() {
        let file = file_with(Some("https://from-file"), Some("file-token"));
        let creds = resolve_credentials(env(&[(TOKEN_VAR, "env-token")]), Some(&file)).unwrap();

        assert_eq!(creds.host(), "https://from-file");
        assert_eq!(creds.token(), "env-token");
    }

    #[test]
    fn test_load_dotenv() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(DOTENV_FILE);
        fs::write(
            &path,
            "# workspace\nDATABRICKS_HOST=https://from-dotenv\nDATABRICKS_TOKEN=\"dotenv-token\"\n",
        )
        .unwrap();

        let vars = load_dotenv(&path).unwrap();
        assert_eq!(vars.get(HOST_VAR).map(String::as_str), Some("https://from-dotenv"));
        assert_eq!(vars.get(TOKEN_VAR).map(String::as_str), Some("dotenv-token"));
    }

    #[test]
    fn test_load_dotenv_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(load_dotenv(&dir.path().join(DOTENV_FILE)).unwrap().is_empty());
    }

    #[test]
    fn test_dotenv_between_env_and_file() {
        let dotenv: HashMap<String, String> = [
            (HOST_VAR.to_string(), "https://from-dotenv".to_string()),
            (TOKEN_VAR.to_string(), "dotenv-token".to_string()),
        ]
        .into_iter()
        .collect();
        let file = file_with(Some("https://from-file"), Some("file-token"));
        let process = env(&[(TOKEN_VAR, "env-token")]);

        let creds = resolve_credentials(|var| env_or_dotenv(var, &process, &dotenv), Some(&file)).unwrap();
        assert_eq!(creds.host(), "https://from-dotenv");
        assert_eq!(creds.token(), "env-token");
    }

    #[test]
    fn test_empty_env_value_falls_back_to_dotenv() {
        let dotenv: HashMap<String, String> =
            [(HOST_VAR.to_string(), "https://from-dotenv".to_string())].into_iter().collect();
        let process = env(&[(HOST_VAR, "")]);

        assert_eq!(
            env_or_dotenv(HOST_VAR, &process, &dotenv).as_deref(),
            Some("https://from-dotenv")
        );
    }

    #[test]
    fn test_no_home_means_no_config_file() {
        assert!(config_path_in(None).is_none());

        let path = config_path_in(Some(PathBuf::from("/home/me"))).unwrap();
        assert_eq!(path, PathBuf::from("/home/me/.config/dbfs-upload/config.toml"));
    }

    #[test]
    fn test_load_config_at_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(load_config_at(&dir.path().join(CONFIG_FILE)).unwrap().is_none());
    }

    #[test]
    fn test_parse_config() {
        let config = parse_config(
            r#"
            [databricks]
            host = "https://adb-1.azuredatabricks.net"
            token = "dapi123"

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.databricks.host.as_deref(), Some("https://adb-1.azuredatabricks.net"));
        assert_eq!(config.log_level(), "debug");
    }

    #[test]
    fn test_parse_config_defaults() {
        let config = parse_config("").unwrap();
        assert!(config.databricks.host.is_none());
        assert_eq!(config.log_level(), "info");

        let config = parse_config("[logging]\n").unwrap();
        assert_eq!(config.log_level(), "info");
    }

    #[test]
    fn test_parse_config_invalid() {
        assert!(matches!(
            parse_config("[databricks\nhost = 1"),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_debug_redacts_token() {
        let creds = Credentials::new("https://h", "super-secret");
        assert!(!format!("{:?}", creds).contains("super-secret"));

        let file = file_with(Some("https://h"), Some("super-secret"));
        assert!(!format!("{:?}", file).contains("super-secret"));
    }
}
