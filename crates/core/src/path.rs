//! DBFS path handling

use crate::error::{Error, Result};
use std::fmt;

/// Scheme prefix of every DBFS path
const DBFS_SCHEME: &str = "dbfs:";

/// A remote path in the `dbfs:/...` namespace
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DbfsPath {
    absolute: String,
}

impl DbfsPath {
    /// Parse a `dbfs:/` path
    pub fn new(path: &str) -> Result<Self> {
        let absolute = path
            .strip_prefix(DBFS_SCHEME)
            .filter(|rest| rest.starts_with('/'))
            .ok_or_else(|| {
                Error::InvalidPath(format!("{} (expected a path starting with dbfs:/)", path))
            })?;

        Ok(Self {
            absolute: absolute.to_string(),
        })
    }

    /// Path without the scheme, as the REST API expects it
    pub fn absolute_path(&self) -> &str {
        &self.absolute
    }

    /// Append one path component
    pub fn join(&self, name: &str) -> Result<Self> {
        if name.is_empty() || name.contains('/') {
            return Err(Error::InvalidPath(format!(
                "{}/{} (invalid file name)",
                self, name
            )));
        }

        Ok(Self {
            absolute: format!("{}/{}", self.absolute, name),
        })
    }
}

impl fmt::Display for DbfsPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", DBFS_SCHEME, self.absolute)
    }
}

impl std::str::FromStr for DbfsPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}
