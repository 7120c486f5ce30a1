//! Directory-to-DBFS uploader

use crate::api::{put_file, DbfsApi};
use crate::error::{Error, Result};
use crate::path::DbfsPath;
use std::fs;
use std::path::{Path, PathBuf};

/// One local file and where it goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub local_path: PathBuf,
    pub remote_path: DbfsPath,
}

impl FileEntry {
    pub fn new(remote_dir: &str, local_path: PathBuf) -> Result<Self> {
        let remote_path = remote_path_for(remote_dir, &local_path)?;
        Ok(Self {
            local_path,
            remote_path,
        })
    }
}

/// `{remote_dir}/{basename(local)}`; directory structure is flattened
pub fn remote_path_for(remote_dir: &str, local: &Path) -> Result<DbfsPath> {
    let name = local
        .file_name()
        .ok_or_else(|| Error::InvalidPath(format!("{} has no file name", local.display())))?;

    DbfsPath::new(remote_dir)?.join(&name.to_string_lossy())
}

/// Regular files directly inside `dir`, in directory-listing order
pub fn list_source_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let read_dir = |source| Error::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_dir)? {
        let path = entry.map_err(read_dir)?.path();
        if path.is_file() {
            files.push(path);
        } else {
            tracing::warn!(path = %path.display(), "skipping non-regular file");
        }
    }

    Ok(files)
}

/// Uploads the files of one local directory into one DBFS directory
pub struct Uploader<A> {
    api: A,
    source_dir: PathBuf,
    remote_dir: String,
}

impl<A: DbfsApi> Uploader<A> {
    pub fn new(api: A, source_dir: impl Into<PathBuf>, remote_dir: impl Into<String>) -> Self {
        Self {
            api,
            source_dir: source_dir.into(),
            remote_dir: remote_dir.into(),
        }
    }

    /// Upload every regular file of the source directory.
    ///
    /// Files go one at a time; the first failure stops the batch and the
    /// remaining files are not attempted. The error names the failed file.
    pub async fn upload_files(&self, overwrite: bool) -> Result<()> {
        let files = list_source_files(&self.source_dir)?;
        tracing::info!(
            count = files.len(),
            source = %self.source_dir.display(),
            dest = %self.remote_dir,
            "uploading files"
        );

        for local_path in files {
            let entry = FileEntry::new(&self.remote_dir, local_path)?;
            self.upload_file(&entry.remote_path, &entry.local_path, overwrite)
                .await
                .map_err(|source| Error::Upload {
                    path: entry.local_path.clone(),
                    dest: entry.remote_path.to_string(),
                    source: Box::new(source),
                })?;
        }

        Ok(())
    }

    /// Upload one file
    pub async fn upload_file(&self, dbfs_path: &DbfsPath, src_path: &Path, overwrite: bool) -> Result<()> {
        put_file(&self.api, dbfs_path, src_path, overwrite).await?;
        tracing::info!(src = %src_path.display(), dest = %dbfs_path, "uploaded");
        Ok(())
    }

    pub fn api(&self) -> &A {
        &self.api
    }
}
