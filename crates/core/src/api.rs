//! The DBFS streaming-upload operations and the `put_file` call built on them

use crate::error::Result;
use crate::path::DbfsPath;
use async_trait::async_trait;
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncReadExt;

/// Largest raw block accepted by `add-block` (1 MiB)
pub const BLOCK_SIZE: usize = 1 << 20;

/// Open-stream identifier returned by `create`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle(pub i64);

/// Remote file operations of the DBFS API.
///
/// A file is written by `create`, zero or more `add_block` calls and a
/// final `close`; it only becomes visible once closed.
#[async_trait]
pub trait DbfsApi: Send + Sync {
    /// Open a write stream. Fails with `AlreadyExists` when the path holds
    /// a file and `overwrite` is false.
    async fn create(&self, path: &DbfsPath, overwrite: bool) -> Result<Handle>;

    /// Append at most [`BLOCK_SIZE`] bytes to an open stream
    async fn add_block(&self, handle: Handle, data: &[u8]) -> Result<()>;

    /// Commit and close a stream
    async fn close(&self, handle: Handle) -> Result<()>;
}

/// Copy one local file to `dbfs_path`.
///
/// The local file is opened before any remote call, so an unreadable file
/// never leaves a stream open on the server.
pub async fn put_file<A>(api: &A, dbfs_path: &DbfsPath, src_path: &Path, overwrite: bool) -> Result<()>
where
    A: DbfsApi + ?Sized,
{
    let mut file = File::open(src_path).await?;

    let handle = api.create(dbfs_path, overwrite).await?;
    tracing::debug!(path = %dbfs_path, handle = handle.0, "stream opened");

    let mut buffer = vec![0u8; BLOCK_SIZE];
    let mut total = 0usize;
    loop {
        let n = read_block(&mut file, &mut buffer).await?;
        if n == 0 {
            break;
        }
        api.add_block(handle, &buffer[..n]).await?;
        total += n;
        tracing::debug!(path = %dbfs_path, bytes = n, total, "block sent");
        if n < BLOCK_SIZE {
            break;
        }
    }

    api.close(handle).await?;
    tracing::debug!(path = %dbfs_path, total, "stream closed");

    Ok(())
}

/// Fill `buf` from `file`, short only at end of file
async fn read_block(file: &mut File, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = file.read(&mut buf[filled..]).await?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}
