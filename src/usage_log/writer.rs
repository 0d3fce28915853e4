use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use fs4::fs_std::FileExt;

use crate::errors::HookError;

/// Append already-encoded rows to the log as one block.
///
/// The write happens on a blocking thread while holding an exclusive lock on
/// the file, so the rows of concurrent invocations never interleave however
/// large they are.
pub async fn append_rows(path: &Path, encoded: &[u8]) -> Result<(), HookError> {
    if encoded.is_empty() {
        return Ok(());
    }

    let path: PathBuf = path.into();
    let encoded = encoded.to_vec();
    tokio::task::spawn_blocking(move || append_locked(&path, &encoded))
        .await
        .map_err(|e| HookError::DeliveryError(format!("append task failed: {e}")))?
}

fn append_locked(path: &Path, encoded: &[u8]) -> Result<(), HookError> {
    let io_err = |e: std::io::Error| {
        HookError::DeliveryError(format!("failed to append to {}: {e}", path.display()))
    };

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(io_err)?;

    FileExt::lock_exclusive(&file).map_err(io_err)?;
    let written = write_block(&mut file, encoded);
    let unlocked = FileExt::unlock(&file);

    written.map_err(io_err)?;
    unlocked.map_err(io_err)
}

fn write_block(file: &mut File, encoded: &[u8]) -> std::io::Result<()> {
    file.write_all(encoded)?;
    file.flush()
}
