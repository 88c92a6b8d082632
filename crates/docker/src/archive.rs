//! Tar archive handling for the container archive endpoint.
//!
//! The runtime's archive endpoint answers a single-path request with a tar
//! stream whose first meaningful entry is the requested path itself. Only
//! that first entry is ever read; anything after it (directory contents,
//! padding blocks) is ignored.

use std::io::{Cursor, Read};

use pkgtally_core::types::FileStat;

use crate::error::DockerError;

/// Unpacks the payload of the first entry of a tar archive.
///
/// # Errors
///
/// Returns `DockerError::Archive` if the archive is empty, truncated, or
/// the first entry cannot be read.
pub fn first_entry_bytes(archive: &[u8]) -> Result<Vec<u8>, DockerError> {
    let mut reader = tar::Archive::new(Cursor::new(archive));
    let mut entries = reader
        .entries()
        .map_err(|e| DockerError::Archive(format!("failed to read tar entries: {e}")))?;

    let entry = entries
        .next()
        .ok_or_else(|| DockerError::Archive("archive contains no entries".to_owned()))?
        .map_err(|e| DockerError::Archive(format!("invalid tar entry: {e}")))?;

    let mut contents = Vec::with_capacity(usize::try_from(entry.size()).unwrap_or(0));
    let mut entry = entry;
    entry
        .read_to_end(&mut contents)
        .map_err(|e| DockerError::Archive(format!("failed to read entry payload: {e}")))?;

    Ok(contents)
}

/// Reads only the first entry header and reports its file type.
///
/// Used for presence checks: the header's type flag distinguishes regular
/// files from directories without materializing the payload.
///
/// # Errors
///
/// Returns `DockerError::Archive` if the archive is empty or malformed.
pub fn first_entry_stat(archive: &[u8]) -> Result<FileStat, DockerError> {
    let mut reader = tar::Archive::new(Cursor::new(archive));
    let mut entries = reader
        .entries()
        .map_err(|e| DockerError::Archive(format!("failed to read tar entries: {e}")))?;

    let entry = entries
        .next()
        .ok_or_else(|| DockerError::Archive("archive contains no entries".to_owned()))?
        .map_err(|e| DockerError::Archive(format!("invalid tar entry: {e}")))?;

    if entry.header().entry_type().is_dir() {
        Ok(FileStat::DIR)
    } else {
        Ok(FileStat::FILE)
    }
}
