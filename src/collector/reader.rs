//! Counter-file reader.
//!
//! Thin layer over [`FileSystem`] that turns a counter file into lines or a
//! single integer, attaching the path to any failure.

use std::path::Path;

use crate::collector::error::CollectError;
use crate::collector::traits::FileSystem;

/// Reads `path` and returns its lines with trailing newlines stripped.
///
/// An empty file yields an empty vector.
pub fn read_lines<F: FileSystem + ?Sized>(fs: &F, path: &Path) -> Result<Vec<String>, CollectError> {
    let content = fs
        .read_to_string(path)
        .map_err(|e| CollectError::read(path, e))?;
    Ok(content.lines().map(str::to_owned).collect())
}

/// Reads a file holding exactly one base-10 integer on its first line.
pub fn read_int<F: FileSystem + ?Sized>(fs: &F, path: &Path) -> Result<i64, CollectError> {
    let content = fs
        .read_to_string(path)
        .map_err(|e| CollectError::read(path, e))?;
    let line = content.lines().next().unwrap_or("").trim();
    line.parse().map_err(|e| {
        CollectError::parse(format!(
            "unable to parse int from {} line {:?}: {}",
            path.display(),
            line,
            e
        ))
    })
}
