//! Recursive enumeration of audio files.
//!
//! The traversal itself is synchronous (walkdir) and runs on a blocking
//! task feeding an mpsc channel, so callers get an async Stream of paths
//! without holding a runtime thread hostage. Only the root's readability
//! is a hard error; unreadable entries deeper in the tree are skipped.

use futures::stream::Stream;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Supported audio file extensions, matched case-insensitively.
pub const SUPPORTED_EXTENSIONS: [&str; 5] = ["mp3", "wav", "flac", "ogg", "m4a"];

/// True when the path has one of the supported audio extensions.
pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_lowercase();
            SUPPORTED_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Scan the given root directory recursively for audio files.
///
/// Returns a Stream of absolute paths in filesystem enumeration order.
/// Fails upfront when the root cannot be read at all; that is the one
/// fatal error a scan can produce.
pub fn scan(root: PathBuf) -> Result<impl Stream<Item = PathBuf>> {
    // Surface an unreadable root before spawning anything, so the caller
    // gets a scan-level error instead of an empty library.
    std::fs::read_dir(&root).map_err(|e| Error::walk_failed(&root, e.to_string()))?;

    let (tx, rx) = mpsc::channel(100);

    // Blocking task performs the synchronous file system traversal
    tokio::task::spawn_blocking(move || {
        for entry in WalkDir::new(root).into_iter().filter_map(|e| e.ok()) {
            if entry.file_type().is_file() && is_supported(entry.path()) {
                // If the receiver is dropped, stop scanning.
                if tx.blocking_send(entry.path().to_path_buf()).is_err() {
                    break;
                }
            }
        }
    });

    Ok(futures::stream::unfold(rx, |mut rx| async move {
        rx.recv().await.map(|path| (path, rx))
    }))
}
