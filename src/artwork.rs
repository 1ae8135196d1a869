//! Content-addressed artwork cache.
//!
//! Embedded cover images are written once per unique content: the file
//! name is a SHA-256 of the raw image bytes, so two tracks carrying
//! byte-identical artwork share one cache file. The cache is scan-scoped:
//! it is wiped and recreated at the start of each scan, before any
//! artwork is resolved.

use sha2::{Digest, Sha256};
use std::fs;
use std::path::PathBuf;

use crate::metadata::EmbeddedPicture;

/// Artwork disk cache.
#[derive(Debug, Clone)]
pub struct ArtworkCache {
    cache_dir: PathBuf,
}

impl ArtworkCache {
    /// Create a cache rooted at the given directory.
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
        }
    }

    /// Create a cache in the default location (user cache directory).
    pub fn default_location() -> Self {
        let cache_dir = dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from(".cache"))
            .join("local-tracks")
            .join("artworks");
        Self::new(cache_dir)
    }

    /// Wipe and recreate the cache directory.
    ///
    /// Runs once at the start of each scan, before any resolve call.
    pub fn reset(&self) -> std::io::Result<()> {
        match fs::remove_dir_all(&self.cache_dir) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }
        fs::create_dir_all(&self.cache_dir)
    }

    /// Resolve an embedded picture to a cached file path.
    ///
    /// Returns the empty string when there is no picture or the write
    /// fails; artwork is never worth failing a track build over.
    pub fn resolve(&self, picture: Option<&EmbeddedPicture>) -> String {
        let Some(picture) = picture else {
            return String::new();
        };

        let path = self.cache_path(picture);

        // Identical bytes hash to the same name; skip the rewrite.
        if path.exists() {
            return path.to_string_lossy().into_owned();
        }

        match fs::write(&path, &picture.data) {
            Ok(()) => path.to_string_lossy().into_owned(),
            Err(e) => {
                tracing::warn!("Failed to cache artwork at {:?}: {}", path, e);
                String::new()
            }
        }
    }

    /// Cache path for a picture: `<cache_dir>/<sha256 of bytes>.<ext>`.
    fn cache_path(&self, picture: &EmbeddedPicture) -> PathBuf {
        let mut hasher = Sha256::new();
        hasher.update(&picture.data);
        let hash = format!("{:x}", hasher.finalize());
        self.cache_dir.join(format!("{}.{}", hash, picture.format))
    }

    /// Number of files currently cached.
    pub fn len(&self) -> usize {
        fs::read_dir(&self.cache_dir)
            .map(|entries| entries.filter_map(|e| e.ok()).count())
            .unwrap_or(0)
    }

    /// True when the cache directory holds no files.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
