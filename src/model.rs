//! Core data model: [`Track`], [`Playlist`] and the identity helpers.
//!
//! A `Track` is immutable once built. Its `id` is a reversible encoding of
//! the absolute file path, so re-scanning an unchanged file always produces
//! the same id, and the path can be recovered from the id without any
//! lookup table. Album identity is a content hash of artist+album, so all
//! tracks of one album share an id without coordination during the scan.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// Service tag for everything this plugin produces.
pub const SERVICE: &str = "local";

/// Id of the persisted Library playlist.
pub const LIBRARY_PLAYLIST_ID: &str = "library";

/// Id of the persisted Favorites playlist.
pub const FAVORITES_PLAYLIST_ID: &str = "favs";

/// Artist reference carried by a track. For local tracks the id is the
/// name itself; there is no catalog to resolve against.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistRef {
    pub name: String,
    pub id: String,
}

/// Album reference carried by a track. The id is a hash of artist+album
/// name, stable across tracks and across scans.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumRef {
    pub name: String,
    pub id: String,
}

/// One playable audio item with its catalog metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Always [`SERVICE`].
    pub service: String,
    /// Display title; falls back to the file's base name for untagged files.
    pub title: String,
    /// YouTube search URL for the track (derived, not authoritative).
    pub share_url: String,
    pub artist: ArtistRef,
    pub album: AlbumRef,
    /// Single ordering key: tag track number x disk number. Absent when the
    /// file carried no usable tags.
    pub track_number: Option<u32>,
    /// Reversible encoding of the absolute file path.
    pub id: String,
    /// Duration in milliseconds; 0 only when both tags and probing failed.
    pub duration: u64,
    /// Path of the cached artwork image, or empty.
    pub artwork: String,
    /// `file://` URL of the original path.
    pub stream_url: String,
}

/// Named ordered collection of tracks, persisted via the host's store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Playlist {
    pub service: String,
    pub title: String,
    pub artwork: String,
    pub icon: String,
    pub id: String,
    pub tracks: Vec<Track>,
}

impl Playlist {
    /// Empty Library playlist, rebuilt wholesale on each scan.
    pub fn library() -> Self {
        Self {
            service: SERVICE.to_string(),
            title: "Library".to_string(),
            artwork: String::new(),
            icon: "drive".to_string(),
            id: LIBRARY_PLAYLIST_ID.to_string(),
            tracks: Vec::new(),
        }
    }

    /// Empty Favorites playlist, created once and persisted across scans.
    pub fn favorites() -> Self {
        Self {
            service: SERVICE.to_string(),
            title: "Favorites".to_string(),
            artwork: String::new(),
            icon: "heart".to_string(),
            id: FAVORITES_PLAYLIST_ID.to_string(),
            tracks: Vec::new(),
        }
    }
}

/// Encode a file path into a stable track id.
///
/// Pure function of the path: two scans of the same unchanged file yield
/// the same id. Reversible via [`decode_track_id`].
pub fn encode_track_id(path: &Path) -> String {
    BASE64.encode(path.to_string_lossy().as_bytes())
}

/// Recover the file path from a track id produced by [`encode_track_id`].
pub fn decode_track_id(id: &str) -> Option<PathBuf> {
    let bytes = BASE64.decode(id).ok()?;
    String::from_utf8(bytes).ok().map(PathBuf::from)
}

/// Stable album id: hash of artist name + album name.
pub fn album_id(artist: &str, album: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(artist.as_bytes());
    hasher.update(album.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// YouTube search URL for the given lookup text.
pub fn share_url(lookup: &str) -> String {
    format!(
        "https://www.youtube.com/results?search_query={}",
        urlencoding::encode(lookup)
    )
}

/// `file://` URL pointing at the original path.
pub fn file_url(path: &Path) -> String {
    format!("file://{}", path.display())
}
