//! Track construction policy.
//!
//! This is where an arbitrary file path plus whatever the tag parser
//! managed to produce becomes one canonical [`Track`]. Two branches:
//!
//! - **tagged**: the file has a usable title. Artist/album default to the
//!   empty string (never absent), the ordering key is track x disk, and
//!   album identity is a hash of artist+album.
//! - **bare**: parsing failed outright or the title is missing. The title
//!   falls back to the file's base name and artist/album identity stays
//!   empty.
//!
//! Construction never fails. A parse error is a valid input that routes
//! to the bare branch; it is logged and absorbed, so one corrupt file can
//! never sink a library import.

use std::path::Path;

use crate::artwork::ArtworkCache;
use crate::duration;
use crate::error::Result;
use crate::metadata::RawMetadata;
use crate::model::{self, AlbumRef, ArtistRef, Track};

/// Build a canonical track for a file, resolving artwork through the
/// cache and probing the media when the tag carries no usable duration.
pub async fn build_track(
    path: &Path,
    meta: Result<RawMetadata>,
    artworks: &ArtworkCache,
) -> Track {
    let meta = match meta {
        Ok(meta) => Some(meta),
        Err(e) => {
            tracing::warn!("Tag parse failed, degrading to bare track: {}", e);
            None
        }
    };

    let mut track = assemble(path, meta.as_ref(), artworks);

    // The duration field is patched before the track is handed out, never
    // after; callers only ever see finished tracks.
    if track.duration == 0 {
        track.duration = duration::resolve(path).await;
    }

    track
}

/// Synchronous assembly of the track record. Duration may still be 0
/// here; [`build_track`] finishes it.
fn assemble(path: &Path, meta: Option<&RawMetadata>, artworks: &ArtworkCache) -> Track {
    let id = model::encode_track_id(path);
    let stream_url = model::file_url(path);
    let artwork = artworks.resolve(meta.and_then(|m| m.picture.as_ref()));
    let tag_millis = meta.map(|m| m.duration.as_millis() as u64).unwrap_or(0);

    // Tagged only when a non-empty title exists; an artist tag alone is
    // not a usable identity.
    let tagged = meta.and_then(|m| {
        m.title
            .as_deref()
            .filter(|t| !t.is_empty())
            .map(|title| (m, title))
    });

    match tagged {
        Some((meta, title)) => {
            // Identity fields are always present, if only as empty strings.
            let artist = meta.artist.clone().unwrap_or_default();
            let album = meta.album.clone().unwrap_or_default();
            let lookup = format!("{} {}", artist, title);

            Track {
                service: model::SERVICE.to_string(),
                title: title.to_string(),
                share_url: model::share_url(&lookup),
                artist: ArtistRef {
                    name: artist.clone(),
                    id: artist.clone(),
                },
                album: AlbumRef {
                    id: model::album_id(&artist, &album),
                    name: album,
                },
                // Tag values are arbitrary external input; saturate rather
                // than overflow on absurd track/disk numbers.
                track_number: meta.track.map(|t| t.saturating_mul(meta.disk.unwrap_or(1))),
                id,
                duration: tag_millis,
                artwork,
                stream_url,
            }
        }
        None => {
            let title = bare_title(path);

            Track {
                service: model::SERVICE.to_string(),
                share_url: model::share_url(&title),
                title,
                artist: ArtistRef::default(),
                album: AlbumRef::default(),
                track_number: None,
                id,
                duration: tag_millis,
                artwork,
                stream_url,
            }
        }
    }
}

/// Filename-derived title for files without usable tags.
///
/// `file_name` already understands the platform's separators, and keeps
/// unicode names intact. Extension included, exactly as the user sees the
/// file on disk.
fn bare_title(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
