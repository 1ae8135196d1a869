//! Audio file tag extraction.
//!
//! Uses the lofty crate for format-independent tag access across MP3,
//! FLAC, OGG, M4A, and WAV files. All fields are optional: partially
//! tagged and untagged files are everyday inputs here, and a parse
//! failure is a normal outcome the track builder knows how to consume,
//! not something to bubble up to the host.

use lofty::file::{AudioFile, TaggedFileExt};
use lofty::picture::{MimeType, PictureType};
use lofty::probe::Probe;
use lofty::tag::Accessor;
use std::path::Path;
use std::time::Duration;

use crate::error::{Error, Result};

/// An embedded artwork image pulled out of a tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedPicture {
    /// Raw image bytes as stored in the tag.
    pub data: Vec<u8>,
    /// File extension matching the image format ("jpg", "png", ...).
    pub format: String,
}

/// Raw tag data for one file, before any normalization policy is applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawMetadata {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub track: Option<u32>,
    pub disk: Option<u32>,
    /// Duration from the file's audio properties. Zero when unknown.
    pub duration: Duration,
    pub picture: Option<EmbeddedPicture>,
}

/// Read tags and audio properties from a file.
///
/// Returns `Err` when the file cannot be opened or parsed at all; the
/// caller treats that as the bare-track branch, not as a scan failure.
pub fn read(path: &Path) -> Result<RawMetadata> {
    let tagged_file = Probe::open(path)
        .map_err(|e| Error::metadata(path, e.to_string()))?
        .read()
        .map_err(|e| Error::metadata(path, e.to_string()))?;

    let duration = tagged_file.properties().duration();

    // Primary tag, or fall back to the first available tag
    let tag = tagged_file
        .primary_tag()
        .or_else(|| tagged_file.first_tag());

    let Some(tag) = tag else {
        return Ok(RawMetadata {
            duration,
            ..RawMetadata::default()
        });
    };

    // Prefer the front cover, fall back to the first picture
    let pictures = tag.pictures();
    let picture = pictures
        .iter()
        .find(|p| p.pic_type() == PictureType::CoverFront)
        .or_else(|| pictures.first())
        .map(|p| EmbeddedPicture {
            data: p.data().to_vec(),
            format: picture_extension(p.mime_type()),
        });

    Ok(RawMetadata {
        title: tag.title().map(|s| s.to_string()),
        artist: tag.artist().map(|s| s.to_string()),
        album: tag.album().map(|s| s.to_string()),
        track: tag.track(),
        disk: tag.disk(),
        duration,
        picture,
    })
}

/// Map a tag picture MIME type to a cache file extension.
fn picture_extension(mime: Option<&MimeType>) -> String {
    match mime {
        Some(MimeType::Png) => "png",
        Some(MimeType::Gif) => "gif",
        Some(MimeType::Bmp) => "bmp",
        Some(MimeType::Tiff) => "tiff",
        // Jpeg, unknown, or absent: jpg is the dominant case in the wild
        _ => "jpg",
    }
    .to_string()
}
