//! local-tracks - a local-filesystem music service plugin.
//!
//! Scans a directory tree for audio files, extracts tag metadata, and
//! builds a browsable Library playlist plus a persisted Favorites
//! playlist for a host music player. The host plugs in its own settings
//! store, playlist database, directory picker, and view renderer through
//! the traits in [`store`]; everything else is owned here.
//!
//! The interesting part is the extraction pipeline: [`metadata`] reads
//! tags, [`track`] normalizes them into canonical [`model::Track`]
//! records (with filename fallbacks for untagged files), [`artwork`]
//! content-addresses embedded covers, and [`duration`] probes the real
//! media when tags carry no usable duration. [`library`] fans that out
//! per file and joins on the whole batch before sorting and persisting.

pub mod artwork;
pub mod config;
pub mod duration;
pub mod error;
pub mod library;
pub mod metadata;
pub mod model;
pub mod plugin;
pub mod scanner;
pub mod store;
#[cfg(test)]
pub mod test_utils;
pub mod track;

pub use error::{Error, Result};
pub use model::{Playlist, Track};
pub use plugin::LocalService;
