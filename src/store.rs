//! Collaborator seams.
//!
//! The host player owns the real settings store, playlist database,
//! directory picker, and view renderer. The plugin only depends on these
//! traits; the in-process implementations here back the CLI and tests.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use tokio::sync::RwLock;

use crate::error::{Error, Result};
use crate::model::{Playlist, Track};

/// Synchronous key-value settings store.
pub trait SettingsStore: Send + Sync {
    fn get(&self, key: &str) -> Option<Value>;
    fn set(&self, key: &str, value: Value);
}

/// Persisted playlist store ("Data" layer of the host).
///
/// Playlists are addressed by (service, id). `save` replaces the stored
/// playlist matching the given one's address.
#[async_trait]
pub trait PlaylistStore: Send + Sync {
    /// Register a playlist if no playlist with its (service, id) exists
    /// yet; otherwise keep the stored one untouched.
    async fn add_playlist(&self, playlist: Playlist) -> Result<()>;

    /// Look up a playlist by service tag and id.
    async fn find_one(&self, service: &str, id: &str) -> Result<Option<Playlist>>;

    /// Persist the playlist's current state.
    async fn save(&self, playlist: &Playlist) -> Result<()>;
}

/// Native directory picker.
#[async_trait]
pub trait DirectoryPicker: Send + Sync {
    /// Returns the chosen directory, or None when the user cancels.
    async fn pick_folder(&self) -> Option<PathBuf>;
}

/// Host hook rendering a filtered "special view" (artist or album page).
pub trait SpecialView: Send + Sync {
    fn render(&self, service: &str, tracks: Vec<Track>, kind: ViewKind, label: &str, artwork: &str);
}

/// Which special view the host should render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Artist,
    Album,
}

// ---------------------------------------------------------------------------
// In-process implementations
// ---------------------------------------------------------------------------

/// JSON-file-backed settings store.
///
/// The whole map lives in one file; writes go through a temp file and a
/// rename so a crash can't leave a half-written store behind.
pub struct JsonSettings {
    path: PathBuf,
    values: Mutex<HashMap<String, Value>>,
}

impl JsonSettings {
    /// Open (or create) the store at the given path.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = std::fs::read_to_string(&path)
            .ok()
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default();
        Self {
            path,
            values: Mutex::new(values),
        }
    }

    fn flush(&self, values: &HashMap<String, Value>) {
        let Ok(raw) = serde_json::to_string_pretty(values) else {
            return;
        };
        if let Some(dir) = self.path.parent() {
            let _ = std::fs::create_dir_all(dir);
        }
        let temp = self.path.with_extension("json.tmp");
        if std::fs::write(&temp, raw)
            .and_then(|_| std::fs::rename(&temp, &self.path))
            .is_err()
        {
            tracing::warn!("Failed to persist settings to {:?}", self.path);
        }
    }
}

impl SettingsStore for JsonSettings {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) {
        let Ok(mut values) = self.values.lock() else {
            return;
        };
        values.insert(key.to_string(), value);
        self.flush(&values);
    }
}

/// In-memory playlist store keyed by (service, id).
#[derive(Default)]
pub struct MemoryPlaylists {
    playlists: RwLock<HashMap<(String, String), Playlist>>,
}

impl MemoryPlaylists {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PlaylistStore for MemoryPlaylists {
    async fn add_playlist(&self, playlist: Playlist) -> Result<()> {
        let key = (playlist.service.clone(), playlist.id.clone());
        self.playlists.write().await.entry(key).or_insert(playlist);
        Ok(())
    }

    async fn find_one(&self, service: &str, id: &str) -> Result<Option<Playlist>> {
        let key = (service.to_string(), id.to_string());
        Ok(self.playlists.read().await.get(&key).cloned())
    }

    async fn save(&self, playlist: &Playlist) -> Result<()> {
        let key = (playlist.service.clone(), playlist.id.clone());
        let mut playlists = self.playlists.write().await;
        if !playlists.contains_key(&key) {
            return Err(Error::store(format!(
                "cannot save unregistered playlist {}/{}",
                playlist.service, playlist.id
            )));
        }
        playlists.insert(key, playlist.clone());
        Ok(())
    }
}

/// Directory picker backed by the native file dialog.
pub struct NativePicker;

#[async_trait]
impl DirectoryPicker for NativePicker {
    async fn pick_folder(&self) -> Option<PathBuf> {
        rfd::AsyncFileDialog::new()
            .pick_folder()
            .await
            .map(|h| h.path().to_path_buf())
    }
}

/// Load a playlist-shaped value out of a settings store.
pub fn playlist_from_settings(store: &dyn SettingsStore, key: &str) -> Option<Playlist> {
    store
        .get(key)
        .and_then(|v| serde_json::from_value(v).ok())
}

/// Snapshot a playlist into a settings store.
pub fn playlist_to_settings(store: &dyn SettingsStore, key: &str, playlist: &Playlist) {
    match serde_json::to_value(playlist) {
        Ok(value) => store.set(key, value),
        Err(e) => tracing::warn!("Could not serialize playlist {:?}: {}", key, e),
    }
}
