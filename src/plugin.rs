//! The local service façade exposed to the host player.
//!
//! Wires the scan pipeline, favorites persistence, artist/album views,
//! and stream-URL resolution behind one object. Every collaborator comes
//! in through a trait, so the host can substitute its own stores and the
//! tests can substitute mocks.

use std::sync::Arc;

use crate::artwork::ArtworkCache;
use crate::config::ServiceConfig;
use crate::error::{Error, Result};
use crate::library::{self, FAVORITES_SETTINGS_KEY};
use crate::model::{FAVORITES_PLAYLIST_ID, LIBRARY_PLAYLIST_ID, Playlist, SERVICE, Track};
use crate::store::{
    DirectoryPicker, PlaylistStore, SettingsStore, SpecialView, ViewKind, playlist_to_settings,
};

/// The service works without a network connection.
pub const WORKS_OFFLINE: bool = true;

/// Plays from this service may be scrobbled.
pub const SCROBBLING: bool = true;

/// Static capabilities the host queries once at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceFacts {
    pub works_offline: bool,
    pub scrobbling: bool,
}

/// Settings row descriptor consumed by the host UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsItem {
    /// The standard activate/deactivate toggle.
    Activate { id: &'static str },
    /// A static text row.
    Html { content: String },
}

/// Context-menu entry descriptor consumed by the host UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextMenuItem {
    pub label: &'static str,
    pub action: MenuAction,
}

/// What the host should invoke when a menu entry is clicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    ViewArtist,
    ViewAlbum,
}

/// Local-filesystem music service plugin.
pub struct LocalService {
    config: ServiceConfig,
    artworks: ArtworkCache,
    settings: Arc<dyn SettingsStore>,
    playlists: Arc<dyn PlaylistStore>,
    picker: Arc<dyn DirectoryPicker>,
    view: Arc<dyn SpecialView>,
}

impl LocalService {
    pub fn new(
        config: ServiceConfig,
        artworks: ArtworkCache,
        settings: Arc<dyn SettingsStore>,
        playlists: Arc<dyn PlaylistStore>,
        picker: Arc<dyn DirectoryPicker>,
        view: Arc<dyn SpecialView>,
    ) -> Self {
        Self {
            config,
            artworks,
            settings,
            playlists,
            picker,
            view,
        }
    }

    /// Current configuration snapshot.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Capabilities reported to the host.
    pub fn facts(&self) -> ServiceFacts {
        ServiceFacts {
            works_offline: WORKS_OFFLINE,
            scrobbling: SCROBBLING,
        }
    }

    /// Rebuild the Library playlist from disk.
    ///
    /// Takes `&mut self` so scans on one instance cannot overlap the
    /// artwork-cache reset of the next.
    pub async fn fetch_data(&mut self) -> Result<Playlist> {
        library::build_library(
            &self.config,
            &self.artworks,
            self.settings.as_ref(),
            self.playlists.as_ref(),
        )
        .await
    }

    /// Activate the service: ask the user for a library directory.
    ///
    /// Cancelling the dialog leaves the stored configuration untouched
    /// and returns [`Error::NoPathSelected`].
    pub async fn login(&mut self) -> Result<()> {
        let Some(path) = self.picker.pick_folder().await else {
            return Err(Error::NoPathSelected);
        };

        tracing::info!("Library root set to {}", path.display());
        self.config.paths = vec![path];
        Ok(())
    }

    /// Like a track. The host's playlist layer has already updated the
    /// Favorites playlist; we only snapshot it.
    pub async fn like(&self, _track: &Track) -> Result<()> {
        self.toggle_like().await
    }

    /// Unlike a track. Same snapshot as [`Self::like`].
    pub async fn unlike(&self, _track: &Track) -> Result<()> {
        self.toggle_like().await
    }

    /// Re-read the authoritative Favorites playlist and persist its
    /// current state to the settings store.
    async fn toggle_like(&self) -> Result<()> {
        let favorites = self
            .playlists
            .find_one(SERVICE, FAVORITES_PLAYLIST_ID)
            .await?
            .ok_or_else(|| Error::store("favorites playlist not registered"))?;

        playlist_to_settings(self.settings.as_ref(), FAVORITES_SETTINGS_KEY, &favorites);
        Ok(())
    }

    /// Resolve the playable URL for a track. Never fails: both values
    /// were computed when the track was built.
    pub fn get_stream_url(&self, track: &Track) -> (String, String) {
        (track.stream_url.clone(), track.id.clone())
    }

    /// Render an artist page for the first selected track.
    pub async fn view_artist(&self, tracks: &[Track]) -> Result<()> {
        let Some(track) = tracks.first() else {
            return Ok(());
        };

        let matching = self
            .library_tracks(|t| t.artist.id == track.artist.id)
            .await?;
        self.view
            .render(SERVICE, matching, ViewKind::Artist, &track.artist.name, "");
        Ok(())
    }

    /// Render an album page for the first selected track.
    pub async fn view_album(&self, tracks: &[Track]) -> Result<()> {
        let Some(track) = tracks.first() else {
            return Ok(());
        };

        let matching = self
            .library_tracks(|t| t.album.id == track.album.id)
            .await?;
        self.view.render(
            SERVICE,
            matching,
            ViewKind::Album,
            &track.album.name,
            &track.artwork,
        );
        Ok(())
    }

    /// Scan the full Library for tracks matching a filter.
    async fn library_tracks(&self, keep: impl Fn(&Track) -> bool) -> Result<Vec<Track>> {
        let library = self
            .playlists
            .find_one(SERVICE, LIBRARY_PLAYLIST_ID)
            .await?
            .ok_or_else(|| Error::store("library playlist not registered"))?;

        Ok(library.tracks.into_iter().filter(|t| keep(t)).collect())
    }

    /// Settings rows for the host's preferences screen.
    pub fn settings_items(&self) -> Vec<SettingsItem> {
        let content = match (self.config.active, self.config.scan_root()) {
            (true, Some(root)) => format!("Selected path: {}", root.display()),
            _ => String::new(),
        };

        vec![
            SettingsItem::Activate { id: "active" },
            SettingsItem::Html { content },
        ]
    }

    /// Context-menu entries for a track selection.
    pub fn context_menu_items(&self, _tracks: &[Track]) -> Vec<ContextMenuItem> {
        vec![
            ContextMenuItem {
                label: "View artist",
                action: MenuAction::ViewArtist,
            },
            ContextMenuItem {
                label: "View album",
                action: MenuAction::ViewAlbum,
            },
        ]
    }
}
