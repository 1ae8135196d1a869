//! The scan pipeline: filesystem to persisted Library playlist.
//!
//! One `build_library` call is one full rebuild. Favorites load-or-init
//! and the Library placeholder are registered first, then every candidate
//! file goes through metadata extraction, track construction, and
//! duration finalization concurrently. The pipeline joins on the whole
//! batch - partial results are never persisted - and only then sorts and
//! saves. Per-file failures degrade to bare tracks; the only fatal error
//! is an unreadable root.

use futures::StreamExt;
use std::path::PathBuf;

use crate::artwork::ArtworkCache;
use crate::config::ServiceConfig;
use crate::error::{Error, Result};
use crate::metadata::{self, RawMetadata};
use crate::model::Playlist;
use crate::scanner;
use crate::store::{PlaylistStore, SettingsStore, playlist_from_settings, playlist_to_settings};
use crate::track::build_track;

/// Settings-store key holding the Favorites snapshot.
pub const FAVORITES_SETTINGS_KEY: &str = "local_playlist_favorites";

/// Files processed in parallel during a scan.
const SCAN_CONCURRENCY: usize = 10;

/// Run a full library scan and persist the result.
///
/// Returns the rebuilt Library playlist. Fails only when no root is
/// configured, the root is unreadable, or a store rejects a write.
pub async fn build_library(
    config: &ServiceConfig,
    artworks: &ArtworkCache,
    settings: &dyn SettingsStore,
    playlists: &dyn PlaylistStore,
) -> Result<Playlist> {
    let root = config.scan_root().ok_or(Error::NoPathConfigured)?;

    // The cache is scan-scoped: wipe leftovers before any artwork lands.
    artworks.reset()?;

    // Favorites survive across scans; create the snapshot on first run.
    let favorites = match playlist_from_settings(settings, FAVORITES_SETTINGS_KEY) {
        Some(favorites) => favorites,
        None => {
            let favorites = Playlist::favorites();
            playlist_to_settings(settings, FAVORITES_SETTINGS_KEY, &favorites);
            favorites
        }
    };
    playlists.add_playlist(favorites).await?;

    // Library placeholder goes in before the walk so the host can show it.
    let mut library = Playlist::library();
    playlists.add_playlist(library.clone()).await?;

    let paths = scanner::scan(root.to_path_buf())?;

    // Fan-out per file, bounded; `buffered` keeps enumeration order so the
    // stable artist sort below stays deterministic across runs.
    let mut tracks: Vec<_> = paths
        .map(|path| {
            let artworks = artworks.clone();
            async move {
                let meta = extract(path.clone()).await;
                build_track(&path, meta, &artworks).await
            }
        })
        .buffered(SCAN_CONCURRENCY)
        .collect()
        .await;

    tracing::info!("Scan of {} produced {} tracks", root.display(), tracks.len());

    sort_by_artist(&mut tracks);

    library.tracks = tracks;
    playlists.save(&library).await?;

    Ok(library)
}

/// Final library ordering. `sort_by` is stable, so tracks with equal
/// artist names keep their enumeration order across runs.
fn sort_by_artist(tracks: &mut [crate::model::Track]) {
    tracks.sort_by(|a, b| a.artist.name.cmp(&b.artist.name));
}

/// Tag extraction on the blocking pool. A panic in the parser is folded
/// into the same degraded path as a parse error.
async fn extract(path: PathBuf) -> Result<RawMetadata> {
    match tokio::task::spawn_blocking(move || metadata::read(&path)).await {
        Ok(result) => result,
        Err(join) => Err(Error::TaskJoin(join.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FAVORITES_PLAYLIST_ID, LIBRARY_PLAYLIST_ID, SERVICE, Track};
    use crate::store::{JsonSettings, MemoryPlaylists};
    use crate::test_utils::write_test_wav;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    struct Fixture {
        config: ServiceConfig,
        artworks: ArtworkCache,
        settings: JsonSettings,
        playlists: MemoryPlaylists,
        _dirs: (TempDir, TempDir),
    }

    fn fixture() -> Fixture {
        let music = TempDir::new().unwrap();
        let state = TempDir::new().unwrap();
        Fixture {
            config: ServiceConfig {
                paths: vec![music.path().to_path_buf()],
                active: true,
            },
            artworks: ArtworkCache::new(state.path().join("artworks")),
            settings: JsonSettings::open(state.path().join("settings.json")),
            playlists: MemoryPlaylists::new(),
            _dirs: (music, state),
        }
    }

    fn write_garbage(fx: &Fixture, name: &str) {
        let path = fx.config.scan_root().unwrap().join(name);
        let mut file = File::create(path).unwrap();
        writeln!(file, "definitely not audio").unwrap();
    }

    #[tokio::test]
    async fn test_scan_builds_library_from_supported_files() {
        let fx = fixture();
        write_garbage(&fx, "broken.mp3");
        write_garbage(&fx, "also-broken.flac");
        write_garbage(&fx, "skipped.txt");
        write_garbage(&fx, "noise.xyz");
        write_test_wav(&fx.config.scan_root().unwrap().join("silence.wav"), 1);

        let library =
            build_library(&fx.config, &fx.artworks, &fx.settings, &fx.playlists)
                .await
                .unwrap();

        // 3 supported files, 2 unsupported
        assert_eq!(library.tracks.len(), 3);
        assert_eq!(library.id, LIBRARY_PLAYLIST_ID);

        // Corrupt entries degrade to bare tracks named after the file
        let broken = track_by_title(&library, "broken.mp3");
        assert_eq!(broken.artist.id, "");
        assert_eq!(broken.duration, 0);

        // The untagged wav got its duration from the properties
        let wav = track_by_title(&library, "silence.wav");
        assert_eq!(wav.duration, 1000);

        // The persisted copy matches what was returned
        let stored = fx
            .playlists
            .find_one(SERVICE, LIBRARY_PLAYLIST_ID)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored, library);
    }

    fn track_by_title<'a>(library: &'a Playlist, title: &str) -> &'a Track {
        library
            .tracks
            .iter()
            .find(|t| t.title == title)
            .unwrap_or_else(|| panic!("no track titled {title}"))
    }

    #[tokio::test]
    async fn test_scan_initializes_favorites_once() {
        let fx = fixture();

        build_library(&fx.config, &fx.artworks, &fx.settings, &fx.playlists)
            .await
            .unwrap();

        // First scan snapshots an empty Favorites into settings
        let snapshot = playlist_from_settings(&fx.settings, FAVORITES_SETTINGS_KEY).unwrap();
        assert_eq!(snapshot, Playlist::favorites());

        // Favorites playlist is registered with the store
        let favs = fx
            .playlists
            .find_one(SERVICE, FAVORITES_PLAYLIST_ID)
            .await
            .unwrap();
        assert!(favs.is_some());
    }

    #[tokio::test]
    async fn test_scan_preserves_existing_favorites() {
        let fx = fixture();

        let mut favorites = Playlist::favorites();
        favorites.tracks.push(Track {
            service: SERVICE.to_string(),
            title: "Kept".to_string(),
            share_url: String::new(),
            artist: Default::default(),
            album: Default::default(),
            track_number: None,
            id: "abc".to_string(),
            duration: 1,
            artwork: String::new(),
            stream_url: String::new(),
        });
        playlist_to_settings(&fx.settings, FAVORITES_SETTINGS_KEY, &favorites);

        build_library(&fx.config, &fx.artworks, &fx.settings, &fx.playlists)
            .await
            .unwrap();

        let favs = fx
            .playlists
            .find_one(SERVICE, FAVORITES_PLAYLIST_ID)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(favs.tracks.len(), 1);
        assert_eq!(favs.tracks[0].title, "Kept");
    }

    #[tokio::test]
    async fn test_scan_without_configured_path_fails() {
        let fx = fixture();
        let config = ServiceConfig::default();

        let result = build_library(&config, &fx.artworks, &fx.settings, &fx.playlists).await;
        assert!(matches!(result, Err(Error::NoPathConfigured)));
    }

    #[tokio::test]
    async fn test_scan_unreadable_root_is_fatal_and_persists_nothing() {
        let fx = fixture();
        let config = ServiceConfig {
            paths: vec![fx.config.scan_root().unwrap().join("gone")],
            active: true,
        };

        let result = build_library(&config, &fx.artworks, &fx.settings, &fx.playlists).await;
        assert!(matches!(result, Err(Error::WalkFailed { .. })));

        // Placeholder got registered, but no track list was ever saved
        let library = fx
            .playlists
            .find_one(SERVICE, LIBRARY_PLAYLIST_ID)
            .await
            .unwrap()
            .unwrap();
        assert!(library.tracks.is_empty());
    }

    #[test]
    fn test_sort_by_artist_is_stable() {
        let mk = |artist: &str, title: &str| Track {
            service: SERVICE.to_string(),
            title: title.to_string(),
            share_url: String::new(),
            artist: crate::model::ArtistRef {
                name: artist.to_string(),
                id: artist.to_string(),
            },
            album: Default::default(),
            track_number: None,
            id: title.to_string(),
            duration: 0,
            artwork: String::new(),
            stream_url: String::new(),
        };

        let mut tracks = vec![
            mk("Zazie", "z1"),
            mk("Air", "a1"),
            mk("", "bare1"),
            mk("Air", "a2"),
            mk("", "bare2"),
        ];
        sort_by_artist(&mut tracks);

        let order: Vec<&str> = tracks.iter().map(|t| t.id.as_str()).collect();
        // Ascending by artist; ties keep their incoming order
        assert_eq!(order, ["bare1", "bare2", "a1", "a2", "z1"]);
    }

    #[tokio::test]
    async fn test_rescan_rebuilds_wholesale_with_stable_ids() {
        let fx = fixture();
        write_garbage(&fx, "one.mp3");

        let first = build_library(&fx.config, &fx.artworks, &fx.settings, &fx.playlists)
            .await
            .unwrap();
        let second = build_library(&fx.config, &fx.artworks, &fx.settings, &fx.playlists)
            .await
            .unwrap();

        assert_eq!(first.tracks.len(), 1);
        // Same unchanged file, same id on every scan
        assert_eq!(first.tracks[0].id, second.tracks[0].id);
    }
}
