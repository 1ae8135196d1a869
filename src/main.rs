//! Command-line front end for the local-tracks plugin.
//!
//! Lets the scan pipeline run without a host player: pick a library
//! folder, scan it, and print the resulting Library playlist.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Runtime;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use local_tracks::artwork::ArtworkCache;
use local_tracks::config;
use local_tracks::model::Track;
use local_tracks::plugin::{self, LocalService};
use local_tracks::store::{JsonSettings, MemoryPlaylists, NativePicker, SpecialView, ViewKind};

/// Local music library scanner
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a directory and print the resulting library
    Scan {
        /// Directory to scan (defaults to the configured path)
        path: Option<PathBuf>,
        /// Print the playlist as JSON instead of a track list
        #[arg(long)]
        json: bool,
    },
    /// Choose the library directory with the native picker and save it
    Login,
    /// Show the current configuration
    Info,
}

/// Prints special views to stdout; the CLI has no richer surface.
struct StdoutView;

impl SpecialView for StdoutView {
    fn render(
        &self,
        _service: &str,
        tracks: Vec<Track>,
        kind: ViewKind,
        label: &str,
        _artwork: &str,
    ) {
        println!("{:?} view '{}': {} tracks", kind, label, tracks.len());
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(EnvFilter::from_default_env().add_directive("local_tracks=info".parse()?))
        .init();

    match cli.command {
        Commands::Scan { path, json } => cmd_scan(path, json),
        Commands::Login => cmd_login(),
        Commands::Info => cmd_info(),
    }
}

fn build_service(config: config::ServiceConfig) -> anyhow::Result<LocalService> {
    let settings_path = config::config_dir()
        .ok_or_else(|| anyhow::anyhow!("could not determine config directory"))?
        .join("settings.json");

    Ok(LocalService::new(
        config,
        ArtworkCache::default_location(),
        Arc::new(JsonSettings::open(settings_path)),
        Arc::new(MemoryPlaylists::new()),
        Arc::new(NativePicker),
        Arc::new(StdoutView),
    ))
}

fn cmd_scan(path: Option<PathBuf>, json: bool) -> anyhow::Result<()> {
    let mut cfg = config::load();
    if let Some(path) = path {
        cfg.paths = vec![path];
    }

    let rt = Runtime::new()?;
    let mut service = build_service(cfg)?;
    let library = rt.block_on(service.fetch_data())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&library)?);
        return Ok(());
    }

    for track in &library.tracks {
        let secs = track.duration / 1000;
        let artist = if track.artist.name.is_empty() {
            "<untagged>"
        } else {
            &track.artist.name
        };
        println!("{:>3}:{:02}  {} - {}", secs / 60, secs % 60, artist, track.title);
    }
    println!("{} tracks", library.tracks.len());
    Ok(())
}

fn cmd_login() -> anyhow::Result<()> {
    let rt = Runtime::new()?;
    let mut service = build_service(config::load())?;

    rt.block_on(service.login())?;

    config::save(service.config())?;
    println!("Library path: {:?}", service.config().paths);
    Ok(())
}

fn cmd_info() -> anyhow::Result<()> {
    let cfg = config::load();
    println!("active: {}", cfg.active);
    match cfg.scan_root() {
        Some(root) => println!("path: {}", root.display()),
        None => println!("path: <not configured>"),
    }
    println!(
        "works offline: {}, scrobbling: {}",
        plugin::WORKS_OFFLINE,
        plugin::SCROBBLING
    );
    Ok(())
}
