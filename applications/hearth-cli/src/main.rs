/// Hearth - offline media library
use anyhow::Context;
use clap::{Parser, Subcommand};
use hearth_core::{DecodeProbe, LibraryStore, MetadataExtractor, SongId};
use hearth_importer::{
    FileScanner, FsSourceAccess, ImportOutcome, ImportPipeline, LoftyExtractor, SymphoniaProbe,
};
use hearth_playback::{PlaybackCoordinator, PlaybackEvent, PlaybackState};
use hearth_storage::LocalLibraryStore;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod output;

use config::HearthConfig;
use output::{ClockOutput, LogNowPlaying};

#[derive(Parser)]
#[command(name = "hearth")]
#[command(about = "Offline media library manager", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "HEARTH_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import audio files or directories into the library
    Import {
        /// Files or directories to import
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// List all songs
    Songs,
    /// List all albums
    Albums,
    /// Show what the importer would read from a file
    Probe {
        /// Audio file to inspect
        path: PathBuf,
    },
    /// Play a song by ID until it ends or Ctrl-C
    Play {
        /// Song ID (see `hearth songs`)
        song_id: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hearth=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = HearthConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Import { paths } => import(&config, &paths).await?,
        Commands::Songs => list_songs(&config).await?,
        Commands::Albums => list_albums(&config).await?,
        Commands::Probe { path } => probe(&path)?,
        Commands::Play { song_id } => play(&config, SongId::new(song_id)).await?,
    }

    Ok(())
}

async fn open_store(config: &HearthConfig) -> anyhow::Result<LocalLibraryStore> {
    if let Some(dir) = sqlite_parent_dir(&config.storage.database_url) {
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("creating database directory {}", dir.display()))?;
    }

    let pool = hearth_storage::create_pool(&config.storage.database_url).await?;
    hearth_storage::run_migrations(&pool).await?;
    Ok(LocalLibraryStore::new(pool))
}

/// Directory holding a file-backed SQLite database, if any
fn sqlite_parent_dir(database_url: &str) -> Option<PathBuf> {
    let path = database_url.strip_prefix("sqlite://")?;
    let path = path.split('?').next()?;
    if path.is_empty() || path.starts_with(':') {
        return None;
    }
    Path::new(path)
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
}

async fn import(config: &HearthConfig, paths: &[PathBuf]) -> anyhow::Result<()> {
    let store = open_store(config).await?;
    let pipeline = ImportPipeline::new(
        Arc::new(store),
        Arc::new(LoftyExtractor),
        Arc::new(SymphoniaProbe),
        Arc::new(FsSourceAccess),
        config.import_config(),
    )?;

    let sources = FileScanner::new().expand(paths);
    tracing::info!(count = sources.len(), "Importing");

    let (tx, mut rx) = tokio::sync::mpsc::channel::<hearth_importer::ImportProgress>(64);
    let printer = tokio::spawn(async move {
        while let Some(progress) = rx.recv().await {
            match progress.outcome {
                ImportOutcome::Imported { title, .. } => {
                    println!("[{}/{}] imported {}", progress.completed, progress.total, title);
                }
                ImportOutcome::Failed { reason } => {
                    println!(
                        "[{}/{}] failed {}: {}",
                        progress.completed,
                        progress.total,
                        progress.source.display(),
                        reason
                    );
                }
            }
        }
    });

    let summary = pipeline.import_batch(sources, Some(tx)).await;
    printer.await?;

    println!("{}", summary.summary_text());
    Ok(())
}

async fn list_songs(config: &HearthConfig) -> anyhow::Result<()> {
    let store = open_store(config).await?;
    let songs = store.get_all_songs().await?;

    if songs.is_empty() {
        println!("No songs in library");
        return Ok(());
    }

    for song in songs {
        let secs = song.duration().as_secs();
        println!(
            "{}  {} - {} [{}] ({}:{:02})",
            song.id,
            song.artist,
            song.title,
            song.album_name,
            secs / 60,
            secs % 60
        );
    }
    Ok(())
}

async fn list_albums(config: &HearthConfig) -> anyhow::Result<()> {
    let store = open_store(config).await?;
    let albums = store.get_all_albums().await?;

    if albums.is_empty() {
        println!("No albums in library");
        return Ok(());
    }

    for album in albums {
        let year = album.year.map(|y| format!(" ({y})")).unwrap_or_default();
        println!(
            "{}  {} - {}{}  {} song(s){}",
            album.id,
            album.artist,
            album.name,
            year,
            album.song_ids.len(),
            if album.has_artwork() { ", artwork" } else { "" }
        );
    }
    Ok(())
}

fn probe(path: &Path) -> anyhow::Result<()> {
    let duration = SymphoniaProbe
        .probe(path)
        .with_context(|| format!("{} is not decodable", path.display()))?;
    println!("decodable: {:.2}s", duration.as_secs_f64());

    match LoftyExtractor.extract(path) {
        Ok(metadata) => {
            println!("{}", serde_json::to_string_pretty(&metadata)?);
            if metadata.artwork.is_some() {
                println!("embedded artwork present");
            }
        }
        Err(e) => println!("no readable tags: {e}"),
    }
    Ok(())
}

async fn play(config: &HearthConfig, song_id: SongId) -> anyhow::Result<()> {
    let store = open_store(config).await?;
    let song = store
        .get_song(&song_id)
        .await?
        .with_context(|| format!("song {song_id} not found"))?;

    let player = PlaybackCoordinator::spawn(
        Box::new(ClockOutput::new()),
        Arc::new(LogNowPlaying),
        config.storage.managed_root.clone(),
        config.playback_config(),
    );
    let mut events = player.subscribe();

    println!("Playing {} - {}", song.artist, song.title);
    player.play(song).await?;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                player.stop().await?;
                break;
            }
            event = events.recv() => match event {
                Ok(PlaybackEvent::PositionUpdate { position_ms, duration_ms }) => {
                    print!("\r{} / {}", format_ms(position_ms), format_ms(duration_ms));
                    std::io::stdout().flush()?;
                }
                Ok(PlaybackEvent::StateChanged { state: PlaybackState::Stopped | PlaybackState::Idle }) => break,
                Ok(PlaybackEvent::Error { error }) => {
                    println!();
                    anyhow::bail!("playback failed: {error:?}");
                }
                Ok(_) => {}
                Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => {}
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            },
        }
    }

    println!();
    Ok(())
}

fn format_ms(ms: u64) -> String {
    let secs = ms / 1000;
    format!("{}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlite_parent_dir() {
        assert_eq!(
            sqlite_parent_dir("sqlite://./data/hearth.db"),
            Some(PathBuf::from("./data"))
        );
        assert_eq!(sqlite_parent_dir("sqlite://hearth.db"), None);
        assert_eq!(sqlite_parent_dir("sqlite::memory:"), None);
        assert_eq!(
            sqlite_parent_dir("sqlite:///var/lib/hearth/db.sqlite?mode=rwc"),
            Some(PathBuf::from("/var/lib/hearth"))
        );
    }

    #[test]
    fn test_format_ms() {
        assert_eq!(format_ms(0), "0:00");
        assert_eq!(format_ms(61_500), "1:01");
    }

    #[test]
    fn test_cli_parses_import() {
        let cli = Cli::try_parse_from(["hearth", "import", "a.mp3", "music/"]).unwrap();
        match cli.command {
            Commands::Import { paths } => assert_eq!(paths.len(), 2),
            _ => panic!("expected import"),
        }
    }
}
