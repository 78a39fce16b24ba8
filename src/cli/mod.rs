use clap::{Parser, Subcommand};
use log::{debug, error};
use std::path::PathBuf;

use crate::codec::Format;
use crate::config;
use crate::domain::Album;
use crate::domain::album::KNOWN_MEDIA;
use crate::domain::query::{AlbumQuery, SearchScope, SortOrder};
use crate::domain::track::Track;
use crate::storage::Library;

#[derive(Parser)]
#[command(name = "albumdeck")]
#[command(version = "0.1")]
#[command(about = "Personal album collection catalogue")]
pub struct Cli {
    /// Path to the config TOML file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Library JSON file, overrides the config
    #[arg(short, long)]
    pub library: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List albums
    List {
        /// Case-insensitive search text
        #[arg(short, long)]
        search: Option<String>,
        /// Fields the search text is matched against
        #[arg(long, value_enum, default_value_t = SearchScope::All)]
        scope: SearchScope,
        /// Only albums on this medium ("All" for every medium)
        #[arg(short, long)]
        medium: Option<String>,
        /// Only albums with a digital copy
        #[arg(short, long)]
        digital: bool,
        /// Sort by name descending
        #[arg(long)]
        descending: bool,
    },
    /// Show an album with its tracks
    Show { id: String },
    /// Add a new album
    Add {
        name: String,
        artist: String,
        #[arg(long, default_value = "")]
        genre: String,
        /// Defaults to the current year
        #[arg(long)]
        year: Option<String>,
        /// Vinyl, CD, Cassette, Digital or anything else
        #[arg(long)]
        medium: Option<String>,
        #[arg(long)]
        digital: bool,
        /// Track titles, numbered in the given order
        #[arg(short, long = "track")]
        tracks: Vec<String>,
    },
    /// Remove an album
    Remove { id: String },
    /// Append a track to an album
    AddTrack { album_id: String, title: String },
    /// Remove a track by its position (starting at 1) and renumber the rest
    RemoveTrack { album_id: String, position: usize },
    /// Replace the library with the content of a JSON, XML or CSV file
    Import {
        file: PathBuf,
        /// Detected from the file extension when omitted
        #[arg(short, long, value_enum)]
        format: Option<Format>,
    },
    /// Export the library
    Export {
        #[arg(value_enum)]
        format: Format,
        /// Defaults to albums_export.<ext> in the current directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show collection statistics
    Stats,
}

/// Entrypoint for CLI
pub fn run() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(e) = execute(cli) {
        error!("{e:#}");
        std::process::exit(1);
    }
}

fn print_album_line(album: &Album) {
    let digital = if album.digital { " +digital" } else { "" };
    println!(
        "{}  {} - {} ({}, {}{})",
        album.id, album.artist, album.name, album.year, album.medium, digital
    );
}

fn execute(cli: Cli) -> anyhow::Result<()> {
    let cfg = match &cli.config {
        Some(path) => config::Config::load(path)?,
        None => config::Config::default(),
    };
    let location = cli.library.unwrap_or(cfg.library.path);
    let mut library = Library::load(location, cfg.codec);
    let events = library.subscribe();

    match cli.command {
        Commands::List {
            search,
            scope,
            medium,
            digital,
            descending,
        } => {
            let query = AlbumQuery {
                text: search.unwrap_or_default(),
                scope,
                medium,
                digital_only: digital,
                order: if descending {
                    SortOrder::Descending
                } else {
                    SortOrder::Ascending
                },
            };

            let albums = library.search(&query);
            if library.albums().is_empty() {
                println!("No albums yet. Add one or import a file.");
            } else if albums.is_empty() {
                println!("No albums match.");
            }
            for album in albums {
                print_album_line(album);
            }
        }

        Commands::Show { id } => {
            let album = library
                .album(&id)
                .ok_or_else(|| anyhow::anyhow!("album {id} not found"))?;

            println!("{}", album.name);
            println!("  Artist: {}", album.artist);
            println!("  Genre:  {}", album.genre);
            println!("  Year:   {}", album.year);
            println!("  Medium: {}", album.medium);
            println!("  Digital copy: {}", if album.digital { "yes" } else { "no" });
            println!("  Tracks:");
            for track in album.sorted_tracks() {
                println!("    {}. {}", track.formatted_track_number(), track.title);
            }
        }

        Commands::Add {
            name,
            artist,
            genre,
            year,
            medium,
            digital,
            tracks,
        } => {
            let mut album = Album::create(name, artist);
            album.genre = genre;
            album.digital = digital;
            if let Some(year) = year {
                album.year = year;
            }
            if let Some(medium) = medium {
                if !KNOWN_MEDIA.iter().any(|m| m.eq_ignore_ascii_case(&medium)) {
                    log::warn!("Unusual medium '{medium}', known media are {KNOWN_MEDIA:?}");
                }
                album.medium = medium;
            }
            album.tracks = tracks
                .into_iter()
                .enumerate()
                .map(|(i, title)| Track::new(title, (i + 1).to_string()))
                .collect();

            let id = album.id.clone();
            library.add_album(album)?;
            println!("Added album {id}");
        }

        Commands::Remove { id } => {
            let album = library.remove_album(&id)?;
            println!("Removed {} - {}", album.artist, album.name);
        }

        Commands::AddTrack { album_id, title } => {
            library.add_track(&album_id, &title)?;
            println!("Added track '{title}'");
        }

        Commands::RemoveTrack { album_id, position } => {
            let index = position
                .checked_sub(1)
                .ok_or_else(|| anyhow::anyhow!("track positions start at 1"))?;
            let track = library.remove_track(&album_id, index)?;
            println!("Removed track '{}'", track.title);
        }

        Commands::Import { file, format } => {
            let count = library.import_file(&file, format)?;
            println!(
                "Imported {count} albums from {}, library saved to {}",
                file.display(),
                library.location().display()
            );
        }

        Commands::Export { format, output } => {
            let output = output.unwrap_or_else(|| PathBuf::from(format.export_file_name()));
            library.export_to_file(format, &output)?;
            println!(
                "Exported {} albums to {} ({})",
                library.albums().len(),
                output.display(),
                format.mime_type()
            );
        }

        Commands::Stats => {
            let stats = library.stats();
            println!("Albums: {}", stats.albums);
            println!("Tracks: {}", stats.tracks);
            println!("With digital copy: {}", stats.digital);
            println!("By medium:");
            for (medium, count) in &stats.by_medium {
                println!("    - {medium}: {count}");
            }
            if !stats.by_genre.is_empty() {
                println!("By genre:");
                for (genre, count) in &stats.by_genre {
                    println!("    - {genre}: {count}");
                }
            }
        }
    }

    for event in events.try_iter() {
        debug!("Library changed: {event:?}");
    }

    Ok(())
}
