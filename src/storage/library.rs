use std::path::{Path, PathBuf};

use crossbeam_channel::{Receiver, Sender};
use log::{debug, error, info, warn};

use crate::{
    codec::{self, CodecError, CodecOptions, Format, json},
    domain::{
        Album, Track, TrackId,
        query::AlbumQuery,
        stats::LibraryStats,
    },
    storage::{error::StorageError, fs},
};

/// Sent to subscribers once a change is complete and persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LibraryEvent {
    Loaded { albums: usize },
    Replaced { albums: usize },
    AlbumAdded(String),
    AlbumUpdated(String),
    AlbumRemoved(String),
}

/// Owner of the album collection.
///
/// Every mutation is persisted to the library file before it returns.
/// There is no locking: two libraries saving to the same file overwrite each other.
#[derive(Debug)]
pub struct Library {
    albums: Vec<Album>,
    location: PathBuf,
    options: CodecOptions,
    subscribers: Vec<Sender<LibraryEvent>>,
}

fn decode_or_empty(location: &Path, bytes: &[u8]) -> Vec<Album> {
    match json::decode(bytes) {
        Ok(albums) => {
            info!("Loaded {} albums from {}", albums.len(), location.display());
            albums
        }
        Err(e) => {
            error!(
                "Failed to decode library {}: {e}. Starting with an empty library",
                location.display()
            );
            Vec::new()
        }
    }
}

impl Library {
    /// Loads the library file at `location`. Never fails:
    /// a missing file is created empty, an unreadable or malformed one yields an empty library.
    pub fn load(location: impl Into<PathBuf>, options: CodecOptions) -> Self {
        let mut library = Self {
            albums: Vec::new(),
            location: location.into(),
            options,
            subscribers: Vec::new(),
        };
        library.reload();
        library
    }

    /// Re-reads the library file, with the same fallbacks as [`Library::load`].
    pub fn reload(&mut self) {
        match fs::read_optional(&self.location) {
            Ok(Some(bytes)) => self.albums = decode_or_empty(&self.location, &bytes),
            Ok(None) => {
                info!(
                    "No library at {}, creating an empty one",
                    self.location.display()
                );
                self.albums = Vec::new();
                if let Err(e) = self.save() {
                    error!("Failed to create {}: {e}", self.location.display());
                }
            }
            Err(e) => {
                error!("Failed to read {}: {e}", self.location.display());
                self.albums = Vec::new();
            }
        }
        self.notify(LibraryEvent::Loaded {
            albums: self.albums.len(),
        });
    }

    /// Switches to another library file and loads it.
    pub fn relocate(&mut self, location: impl Into<PathBuf>) {
        self.location = location.into();
        info!("Library location changed to {}", self.location.display());
        self.reload();
    }

    pub fn location(&self) -> &Path {
        &self.location
    }

    pub fn albums(&self) -> &[Album] {
        &self.albums
    }

    /// First album with the given id
    pub fn album(&self, id: &str) -> Option<&Album> {
        self.albums.iter().find(|a| a.id == id)
    }

    pub fn search(&self, query: &AlbumQuery) -> Vec<&Album> {
        query.apply(&self.albums)
    }

    pub fn stats(&self) -> LibraryStats {
        LibraryStats::collect(&self.albums)
    }

    /// Writes the whole collection as pretty JSON.
    pub fn save(&self) -> Result<(), StorageError> {
        let bytes = json::encode(&self.albums)?;
        fs::write_atomic(&self.location, &bytes)?;
        debug!(
            "Saved {} albums to {}",
            self.albums.len(),
            self.location.display()
        );
        Ok(())
    }

    /// Replaces the whole collection with the decoded `bytes`.
    ///
    /// The input is decoded completely before anything changes,
    /// a decode error leaves the library untouched.
    pub fn import_from(&mut self, bytes: &[u8], format: Format) -> Result<usize, StorageError> {
        let albums = codec::decode(bytes, format, &self.options).inspect_err(|e| {
            warn!("{format} import failed: {e}");
        })?;

        self.albums = albums;
        self.save()?;

        let count = self.albums.len();
        info!("Imported {count} albums from {format}");
        self.notify(LibraryEvent::Replaced { albums: count });
        Ok(count)
    }

    /// Imports a file, detecting the format from its extension unless given.
    pub fn import_file(&mut self, path: &Path, format: Option<Format>) -> Result<usize, StorageError> {
        let format = format
            .or_else(|| Format::from_path(path))
            .ok_or_else(|| StorageError::UnknownFormat(path.to_path_buf()))?;
        let bytes = std::fs::read(path)?;
        self.import_from(&bytes, format)
    }

    pub fn export_to(&self, format: Format) -> Result<Vec<u8>, CodecError> {
        codec::encode(&self.albums, format, &self.options)
    }

    pub fn export_to_file(&self, format: Format, path: &Path) -> Result<(), StorageError> {
        let bytes = self.export_to(format)?;
        fs::write_atomic(path, &bytes)?;
        info!(
            "Exported {} albums as {format} to {}",
            self.albums.len(),
            path.display()
        );
        Ok(())
    }

    fn position(&self, id: &str) -> Result<usize, StorageError> {
        self.albums
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| StorageError::AlbumNotFound(id.to_string()))
    }

    pub fn add_album(&mut self, mut album: Album) -> Result<(), StorageError> {
        album.sort_tracks();
        let id = album.id.clone();
        self.albums.push(album);
        self.save()?;
        self.notify(LibraryEvent::AlbumAdded(id));
        Ok(())
    }

    /// Replaces the first album with the same id. Later duplicates are left alone.
    pub fn update_album(&mut self, mut album: Album) -> Result<(), StorageError> {
        let index = self.position(&album.id)?;
        album.sort_tracks();
        let id = album.id.clone();
        self.albums[index] = album;
        self.save()?;
        self.notify(LibraryEvent::AlbumUpdated(id));
        Ok(())
    }

    pub fn remove_album(&mut self, id: &str) -> Result<Album, StorageError> {
        let index = self.position(id)?;
        let removed = self.albums.remove(index);
        self.save()?;
        self.notify(LibraryEvent::AlbumRemoved(removed.id.clone()));
        Ok(removed)
    }

    pub fn add_track(&mut self, album_id: &str, title: &str) -> Result<TrackId, StorageError> {
        let index = self.position(album_id)?;
        let track_id = self.albums[index].push_track(title).id;
        self.save()?;
        self.notify(LibraryEvent::AlbumUpdated(album_id.to_string()));
        Ok(track_id)
    }

    /// Removes the track at `index` (zero based) and renumbers the remaining tracks.
    pub fn remove_track(&mut self, album_id: &str, index: usize) -> Result<Track, StorageError> {
        let position = self.position(album_id)?;
        let removed = self.albums[position]
            .remove_track(index)
            .ok_or_else(|| StorageError::TrackNotFound {
                album: album_id.to_string(),
                index,
            })?;
        self.save()?;
        self.notify(LibraryEvent::AlbumUpdated(album_id.to_string()));
        Ok(removed)
    }

    /// Returns a receiver of every change made after this call.
    pub fn subscribe(&mut self) -> Receiver<LibraryEvent> {
        let (tx, rx) = crossbeam_channel::unbounded();
        self.subscribers.push(tx);
        rx
    }

    fn notify(&mut self, event: LibraryEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}
