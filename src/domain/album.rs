use chrono::{Datelike, Local};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::track::{Track, sorted_tracks};

/// Media offered when creating an album. Any other string is accepted too.
pub const KNOWN_MEDIA: &[&str] = &["Vinyl", "CD", "Cassette", "Digital"];

pub const DEFAULT_MEDIUM: &str = "Vinyl";

/// Represent an album of the collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Album {
    pub id: String,
    pub name: String,
    pub artist: String,
    pub genre: String,
    pub year: String,
    pub medium: String,
    /// has a digital copy, independent of `medium`
    pub digital: bool,
    pub tracks: Vec<Track>,
}

impl Album {
    /// Album with every field empty, the starting point of decoders.
    pub fn empty() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            artist: String::new(),
            genre: String::new(),
            year: String::new(),
            medium: String::new(),
            digital: false,
            tracks: Vec::new(),
        }
    }

    /// Creates a new album with a fresh id, the current year and the default medium.
    pub fn create(name: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            artist: artist.into(),
            year: Local::now().year().to_string(),
            medium: DEFAULT_MEDIUM.to_string(),
            ..Self::empty()
        }
    }

    /// Reorders tracks by their best-effort track number.
    pub fn sort_tracks(&mut self) {
        self.tracks.sort_by_key(Track::sort_key);
    }

    pub fn sorted_tracks(&self) -> Vec<&Track> {
        sorted_tracks(&self.tracks)
    }

    /// Appends a track numbered after the current track count.
    pub fn push_track(&mut self, title: impl Into<String>) -> &Track {
        let number = (self.tracks.len() + 1).to_string();
        self.tracks.push(Track::new(title, number));
        &self.tracks[self.tracks.len() - 1]
    }

    /// Removes the track at `index` and renumbers the rest `1..=n` in list order.
    pub fn remove_track(&mut self, index: usize) -> Option<Track> {
        if index >= self.tracks.len() {
            return None;
        }
        let removed = self.tracks.remove(index);
        for (i, track) in self.tracks.iter_mut().enumerate() {
            track.track_number = (i + 1).to_string();
        }
        Some(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_fills_defaults() {
        let album = Album::create("Blue", "Joni Mitchell");

        assert!(Uuid::parse_str(&album.id).is_ok());
        assert_eq!(album.year, Local::now().year().to_string());
        assert_eq!(album.medium, "Vinyl");
        assert!(!album.digital);
        assert!(album.tracks.is_empty());
    }

    #[test]
    fn push_track_numbers_after_count() {
        let mut album = Album::create("a", "b");
        album.push_track("first");
        album.push_track("second");

        assert_eq!(album.tracks[0].track_number, "1");
        assert_eq!(album.tracks[1].track_number, "2");
    }

    #[test]
    fn remove_track_renumbers() {
        let mut album = Album::create("a", "b");
        album.tracks = vec![
            Track::new("one", "1"),
            Track::new("two", "2"),
            Track::new("three", "7"),
        ];

        let removed = album.remove_track(0).unwrap();
        assert_eq!(removed.title, "one");

        let numbers = album
            .tracks
            .iter()
            .map(|t| (t.title.as_str(), t.track_number.as_str()))
            .collect::<Vec<_>>();
        assert_eq!(numbers, vec![("two", "1"), ("three", "2")]);

        assert!(album.remove_track(5).is_none());
    }

    #[test]
    fn json_field_names() -> anyhow::Result<()> {
        let mut album = Album::create("Test", "X");
        album.id = "a1".to_string();
        album.year = "2020".to_string();
        album.tracks.push(Track::new("Song", "1"));

        let value = serde_json::to_value(&album)?;
        let keys = value
            .as_object()
            .unwrap()
            .keys()
            .cloned()
            .collect::<Vec<_>>();

        for key in [
            "id", "name", "artist", "genre", "year", "medium", "digital", "tracks",
        ] {
            assert!(keys.contains(&key.to_string()), "missing {key}");
        }
        assert_eq!(value["tracks"][0]["trackNumber"], "1");
        Ok(())
    }
}
