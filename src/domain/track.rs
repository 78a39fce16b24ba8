use std::fmt::Display;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Session-only identity of a track.
///
/// It is never written to or read from any export format,
/// so a reload always hands out fresh ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TrackId(pub Uuid);

impl TrackId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TrackId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for TrackId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Represent a track of an album
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    #[serde(skip)]
    pub id: TrackId,
    pub title: String,
    /// kept as text so that values like "A1" or "01" survive
    #[serde(rename = "trackNumber")]
    pub track_number: String,
}

/// Equality compares content only, ids are not part of a track's data.
impl PartialEq for Track {
    fn eq(&self, other: &Self) -> bool {
        self.title == other.title && self.track_number == other.track_number
    }
}

impl Eq for Track {}

impl Track {
    pub fn new(title: impl Into<String>, track_number: impl Into<String>) -> Self {
        Self {
            id: TrackId::new(),
            title: title.into(),
            track_number: track_number.into(),
        }
    }

    /// Track number for display: "01" becomes "1", non-numeric values are shown as is.
    pub fn formatted_track_number(&self) -> String {
        match self.track_number.parse::<i64>() {
            Ok(n) => n.to_string(),
            Err(_) => self.track_number.clone(),
        }
    }

    /// Best-effort numeric sort key. Every non-numeric track number collapses to 0.
    pub fn sort_key(&self) -> i64 {
        parse_int_or(&self.track_number, 0)
    }
}

pub fn parse_int_or(value: &str, default: i64) -> i64 {
    value.parse().unwrap_or(default)
}

/// Tracks ordered by [`Track::sort_key`]; equal keys keep their list order.
pub fn sorted_tracks(tracks: &[Track]) -> Vec<&Track> {
    let mut sorted = tracks.iter().collect::<Vec<_>>();
    sorted.sort_by_key(|t| t.sort_key());
    sorted
}
