use std::collections::BTreeMap;

use super::album::Album;

/// Counters over the whole collection
#[derive(Debug, Default, PartialEq, Eq)]
pub struct LibraryStats {
    pub albums: usize,
    pub tracks: usize,
    /// albums having a digital copy
    pub digital: usize,
    pub by_medium: BTreeMap<String, usize>,
    pub by_genre: BTreeMap<String, usize>,
}

impl LibraryStats {
    pub fn collect(albums: &[Album]) -> Self {
        let mut stats = Self {
            albums: albums.len(),
            ..Default::default()
        };

        for album in albums {
            stats.tracks += album.tracks.len();
            if album.digital {
                stats.digital += 1;
            }
            *stats.by_medium.entry(album.medium.clone()).or_default() += 1;
            if !album.genre.is_empty() {
                *stats.by_genre.entry(album.genre.clone()).or_default() += 1;
            }
        }

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::track::Track;

    #[test]
    fn counts_everything() {
        let albums = vec![
            Album {
                medium: "Vinyl".to_string(),
                genre: "Jazz".to_string(),
                digital: true,
                tracks: vec![Track::new("a", "1"), Track::new("b", "2")],
                ..Album::empty()
            },
            Album {
                medium: "Vinyl".to_string(),
                tracks: vec![Track::new("c", "1")],
                ..Album::empty()
            },
            Album {
                medium: "CD".to_string(),
                genre: "Jazz".to_string(),
                ..Album::empty()
            },
        ];

        let stats = LibraryStats::collect(&albums);

        assert_eq!(stats.albums, 3);
        assert_eq!(stats.tracks, 3);
        assert_eq!(stats.digital, 1);
        assert_eq!(stats.by_medium.get("Vinyl"), Some(&2));
        assert_eq!(stats.by_medium.get("CD"), Some(&1));
        assert_eq!(stats.by_genre.get("Jazz"), Some(&2));
        assert_eq!(stats.by_genre.len(), 1);
    }

    #[test]
    fn empty_library() {
        assert_eq!(LibraryStats::collect(&[]), LibraryStats::default());
    }
}
