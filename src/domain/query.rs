use clap::ValueEnum;

use super::album::Album;

/// Which album fields a search text is matched against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SearchScope {
    #[default]
    All,
    AlbumName,
    ArtistName,
    TrackTitle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// Search, filter and ordering applied to the album list
#[derive(Debug, Clone, Default)]
pub struct AlbumQuery {
    pub text: String,
    pub scope: SearchScope,
    /// `None` or "All" means every medium
    pub medium: Option<String>,
    pub digital_only: bool,
    pub order: SortOrder,
}

impl AlbumQuery {
    pub fn matches(&self, album: &Album) -> bool {
        self.matches_text(album) && self.matches_medium(album) && (!self.digital_only || album.digital)
    }

    fn matches_text(&self, album: &Album) -> bool {
        if self.text.is_empty() {
            return true;
        }
        let needle = self.text.to_lowercase();
        let contains = |haystack: &str| haystack.to_lowercase().contains(&needle);

        let name = || contains(&album.name);
        let artist = || contains(&album.artist);
        let track = || album.tracks.iter().any(|t| contains(&t.title));

        match self.scope {
            SearchScope::All => name() || artist() || track(),
            SearchScope::AlbumName => name(),
            SearchScope::ArtistName => artist(),
            SearchScope::TrackTitle => track(),
        }
    }

    fn matches_medium(&self, album: &Album) -> bool {
        match &self.medium {
            None => true,
            Some(m) if m.eq_ignore_ascii_case("all") => true,
            Some(m) => album.medium.to_lowercase() == m.to_lowercase(),
        }
    }

    /// Albums passing every filter, ordered by lowercased name.
    pub fn apply<'a>(&self, albums: &'a [Album]) -> Vec<&'a Album> {
        let mut result = albums
            .iter()
            .filter(|a| self.matches(a))
            .collect::<Vec<_>>();

        result.sort_by_cached_key(|a| a.name.to_lowercase());
        if self.order == SortOrder::Descending {
            result.reverse();
        }
        result
    }
}
