pub mod album;
pub mod query;
pub mod stats;
pub mod track;

pub use album::Album;
pub use track::{Track, TrackId};
