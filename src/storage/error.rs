use std::path::PathBuf;

use thiserror::Error;

use crate::codec::CodecError;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("filesystem error: {0}")]
    Fs(#[from] std::io::Error),

    #[error("album {0} not found")]
    AlbumNotFound(String),

    #[error("album {album} has no track at position {index}")]
    TrackNotFound { album: String, index: usize },

    #[error("cannot tell the format of {0}, expected a .json, .xml or .csv file")]
    UnknownFormat(PathBuf),
}
