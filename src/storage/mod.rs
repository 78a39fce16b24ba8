pub mod error;
mod fs;
pub mod library;

pub use error::StorageError;
pub use library::{Library, LibraryEvent};
