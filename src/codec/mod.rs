//! Conversion of the album collection to and from its interchange formats

use std::{fmt::Display, path::Path};

use clap::ValueEnum;
use serde::Deserialize;

use crate::domain::Album;

pub mod csv;
pub mod error;
pub mod json;
pub mod xml;

pub use error::CodecError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Json,
    Xml,
    Csv,
}

impl Format {
    pub const ALL: [Format; 3] = [Format::Json, Format::Xml, Format::Csv];

    pub fn extension(self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Xml => "xml",
            Format::Csv => "csv",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Format::Json => "application/json",
            Format::Xml => "application/xml",
            Format::Csv => "text/csv",
        }
    }

    /// file name suggested to the share surface
    pub fn export_file_name(self) -> String {
        format!("albums_export.{}", self.extension())
    }

    /// Detects the format from the file extension, case-insensitive.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        Self::ALL.into_iter().find(|f| f.extension() == ext)
    }
}

impl Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension().to_uppercase())
    }
}

/// Knobs of the codec layer, loaded from the `[codec]` config section
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct CodecOptions {
    /// fail on malformed CSV rows and track entries instead of skipping them
    #[serde(default)]
    pub strict_csv: bool,
    /// write exported JSON without indentation
    #[serde(default)]
    pub compact_json_export: bool,
}

/// Encodes albums for export in the given format.
pub fn encode(
    albums: &[Album],
    format: Format,
    options: &CodecOptions,
) -> Result<Vec<u8>, CodecError> {
    match format {
        Format::Json if options.compact_json_export => json::encode_compact(albums),
        Format::Json => json::encode(albums),
        Format::Xml => xml::encode(albums),
        Format::Csv => Ok(csv::encode(albums)),
    }
}

/// Decodes a whole buffer. Nothing is returned until the entire input is decoded.
pub fn decode(
    bytes: &[u8],
    format: Format,
    options: &CodecOptions,
) -> Result<Vec<Album>, CodecError> {
    match format {
        Format::Json => json::decode(bytes),
        Format::Xml => xml::decode(bytes),
        Format::Csv => csv::decode(bytes, options.strict_csv),
    }
}
