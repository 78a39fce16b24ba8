//! CSV dialect with every field quoted and all tracks of an album packed into one cell.
//!
//! Decoding splits rows on the literal `","` instead of tokenizing,
//! so values containing `","`, ` | ` or `. ` do not survive a round trip.
//! Rows are single lines: line breaks inside values are written as spaces.

use log::warn;

use crate::{
    codec::CodecError,
    domain::{Album, Track},
};

pub const HEADER: &str = "ID,Name,Artist,Genre,Year,Medium,Digital,Tracks";

pub const DIGITAL_YES: &str = "Yes";
pub const DIGITAL_NO: &str = "No";
/// affirmative token of files written by older, German-labelled exports
const LEGACY_DIGITAL_YES: &str = "ja";

const COLUMNS: usize = 8;
const FIELD_SEPARATOR: &str = "\",\"";
const TRACK_SEPARATOR: &str = " | ";
const TRACK_NUMBER_SEPARATOR: &str = ". ";

fn quote(field: &str) -> String {
    let field = field.replace("\r\n", " ").replace(['\r', '\n'], " ");
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// Splits a row into unquoted fields. Only the row ends carry the outer quotes
/// once the inner `","` boundaries are consumed.
fn split_row(row: &str) -> Vec<String> {
    let row = row.strip_prefix('"').unwrap_or(row);
    let row = row.strip_suffix('"').unwrap_or(row);
    row.split(FIELD_SEPARATOR)
        .map(|field| field.replace("\"\"", "\""))
        .collect()
}

fn tracks_cell(album: &Album) -> String {
    album
        .sorted_tracks()
        .into_iter()
        .map(|t| format!("{}{TRACK_NUMBER_SEPARATOR}{}", t.track_number, t.title))
        .collect::<Vec<_>>()
        .join(TRACK_SEPARATOR)
}

pub fn encode(albums: &[Album]) -> Vec<u8> {
    let mut out = String::from(HEADER);
    out.push('\n');

    for album in albums {
        let digital = if album.digital { DIGITAL_YES } else { DIGITAL_NO };
        let tracks = tracks_cell(album);
        let row = [
            album.id.as_str(),
            album.name.as_str(),
            album.artist.as_str(),
            album.genre.as_str(),
            album.year.as_str(),
            album.medium.as_str(),
            digital,
            tracks.as_str(),
        ]
        .map(quote)
        .join(",");

        out.push_str(&row);
        out.push('\n');
    }

    out.into_bytes()
}

fn parse_digital(value: &str) -> bool {
    let value = value.trim();
    value.eq_ignore_ascii_case(DIGITAL_YES) || value.eq_ignore_ascii_case(LEGACY_DIGITAL_YES)
}

/// Decides what happens to a malformed row or track entry.
struct Recovery {
    strict: bool,
}

impl Recovery {
    fn skip(&self, line: usize, reason: String) -> Result<(), CodecError> {
        if self.strict {
            return Err(CodecError::CsvRow { line, reason });
        }
        warn!("CSV line {line}: {reason}, skipping");
        Ok(())
    }
}

fn parse_tracks(cell: &str, line: usize, recovery: &Recovery) -> Result<Vec<Track>, CodecError> {
    let mut tracks = Vec::new();
    if cell.is_empty() {
        return Ok(tracks);
    }

    for entry in cell.split(TRACK_SEPARATOR) {
        let parts = entry.split(TRACK_NUMBER_SEPARATOR).collect::<Vec<_>>();
        match parts.as_slice() {
            [number, title] => tracks.push(Track::new(*title, *number)),
            _ => recovery.skip(line, format!("malformed track entry '{entry}'"))?,
        }
    }

    Ok(tracks)
}

/// Decodes CSV text. Without `strict`, malformed rows and track entries are skipped,
/// so only undecodable bytes fail.
pub fn decode(bytes: &[u8], strict: bool) -> Result<Vec<Album>, CodecError> {
    let text = std::str::from_utf8(bytes)?;
    let recovery = Recovery { strict };
    let mut albums = Vec::new();

    // first line is the header
    for (index, row) in text.split('\n').enumerate().skip(1) {
        let line = index + 1;
        let row = row.strip_suffix('\r').unwrap_or(row);
        if row.trim().is_empty() {
            continue;
        }

        let fields = split_row(row);
        if fields.len() < COLUMNS {
            recovery.skip(
                line,
                format!("expected {COLUMNS} columns, found {}", fields.len()),
            )?;
            continue;
        }

        let tracks = parse_tracks(&fields[7], line, &recovery)?;
        let mut fields = fields.into_iter();
        let mut next = || fields.next().unwrap_or_default();

        albums.push(Album {
            id: next(),
            name: next(),
            artist: next(),
            genre: next(),
            year: next(),
            medium: next(),
            digital: parse_digital(&next()),
            tracks,
        });
    }

    Ok(albums)
}
