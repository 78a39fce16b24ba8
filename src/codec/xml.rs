//! XML dialect: `<albums>` root, one `<album>` per album, tracks nested under `<tracks>`

use std::borrow::Cow;

use log::{debug, warn};
use quick_xml::{
    Reader, Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};

use crate::{
    codec::CodecError,
    domain::{Album, Track},
};

const ALBUMS: &str = "albums";
const ALBUM: &str = "album";
const ID: &str = "id";
const NAME: &str = "name";
const ARTIST: &str = "artist";
const GENRE: &str = "genre";
const YEAR: &str = "year";
const MEDIUM: &str = "medium";
const DIGITAL: &str = "digital";
const TRACKS: &str = "tracks";
const TRACK: &str = "track";
const TITLE: &str = "title";
const TRACK_NUMBER: &str = "trackNumber";

/// substituted when a decoded track has no number
const DEFAULT_TRACK_NUMBER: &str = "0";

struct XmlOut {
    writer: Writer<Vec<u8>>,
}

impl XmlOut {
    fn new() -> Self {
        Self {
            writer: Writer::new_with_indent(Vec::new(), b' ', 2),
        }
    }

    fn write(&mut self, event: Event<'_>) -> Result<(), CodecError> {
        self.writer
            .write_event(event)
            .map_err(CodecError::xml_write)
    }

    fn start(&mut self, name: &str) -> Result<(), CodecError> {
        self.write(Event::Start(BytesStart::new(name)))
    }

    fn end(&mut self, name: &str) -> Result<(), CodecError> {
        self.write(Event::End(BytesEnd::new(name)))
    }

    /// `BytesText::new` escapes all five predefined entities
    fn leaf(&mut self, name: &str, value: &str) -> Result<(), CodecError> {
        if value.is_empty() {
            return self.write(Event::Empty(BytesStart::new(name)));
        }
        self.start(name)?;
        self.write(Event::Text(BytesText::new(value)))?;
        self.end(name)
    }

    fn finish(self) -> Vec<u8> {
        let mut bytes = self.writer.into_inner();
        bytes.push(b'\n');
        bytes
    }
}

/// Writes the collection as an XML document. Tracks are written in track number order.
pub fn encode(albums: &[Album]) -> Result<Vec<u8>, CodecError> {
    let mut out = XmlOut::new();
    out.write(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    out.start(ALBUMS)?;

    for album in albums {
        out.start(ALBUM)?;
        out.leaf(ID, &album.id)?;
        out.leaf(NAME, &album.name)?;
        out.leaf(ARTIST, &album.artist)?;
        out.leaf(GENRE, &album.genre)?;
        out.leaf(YEAR, &album.year)?;
        out.leaf(MEDIUM, &album.medium)?;
        out.leaf(DIGITAL, if album.digital { "true" } else { "false" })?;

        out.start(TRACKS)?;
        for track in album.sorted_tracks() {
            out.start(TRACK)?;
            out.leaf(TITLE, &track.title)?;
            out.leaf(TRACK_NUMBER, &track.track_number)?;
            out.end(TRACK)?;
        }
        out.end(TRACKS)?;

        out.end(ALBUM)?;
    }

    out.end(ALBUMS)?;
    Ok(out.finish())
}

/// Partially built albums and tracks, fed by parser events.
#[derive(Debug, Default)]
struct Accumulator {
    albums: Vec<Album>,
    album: Option<Album>,
    track: Option<Track>,
    /// tracks seen since the album opened, attached on `</tracks>`
    pending_tracks: Vec<Track>,
    text: String,
}

impl Accumulator {
    fn start(&mut self, name: &str) {
        match name {
            ALBUM => {
                self.album = Some(Album::empty());
                self.pending_tracks.clear();
            }
            TRACK => self.track = Some(Track::new("", "")),
            _ => {}
        }
        self.text.clear();
    }

    fn text(&mut self, text: &str) {
        self.text.push_str(text);
    }

    fn end(&mut self, name: &str) {
        let text = std::mem::take(&mut self.text);
        let value = text.trim();

        match name {
            ID | NAME | ARTIST | GENRE | YEAR | MEDIUM | DIGITAL => {
                if let Some(album) = self.album.as_mut() {
                    Self::set_album_field(album, name, value);
                }
            }
            TITLE => {
                if let Some(track) = self.track.as_mut() {
                    track.title = value.to_string();
                }
            }
            TRACK_NUMBER => {
                if let Some(track) = self.track.as_mut() {
                    track.track_number = value.to_string();
                }
            }
            TRACK => self.close_track(),
            TRACKS => {
                if let Some(album) = self.album.as_mut() {
                    album.tracks = std::mem::take(&mut self.pending_tracks);
                }
            }
            ALBUM => {
                if let Some(album) = self.album.take() {
                    debug!("decoded album '{}' with {} tracks", album.name, album.tracks.len());
                    self.albums.push(album);
                }
            }
            _ => {}
        }
    }

    fn set_album_field(album: &mut Album, name: &str, value: &str) {
        let field = match name {
            ID => &mut album.id,
            NAME => &mut album.name,
            ARTIST => &mut album.artist,
            GENRE => &mut album.genre,
            YEAR => &mut album.year,
            MEDIUM => &mut album.medium,
            DIGITAL => {
                let value = value.to_lowercase();
                album.digital = value == "true" || value == "yes";
                return;
            }
            _ => return,
        };
        *field = value.to_string();
    }

    fn close_track(&mut self) {
        let Some(mut track) = self.track.take() else {
            return;
        };
        if track.track_number.is_empty() {
            warn!(
                "track '{}' has no track number, using {DEFAULT_TRACK_NUMBER}",
                track.title
            );
            track.track_number = DEFAULT_TRACK_NUMBER.to_string();
        }
        if self.album.is_some() {
            self.pending_tracks.push(track);
        } else {
            warn!("track '{}' outside of an album, skipping", track.title);
        }
    }
}

fn element_name(name: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(name)
}

/// Decodes an XML document. Any syntax error fails the whole decode.
pub fn decode(bytes: &[u8]) -> Result<Vec<Album>, CodecError> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| CodecError::xml(e.valid_up_to() as u64, e.to_string()))?;

    let mut reader = Reader::from_str(text);
    reader.config_mut().expand_empty_elements = true;

    let mut acc = Accumulator::default();
    let mut depth = 0usize;
    let mut saw_root = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                depth += 1;
                saw_root = true;
                acc.start(&element_name(e.name().as_ref()));
            }
            Ok(Event::End(e)) => {
                depth = depth.saturating_sub(1);
                acc.end(&element_name(e.name().as_ref()));
            }
            Ok(Event::Text(t)) => {
                let text = t
                    .unescape()
                    .map_err(|err| CodecError::xml(reader.buffer_position() as u64, err.to_string()))?;
                acc.text(&text);
            }
            Ok(Event::CData(c)) => acc.text(&String::from_utf8_lossy(&c)),
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => {
                return Err(CodecError::xml(
                    reader.error_position() as u64,
                    err.to_string(),
                ));
            }
        }
    }

    if !saw_root {
        return Err(CodecError::xml(
            reader.buffer_position() as u64,
            "document has no root element",
        ));
    }
    if depth > 0 {
        return Err(CodecError::xml(
            reader.buffer_position() as u64,
            format!("unexpected end of document, {depth} element(s) left open"),
        ));
    }

    Ok(acc.albums)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Album {
        Album {
            id: "a1".to_string(),
            name: "Test".to_string(),
            artist: "X".to_string(),
            genre: "Rock".to_string(),
            year: "2020".to_string(),
            medium: "Vinyl".to_string(),
            digital: false,
            tracks: vec![Track::new("Song A", "2"), Track::new("Song B", "1")],
        }
    }

    #[test]
    fn tracks_are_sorted_in_document_and_after_decode() -> anyhow::Result<()> {
        let bytes = encode(&[sample()])?;
        let text = String::from_utf8(bytes.clone())?;

        let song_a = text.find("Song A").unwrap();
        let song_b = text.find("Song B").unwrap();
        assert!(song_b < song_a);

        let decoded = decode(&bytes)?;
        assert_eq!(decoded.len(), 1);
        assert_eq!(
            decoded[0].tracks,
            vec![Track::new("Song B", "1"), Track::new("Song A", "2")]
        );

        let mut expected = sample();
        expected.sort_tracks();
        assert_eq!(decoded[0], expected);
        Ok(())
    }

    #[test]
    fn document_shape() -> anyhow::Result<()> {
        let text = String::from_utf8(encode(&[sample()])?)?;

        assert!(text.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(text.contains("<albums>"));
        assert!(text.contains("<digital>false</digital>"));
        assert!(text.contains("<trackNumber>1</trackNumber>"));
        assert!(text.trim_end().ends_with("</albums>"));
        Ok(())
    }

    #[test]
    fn special_characters_round_trip() -> anyhow::Result<()> {
        let mut album = sample();
        album.name = "Rock & Roll <Live> \"at\" Joe's".to_string();
        album.artist = "&amp; literally".to_string();
        album.tracks = vec![Track::new("<intro> & 'outro'", "1")];

        let bytes = encode(&[album.clone()])?;
        let text = String::from_utf8(bytes.clone())?;
        assert!(text.contains("&amp;"));
        assert!(text.contains("&lt;Live&gt;"));
        assert!(!text.contains("<Live>"));

        assert_eq!(decode(&bytes)?, vec![album]);
        Ok(())
    }

    #[test]
    fn empty_fields_round_trip() -> anyhow::Result<()> {
        let album = Album {
            id: "x".to_string(),
            tracks: vec![Track::new("", "3")],
            ..Album::empty()
        };
        assert_eq!(decode(&encode(&[album.clone()])?)?, vec![album]);
        Ok(())
    }

    #[test]
    fn missing_track_number_defaults_to_zero() -> anyhow::Result<()> {
        let xml = br#"<albums><album><id>1</id><tracks>
            <track><title>No Number</title></track>
            <track><title>Empty</title><trackNumber>  </trackNumber></track>
            </tracks></album></albums>"#;

        let albums = decode(xml)?;
        assert_eq!(
            albums[0].tracks,
            vec![Track::new("No Number", "0"), Track::new("Empty", "0")]
        );
        Ok(())
    }

    #[test]
    fn text_is_trimmed_and_digital_parsed() -> anyhow::Result<()> {
        let xml = br#"<?xml version="1.0"?>
<albums>
  <album>
    <id>  7 </id>
    <name>
      Spaced Out
    </name>
    <digital> YES </digital>
    <genre><![CDATA[R&B]]></genre>
    <medium/>
  </album>
  <album><id>8</id><digital>True</digital></album>
  <album><id>9</id><digital>1</digital></album>
</albums>"#;

        let albums = decode(xml)?;
        assert_eq!(albums.len(), 3);
        assert_eq!(albums[0].id, "7");
        assert_eq!(albums[0].name, "Spaced Out");
        assert_eq!(albums[0].genre, "R&B");
        assert_eq!(albums[0].medium, "");
        assert!(albums[0].digital);
        assert!(albums[1].digital);
        assert!(!albums[2].digital);
        Ok(())
    }

    #[test]
    fn tracks_without_tracks_element_are_not_attached() -> anyhow::Result<()> {
        let xml = br#"<albums><album><id>1</id>
            <track><title>Loose</title><trackNumber>1</trackNumber></track>
            </album></albums>"#;
        assert!(decode(xml)?[0].tracks.is_empty());
        Ok(())
    }

    #[test]
    fn unclosed_album_is_a_parse_error() {
        let err = decode(b"<albums><album><id>1</id>").unwrap_err();
        assert!(matches!(err, CodecError::Xml { .. }));
    }

    #[test]
    fn mismatched_tags_are_a_parse_error() {
        let err = decode(b"<albums><album><id>1</name></album></albums>").unwrap_err();
        assert!(matches!(err, CodecError::Xml { .. }));
    }

    #[test]
    fn empty_document_is_a_parse_error() {
        assert!(matches!(decode(b""), Err(CodecError::Xml { .. })));
        assert!(matches!(decode(b"   "), Err(CodecError::Xml { .. })));
    }

    #[test]
    fn invalid_utf8_is_a_parse_error() {
        let err = decode(b"<albums>\xff</albums>").unwrap_err();
        assert!(matches!(err, CodecError::Xml { position: 8, .. }));
    }

    #[test]
    fn empty_collection_round_trips() -> anyhow::Result<()> {
        assert!(decode(&encode(&[])?)?.is_empty());
        Ok(())
    }
}
