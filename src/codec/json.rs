use crate::{codec::CodecError, domain::Album};

/// Pretty-printed form, used for the persisted library file.
pub fn encode(albums: &[Album]) -> Result<Vec<u8>, CodecError> {
    Ok(serde_json::to_vec_pretty(albums)?)
}

pub fn encode_compact(albums: &[Album]) -> Result<Vec<u8>, CodecError> {
    Ok(serde_json::to_vec(albums)?)
}

/// Decodes a JSON array of albums. Empty (or whitespace only) input is an empty collection.
pub fn decode(bytes: &[u8]) -> Result<Vec<Album>, CodecError> {
    if bytes.trim_ascii().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_slice(bytes)?)
}
