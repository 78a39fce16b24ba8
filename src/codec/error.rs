use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    /// malformed JSON, or JSON not shaped like a list of albums
    #[error("decode error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("XML parse error at byte {position}: {message}")]
    Xml { position: u64, message: String },

    #[error("failed to write XML: {0}")]
    XmlWrite(String),

    #[error("input is not valid UTF-8 text: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    /// only raised when strict CSV decoding is enabled
    #[error("CSV line {line}: {reason}")]
    CsvRow { line: usize, reason: String },
}

impl CodecError {
    pub(crate) fn xml(position: u64, message: impl Into<String>) -> Self {
        Self::Xml {
            position,
            message: message.into(),
        }
    }

    pub(crate) fn xml_write(err: impl std::fmt::Display) -> Self {
        Self::XmlWrite(err.to_string())
    }
}
