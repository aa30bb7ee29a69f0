use std::fmt;

/// A document submitted for analysis. Lives for one request only.
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub id: String,
    pub source: DocumentSource,
}

impl RawDocument {
    pub fn new(source: DocumentSource) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            source,
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self::new(DocumentSource::Text {
            content: content.into(),
        })
    }

    pub fn url(url: impl Into<String>) -> Self {
        Self::new(DocumentSource::Url { url: url.into() })
    }

    pub fn file(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self::new(DocumentSource::File {
            filename: filename.into(),
            bytes,
        })
    }

    pub fn origin(&self) -> Origin {
        match &self.source {
            DocumentSource::Text { .. } => Origin::Text,
            DocumentSource::Url { .. } => Origin::Url,
            DocumentSource::File { .. } => Origin::File,
        }
    }

    /// Payload size in bytes as submitted (URL documents report the URL length).
    pub fn size_bytes(&self) -> usize {
        match &self.source {
            DocumentSource::Text { content } => content.len(),
            DocumentSource::Url { url } => url.len(),
            DocumentSource::File { bytes, .. } => bytes.len(),
        }
    }

    /// blake3 hash of the submitted payload, safe to log in place of the content.
    pub fn content_hash(&self) -> String {
        let bytes = match &self.source {
            DocumentSource::Text { content } => content.as_bytes(),
            DocumentSource::Url { url } => url.as_bytes(),
            DocumentSource::File { bytes, .. } => bytes.as_slice(),
        };
        blake3::hash(bytes).to_hex().to_string()
    }
}

#[derive(Debug, Clone)]
pub enum DocumentSource {
    Text { content: String },
    Url { url: String },
    File { filename: String, bytes: Vec<u8> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Text,
    Url,
    File,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Origin::Text => "text",
            Origin::Url => "url",
            Origin::File => "file",
        };
        f.write_str(tag)
    }
}
