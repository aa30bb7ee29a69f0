use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("No valid input provided.")]
    NoInput,

    #[error("Provide exactly one of text, url or file.")]
    AmbiguousInput,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("Failed to fetch URL: {0}")]
    Fetch(String),

    #[error("HTTP error {status}: {url}")]
    FetchStatus { status: u16, url: String },

    #[error("Failed to extract text: {0}")]
    Extraction(String),
}

impl SourceError {
    /// Errors caused by what the caller submitted, as opposed to a failure
    /// while fetching or reading it.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            SourceError::NoInput
                | SourceError::AmbiguousInput
                | SourceError::InvalidUrl(_)
                | SourceError::UnsupportedFileType(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, SourceError>;
