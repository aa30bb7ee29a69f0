//! Validation of the three mutually exclusive input forms

use tos_core::RawDocument;

use crate::url::UrlHandler;
use crate::{Result, SourceError};

/// An uploaded file as received from the caller
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Raw request input; exactly one field must carry content
#[derive(Debug, Clone, Default)]
pub struct InputForm {
    pub text: Option<String>,
    pub url: Option<String>,
    pub file: Option<Upload>,
}

impl InputForm {
    /// Turn the form into a document, rejecting empty or ambiguous input.
    ///
    /// Text and URL are trimmed first; blank values and empty uploads count
    /// as absent.
    pub fn into_document(self) -> Result<RawDocument> {
        let text = self
            .text
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        let url = self
            .url
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty());
        let file = self.file.filter(|f| !f.bytes.is_empty());

        let provided = [text.is_some(), url.is_some(), file.is_some()]
            .into_iter()
            .filter(|p| *p)
            .count();

        match (provided, text, url, file) {
            (0, ..) => Err(SourceError::NoInput),
            (1, Some(text), _, _) => Ok(RawDocument::text(text)),
            (1, _, Some(url), _) => {
                UrlHandler::validate(&url)?;
                Ok(RawDocument::url(url))
            }
            (1, _, _, Some(file)) => Ok(RawDocument::file(file.filename, file.bytes)),
            _ => Err(SourceError::AmbiguousInput),
        }
    }
}
