use async_trait::async_trait;
use tos_core::{DocumentSource, RawDocument};

use crate::handler::SourceHandler;
use crate::{Result, SourceError};

/// Pasted text, used as-is
pub struct TextHandler;

#[async_trait]
impl SourceHandler for TextHandler {
    async fn load(&self, document: &RawDocument) -> Result<String> {
        match &document.source {
            DocumentSource::Text { content } => Ok(content.clone()),
            _ => Err(SourceError::Extraction(
                "unsupported document for TextHandler".to_string(),
            )),
        }
    }

    fn can_handle(&self, document: &RawDocument) -> bool {
        matches!(document.source, DocumentSource::Text { .. })
    }
}
