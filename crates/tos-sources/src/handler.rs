//! Source handler trait

use std::time::Duration;

use async_trait::async_trait;
use tos_core::RawDocument;

use crate::{FileHandler, Result, SourceError, TextHandler, UrlHandler};

/// Options for outbound document fetches
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: concat!("tos-digest/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Trait for handling different document origins
#[async_trait]
pub trait SourceHandler: Send + Sync {
    /// Produce the plain text of the document
    async fn load(&self, document: &RawDocument) -> Result<String>;

    /// Check if this handler can handle the given document
    fn can_handle(&self, document: &RawDocument) -> bool;
}

/// Dispatches a document to the first handler that accepts it
pub struct SourceHandlerRegistry {
    handlers: Vec<Box<dyn SourceHandler>>,
}

impl SourceHandlerRegistry {
    pub fn new(options: FetchOptions) -> Result<Self> {
        Ok(Self::with_handlers(vec![
            Box::new(TextHandler),
            Box::new(UrlHandler::new(options)?),
            Box::new(FileHandler),
        ]))
    }

    pub fn with_handlers(handlers: Vec<Box<dyn SourceHandler>>) -> Self {
        Self { handlers }
    }

    pub async fn load(&self, document: &RawDocument) -> Result<String> {
        let handler = self
            .handlers
            .iter()
            .find(|h| h.can_handle(document))
            .ok_or_else(|| {
                SourceError::Extraction(format!(
                    "no handler registered for {} documents",
                    document.origin()
                ))
            })?;

        handler.load(document).await
    }
}
