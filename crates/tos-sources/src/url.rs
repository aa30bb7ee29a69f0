use async_trait::async_trait;
use reqwest::Url;
use tos_core::{DocumentSource, RawDocument};

use crate::handler::{FetchOptions, SourceHandler};
use crate::markup::{extract_title, html_to_text};
use crate::{Result, SourceError};

/// Fetches a document over HTTP(S)
pub struct UrlHandler {
    client: reqwest::Client,
}

impl UrlHandler {
    pub fn new(options: FetchOptions) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(options.user_agent)
            .timeout(options.timeout)
            .build()
            .map_err(|e| SourceError::Fetch(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Validate URL format: absolute and http(s) only
    pub fn validate(url: &str) -> Result<Url> {
        let parsed =
            Url::parse(url).map_err(|e| SourceError::InvalidUrl(format!("{}: {}", url, e)))?;

        match parsed.scheme() {
            "http" | "https" => Ok(parsed),
            _ => Err(SourceError::InvalidUrl(format!(
                "URL must start with http:// or https://: {}",
                url
            ))),
        }
    }
}

#[async_trait]
impl SourceHandler for UrlHandler {
    async fn load(&self, document: &RawDocument) -> Result<String> {
        let DocumentSource::Url { url } = &document.source else {
            return Err(SourceError::Extraction(
                "unsupported document for UrlHandler".to_string(),
            ));
        };

        let parsed = Self::validate(url)?;

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| SourceError::Fetch(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SourceError::FetchStatus {
                status: response.status().as_u16(),
                url: url.clone(),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string())
            .unwrap_or_default();

        let body = response
            .text()
            .await
            .map_err(|e| SourceError::Fetch(format!("failed to read response: {}", e)))?;

        tracing::debug!(url = %url, content_type = %content_type, bytes = body.len(), "fetched document");

        // If HTML, convert to text
        let text = if content_type.contains("text/html") {
            let text = html_to_text(&body);
            match extract_title(&body) {
                Some(title) => format!("# {}\n\n{}", title, text),
                None => text,
            }
        } else {
            body
        };

        Ok(text)
    }

    fn can_handle(&self, document: &RawDocument) -> bool {
        matches!(document.source, DocumentSource::Url { .. })
    }
}
