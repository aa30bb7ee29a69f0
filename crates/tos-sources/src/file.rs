use std::io::{Cursor, Read};
use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use tos_core::{DocumentSource, RawDocument};

use crate::handler::SourceHandler;
use crate::markup::decode_entities;
use crate::{Result, SourceError};

/// Runs, tabs, breaks and paragraph ends in WordprocessingML
static DOCX_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<w:t(?:\s[^>]*)?>(.*?)</w:t>|<w:tab\s*/>|<w:br\s*/>|</w:p>")
        .expect("valid regex")
});

const DOCX_BODY: &str = "word/document.xml";

/// Uploaded documents: PDF, DOCX, or anything else read as UTF-8 text
pub struct FileHandler;

#[async_trait]
impl SourceHandler for FileHandler {
    async fn load(&self, document: &RawDocument) -> Result<String> {
        let DocumentSource::File { filename, bytes } = &document.source else {
            return Err(SourceError::Extraction(
                "unsupported document for FileHandler".to_string(),
            ));
        };

        // PDF parsing is CPU bound and may panic on hostile input
        let filename = filename.clone();
        let bytes = bytes.clone();
        tokio::task::spawn_blocking(move || extract_text(&bytes, &filename))
            .await
            .map_err(|e| SourceError::Extraction(format!("extraction task failed: {}", e)))?
    }

    fn can_handle(&self, document: &RawDocument) -> bool {
        matches!(document.source, DocumentSource::File { .. })
    }
}

/// Extract plain text from an uploaded file, keyed on its declared name.
pub fn extract_text(bytes: &[u8], filename: &str) -> Result<String> {
    let name = filename.to_lowercase();

    if name.ends_with(".pdf") {
        pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| SourceError::Extraction(format!("failed to parse PDF: {}", e)))
    } else if name.ends_with(".docx") {
        extract_docx(bytes)
    } else if name.ends_with(".doc") {
        Err(SourceError::UnsupportedFileType(
            "legacy .doc files are not supported, save as .docx".to_string(),
        ))
    } else {
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }
}

fn extract_docx(bytes: &[u8]) -> Result<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| SourceError::Extraction(format!("failed to open DOCX: {}", e)))?;

    let mut xml = String::new();
    archive
        .by_name(DOCX_BODY)
        .map_err(|e| SourceError::Extraction(format!("DOCX has no {}: {}", DOCX_BODY, e)))?
        .read_to_string(&mut xml)
        .map_err(|e| SourceError::Extraction(format!("failed to read DOCX body: {}", e)))?;

    Ok(docx_xml_to_text(&xml))
}

fn docx_xml_to_text(xml: &str) -> String {
    let mut text = String::new();

    for caps in DOCX_TOKEN.captures_iter(xml) {
        if let Some(run) = caps.get(1) {
            text.push_str(&decode_entities(run.as_str()));
            continue;
        }
        let token = &caps[0];
        if token.starts_with("<w:tab") {
            text.push('\t');
        } else {
            text.push('\n');
        }
    }

    text.trim_end().to_string()
}
