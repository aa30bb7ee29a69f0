//! Document-to-report pipeline
//!
//! extract -> redact -> chunk -> analyze (bounded fan-out) -> merge

use std::time::Instant;

use futures_util::{StreamExt, stream};
use serde::{Deserialize, Serialize};
use tos_analyzer::{ChunkAnalyzer, CompletionError};
use tos_core::{
    AnalysisRecord, Chunk, Chunker, CoreError, DEFAULT_MAX_CHUNK_CHARS, RawDocument, Report,
};
use tos_security::Redactor;
use tos_sources::{SourceError, SourceHandlerRegistry};

/// Sanitized length above which the outcome is flagged as a truncation risk.
pub const SOFT_LIMIT_CHARS: usize = 60_000;

pub const DEFAULT_MAX_CONCURRENCY: usize = 4;

#[derive(Debug, Clone, Copy)]
pub struct PipelineOptions {
    pub max_chunk_chars: usize,
    pub max_concurrency: usize,
    pub soft_limit_chars: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            max_chunk_chars: DEFAULT_MAX_CHUNK_CHARS,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            soft_limit_chars: SOFT_LIMIT_CHARS,
        }
    }
}

/// Result of one document run, serialized as the response body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub analysis: Report,
    /// Exact substrings removed by the redactor, in source order
    pub redacted: Vec<String>,
    /// Sanitized text exceeded the soft limit; the model may have missed content
    pub truncated: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("analysis of chunk {chunk} failed: {source}")]
    Completion {
        chunk: usize,
        #[source]
        source: CompletionError,
    },

    #[error("invalid pipeline options: {0}")]
    Options(String),
}

impl From<CoreError> for PipelineError {
    fn from(e: CoreError) -> Self {
        PipelineError::Options(e.to_string())
    }
}

pub struct Pipeline {
    sources: SourceHandlerRegistry,
    redactor: Redactor,
    chunker: Chunker,
    analyzer: ChunkAnalyzer,
    max_concurrency: usize,
    soft_limit_chars: usize,
}

impl Pipeline {
    pub fn new(
        sources: SourceHandlerRegistry,
        analyzer: ChunkAnalyzer,
        options: PipelineOptions,
    ) -> Result<Self, PipelineError> {
        if options.max_concurrency == 0 {
            return Err(PipelineError::Options(
                "max_concurrency must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            sources,
            redactor: Redactor::new(),
            chunker: Chunker::new(options.max_chunk_chars)?,
            analyzer,
            max_concurrency: options.max_concurrency,
            soft_limit_chars: options.soft_limit_chars,
        })
    }

    /// Run a submitted document through the whole pipeline.
    ///
    /// The first chunk whose analysis fails at the transport level fails the
    /// request; analyses still in flight are dropped and nothing partial is
    /// returned.
    #[tracing::instrument(skip_all, fields(document = %document.id, origin = %document.origin()))]
    pub async fn process(&self, document: &RawDocument) -> Result<Outcome, PipelineError> {
        let started = Instant::now();
        tracing::info!(
            bytes = document.size_bytes(),
            hash = %document.content_hash(),
            "request started"
        );

        let text = self.sources.load(document).await?;
        let outcome = self.analyze_text(&text).await?;

        tracing::info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            "analysis completed"
        );
        Ok(outcome)
    }

    /// Everything after extraction: redact, chunk, analyze, merge.
    pub async fn analyze_text(&self, text: &str) -> Result<Outcome, PipelineError> {
        let (sanitized, redactions) = self.redactor.redact(text);
        for r in &redactions {
            tracing::debug!(kind = %r.kind, offset = r.offset, "pii redacted");
        }
        let redacted: Vec<String> = redactions.into_iter().map(|r| r.original).collect();

        let sanitized_chars = sanitized.chars().count();
        tracing::info!(
            redacted = redacted.len(),
            length = sanitized_chars,
            "content sanitized"
        );

        let truncated = sanitized_chars > self.soft_limit_chars;
        if truncated {
            tracing::warn!(
                length = sanitized_chars,
                limit = self.soft_limit_chars,
                "content may exceed model limits"
            );
        }

        let chunks = self.chunker.split(&sanitized);
        tracing::info!(chunks = chunks.len(), "content chunked");

        if chunks.is_empty() {
            return Ok(Outcome::default());
        }

        let records = self.analyze_chunks(&chunks).await?;

        Ok(Outcome {
            analysis: tos_core::merge(&records),
            redacted,
            truncated,
        })
    }

    /// Analyze chunks with at most `max_concurrency` requests in flight.
    /// Results are tagged with their chunk index and returned in chunk order.
    async fn analyze_chunks(&self, chunks: &[Chunk]) -> Result<Vec<AnalysisRecord>, PipelineError> {
        let total = chunks.len();
        let mut slots: Vec<Option<AnalysisRecord>> = vec![None; total];

        // Each request owns its chunk and analyzer handle so the gathered
        // future stays Send
        let mut pending = stream::iter(chunks.to_vec().into_iter().enumerate())
            .map(|(slot, chunk)| {
                let analyzer = self.analyzer.clone();
                async move {
                    tracing::debug!(chunk = chunk.index + 1, total, "analyzing chunk");
                    (slot, analyzer.analyze(&chunk).await)
                }
            })
            .buffer_unordered(self.max_concurrency);

        while let Some((slot, result)) = pending.next().await {
            match result {
                Ok(record) => {
                    tracing::debug!(chunk = slot + 1, total, "chunk analyzed");
                    slots[slot] = Some(record);
                }
                Err(source) => {
                    tracing::error!(chunk = slot + 1, total, error = %source, "chunk analysis failed");
                    return Err(PipelineError::Completion {
                        chunk: slot,
                        source,
                    });
                }
            }
        }

        Ok(slots.into_iter().map(Option::unwrap_or_default).collect())
    }
}
