//! Core domain models and logic for tos-digest
//!
//! This crate contains:
//! - Domain models (RawDocument, Chunk, AnalysisRecord, Report)
//! - Chunker (sentence-aware splitting of sanitized text)
//! - Merger (order-stable, duplicate-free combination of per-chunk records)

pub mod chunk;
pub mod document;
pub mod error;
pub mod merge;
pub mod record;

pub use chunk::{Chunk, Chunker, DEFAULT_MAX_CHUNK_CHARS};
pub use document::{DocumentSource, Origin, RawDocument};
pub use error::{CoreError, Result};
pub use merge::merge;
pub use record::{AnalysisRecord, Report};
