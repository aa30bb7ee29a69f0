//! Sentence-aware chunking of sanitized text
//!
//! Sizes are measured in characters, not bytes, so a cut never lands inside
//! a multi-byte character.

use crate::{CoreError, Result};

pub const DEFAULT_MAX_CHUNK_CHARS: usize = 12_000;

/// A contiguous, trimmed slice of sanitized text sent to the model in one call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub index: usize,
    pub text: String,
}

#[derive(Debug, Clone, Copy)]
pub struct Chunker {
    max_chars: usize,
}

impl Chunker {
    pub fn new(max_chars: usize) -> Result<Self> {
        if max_chars == 0 {
            return Err(CoreError::InvalidChunkSize(max_chars));
        }
        Ok(Self { max_chars })
    }

    /// Split `text` into chunks of at most `max_chars` characters.
    ///
    /// When the remainder is longer than the budget, the cut goes right after
    /// the last period inside the budget window (a period in the window's first
    /// position does not count). With no such period the cut is a hard one at
    /// exactly `max_chars`. Chunks that are empty after trimming are dropped.
    pub fn split(&self, text: &str) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        let mut rest = text;

        while !rest.is_empty() {
            let cut = match rest.char_indices().nth(self.max_chars) {
                None => rest.len(),
                Some((limit, _)) => match rest[..limit].rfind('.') {
                    Some(period) if period > 0 => period + 1,
                    _ => limit,
                },
            };

            let (piece, tail) = rest.split_at(cut);
            let piece = piece.trim();
            if !piece.is_empty() {
                chunks.push(Chunk {
                    index: chunks.len(),
                    text: piece.to_string(),
                });
            }
            rest = tail;
        }

        chunks
    }
}

impl Default for Chunker {
    fn default() -> Self {
        Self {
            max_chars: DEFAULT_MAX_CHUNK_CHARS,
        }
    }
}
