//! Per-chunk analysis against a chat-completion endpoint
//!
//! This crate contains:
//! - The completion capability seam (`CompletionClient`) and its HTTP implementation
//! - The fixed instruction prompt
//! - `ChunkAnalyzer`, which prompts for one chunk and parses the reply with a typed fallback

pub mod analyzer;
pub mod completion;
pub mod http;
pub mod prompt;

pub use analyzer::{ChunkAnalyzer, parse_record};
pub use completion::{CompletionClient, CompletionError};
pub use http::{CompletionSettings, HttpCompletionClient};
pub use prompt::SYSTEM_PROMPT;
