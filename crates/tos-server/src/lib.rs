//! HTTP surface for the analysis pipeline
//!
//! `POST /api/summary` takes a multipart form with exactly one of `text`,
//! `url` or `file` and answers `{ analysis, redacted, truncated }`.

mod server;

pub use server::{AnalysisServer, router};
