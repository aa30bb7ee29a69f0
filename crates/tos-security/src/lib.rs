//! PII redaction for documents before they leave the process

pub mod redactor;

pub use redactor::{PLACEHOLDER, PiiKind, Redaction, Redactor};
