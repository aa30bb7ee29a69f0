//! Input resolution: turns a submitted document into plain text

pub mod error;
pub mod file;
pub mod handler;
pub mod input;
mod markup;
pub mod text;
pub mod url;

pub use error::{Result, SourceError};
pub use file::{FileHandler, extract_text};
pub use handler::{FetchOptions, SourceHandler, SourceHandlerRegistry};
pub use input::{InputForm, Upload};
pub use text::TextHandler;
pub use url::UrlHandler;
