use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid chunk size: {0} (must be greater than zero)")]
    InvalidChunkSize(usize),
}

pub type Result<T> = std::result::Result<T, CoreError>;
