//! Error types shared across the workspace

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Git error: {0}")]
    Git(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Issue tracker error: {0}")]
    Tracker(String),
}

pub type Result<T> = std::result::Result<T, Error>;
