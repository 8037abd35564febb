//! Error types for the Jira integration

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The server rejected the search body with a 400.
    #[error("Jql query error, please review your Jql")]
    MalformedQuery,

    /// Any other non-success status, carrying the server's description.
    #[error("Failed to query Jira: {0}")]
    Api(String),

    #[error("Invalid smart commits pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error(transparent)]
    Core(#[from] relnotes_core::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<Error> for relnotes_core::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Core(inner) => inner,
            other => relnotes_core::Error::Tracker(other.to_string()),
        }
    }
}
