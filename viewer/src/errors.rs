use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {status} from {path}: {body}")]
    Status {
        status: reqwest::StatusCode,
        path: String,
        body: String,
    },

    #[error("query rejected: {0}")]
    QueryRejected(String),
}

pub type Result<T> = std::result::Result<T, Error>;
