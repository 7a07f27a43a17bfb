use thiserror::Error;

#[derive(Error, Debug)]
pub enum DevscoutError {
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid sort mode '{0}', expected 'relevant' or 'recent'")]
    InvalidSortMode(String),
}

pub type Result<T> = std::result::Result<T, DevscoutError>;
