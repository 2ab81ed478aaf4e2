use thiserror::Error;

/// Errors raised while talking to the order backend.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("could not decode the {endpoint} response: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{message} (status {status})")]
    Status { status: u16, message: String },

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("not logged in")]
    NotLoggedIn,

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Session is gone and the user must log in again.
    pub fn requires_login(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_) | ApiError::NotLoggedIn)
    }
}
