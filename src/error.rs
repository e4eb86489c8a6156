use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Serialize)]
pub struct AppError {
    pub message: String,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError { message: msg }
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError {
            message: msg.to_string(),
        }
    }
}

/// Why a prediction request produced no usable result.
///
/// Both variants surface to the user as the same generic failure notice.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// The request could not be sent, or the service answered with a non-2xx status.
    #[error("prediction request failed: {0}")]
    Transport(String),
    /// The response body did not have the expected `top_n` shape.
    #[error("unexpected prediction response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for SubmitError {
    fn from(err: reqwest::Error) -> Self {
        SubmitError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for SubmitError {
    fn from(err: serde_json::Error) -> Self {
        SubmitError::Parse(err.to_string())
    }
}
