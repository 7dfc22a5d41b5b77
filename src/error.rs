// Errors raised by the YouTrack service layer. The command layer turns
// every variant into a user-facing message; none of them reach `main`.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    /// The issue does not exist, or exists without a `State` field.
    #[error("issue {0} not found")]
    NotFound(String),

    #[error("YouTrack answered {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response payload: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ServiceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ServiceError::NotFound(_))
    }
}
