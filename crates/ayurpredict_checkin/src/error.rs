//! Error types for the check-in flow.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CheckInError {
    #[error("API error: {0}")]
    Api(#[from] ayurpredict_client::PredictError),

    #[error("no user is logged in")]
    NotLoggedIn,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse class of a failed operation, for callers that react differently
/// to a dead connection, an unreadable reply or a signed-out user.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureKind {
    /// The request never completed (connect error, timeout).
    Transport,
    /// The service answered with something that is not the expected body.
    Decode,
    /// The service answered with an error status or rejected the request.
    Service,
    NotLoggedIn,
    Other,
}

impl CheckInError {
    pub fn kind(&self) -> FailureKind {
        use ayurpredict_client::PredictError;
        match self {
            CheckInError::Api(PredictError::Http(_)) => FailureKind::Transport,
            CheckInError::Api(PredictError::Decode(_)) => FailureKind::Decode,
            CheckInError::Api(
                PredictError::NotFound(_)
                | PredictError::Auth(_)
                | PredictError::InvalidInput(_)
                | PredictError::Rejected(_)
                | PredictError::Status { .. },
            ) => FailureKind::Service,
            CheckInError::NotLoggedIn => FailureKind::NotLoggedIn,
            _ => FailureKind::Other,
        }
    }
}

/// Result type alias for check-in operations.
pub type CheckInResult<T> = Result<T, CheckInError>;
