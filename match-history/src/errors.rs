use http::StatusCode;
use thiserror::Error;
use tokio::task::JoinError;

/// Failure of a single upstream call.
///
/// Cloneable so that one failed fetch can be handed to every caller waiting on
/// the same cache entry. Failures are never inserted into a cache.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UpstreamError {
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("{url} returned {status}")]
    Status { url: String, status: StatusCode },

    #[error("could not decode response from {url}: {message}")]
    Decode { url: String, message: String },

    #[error("invalid upstream URL: {0}")]
    InvalidUrl(String),

    #[error("API key is not a valid header value")]
    InvalidCredential,

    #[error("could not build HTTP client: {0}")]
    Client(String),

    #[error("upstream task failed: {0}")]
    Task(String),
}

impl From<JoinError> for UpstreamError {
    fn from(err: JoinError) -> Self {
        UpstreamError::Task(err.to_string())
    }
}

/// Classified failure of a whole history aggregation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HistoryError {
    #[error("could not fetch upstream data: {0}")]
    UpstreamTransport(String),

    #[error("upstream returned {status} for {url}")]
    UpstreamStatus { status: StatusCode, url: String },

    #[error("internal error: {0}")]
    Internal(String),
}

impl HistoryError {
    /// Status code reported to the caller. Upstream statuses pass through.
    pub fn status(&self) -> StatusCode {
        match self {
            HistoryError::UpstreamTransport(_) => StatusCode::BAD_GATEWAY,
            HistoryError::UpstreamStatus { status, .. } => *status,
            HistoryError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<UpstreamError> for HistoryError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::Transport { .. } => HistoryError::UpstreamTransport(err.to_string()),
            UpstreamError::Status { url, status } => HistoryError::UpstreamStatus { status, url },
            UpstreamError::Decode { .. }
            | UpstreamError::InvalidUrl(_)
            | UpstreamError::InvalidCredential
            | UpstreamError::Client(_)
            | UpstreamError::Task(_) => HistoryError::Internal(err.to_string()),
        }
    }
}

impl From<JoinError> for HistoryError {
    fn from(err: JoinError) -> Self {
        HistoryError::Internal(err.to_string())
    }
}
