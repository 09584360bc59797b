use thiserror::Error;
use vecinos_core::{NetworkFailure, SearchFailure};

#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure: DNS, connect, TLS, timeout, or an unreadable body.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx status, with the server's `msg` when the body carried one.
    #[error("HTTP {status} from {url}: {}", .message.as_deref().unwrap_or("no message"))]
    Status {
        status: u16,
        url: String,
        message: Option<String>,
    },

    /// The bearer credential was missing, expired or rejected.
    #[error("not authenticated (HTTP {status})")]
    Unauthenticated { status: u16 },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("login response did not include a token")]
    MissingToken,

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

impl ApiError {
    /// Server-provided message, if the failure carried one.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

impl From<ApiError> for SearchFailure {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Http(e) => match e.status() {
                Some(status) => SearchFailure::NetworkFailure(NetworkFailure::Status(status.as_u16())),
                None if e.is_decode() => SearchFailure::MalformedResponse(e.to_string()),
                None => SearchFailure::NetworkFailure(NetworkFailure::Transport),
            },
            ApiError::Status { status, .. } => {
                SearchFailure::NetworkFailure(NetworkFailure::Status(status))
            }
            ApiError::Unauthenticated { .. } | ApiError::MissingToken => {
                SearchFailure::Unauthenticated
            }
            ApiError::Deserialize { context, source } => {
                SearchFailure::MalformedResponse(format!("{context}: {source}"))
            }
            ApiError::InvalidBaseUrl { .. } => SearchFailure::NetworkFailure(NetworkFailure::Transport),
        }
    }
}
