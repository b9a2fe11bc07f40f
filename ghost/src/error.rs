//! Error types for the Ghost API client.

use thiserror::Error;

/// HTTP status codes with documented Ghost behavior.
pub mod status_code {
    /// Expired or invalid admin token. Always re-mint, never reuse.
    pub const UNAUTHORIZED: u16 = 401;
    /// Unknown id or slug.
    pub const NOT_FOUND: u16 = 404;
    /// Validation failure, most often a missing or stale `updated_at`.
    pub const VALIDATION: u16 = 422;
    /// Rate limited. Callers back off and retry.
    pub const RATE_LIMIT: u16 = 429;
    pub const SERVER_ERROR_MIN: u16 = 500;
}

/// Result type alias for Ghost operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for Ghost API operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Non-2xx response from Ghost or Unsplash.
    #[error("ghost: HTTP {status}: {message}")]
    Api {
        status: u16,
        message: String,
        body: String,
    },

    /// Transport error (connection, timeout, TLS).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Admin token could not be signed or decoded.
    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing or invalid credentials or base URL.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Path does not start with `content/` or `admin/`.
    #[error("path must start with content/ or admin/: {0}")]
    InvalidPath(String),

    /// Id or slug that would change the request target if placed in a path.
    #[error("invalid path segment: {0:?}")]
    InvalidSegment(String),

    /// Upload of a file type Ghost does not accept as an image.
    #[error("unsupported media type: {0}")]
    UnsupportedMedia(String),

    /// Response body did not carry the expected envelope.
    #[error("unexpected response envelope: {0}")]
    Envelope(String),

    /// Other error.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Creates a new API error.
    pub fn api(status: u16, message: impl Into<String>, body: impl Into<String>) -> Self {
        Error::Api {
            status,
            message: message.into(),
            body: body.into(),
        }
    }

    /// Returns the HTTP status for API errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns true if the admin token was rejected.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(status_code::UNAUTHORIZED)
    }

    /// Returns true if the resource does not exist.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(status_code::NOT_FOUND)
    }

    /// Returns true if Ghost rejected the payload, e.g. a stale `updated_at`.
    pub fn is_validation(&self) -> bool {
        self.status() == Some(status_code::VALIDATION)
    }

    /// Returns true if this is a rate limit error.
    pub fn is_rate_limit(&self) -> bool {
        self.status() == Some(status_code::RATE_LIMIT)
    }

    /// Returns true if this is a server-side error.
    pub fn is_server_error(&self) -> bool {
        matches!(self.status(), Some(s) if s >= status_code::SERVER_ERROR_MIN)
    }

    /// Returns true if the request never produced an HTTP response.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Http(e) if e.status().is_none())
    }
}
