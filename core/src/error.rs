//! Error types for the JSON transport.
//!
//! # Design
//! Four HTTP statuses get dedicated variants because callers react to them
//! differently: 401 means "ask for credentials", 403 means "these
//! credentials are not enough", 405 and 501 mean the server does not accept
//! this request at all. Every other failure is propagated unchanged, either
//! as the raw status (`Status`) or as the underlying transport error.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, TransportError>;

/// Errors returned by `Transport` operations.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The server returned 401 for `url`.
    #[error("unauthorized: {url}")]
    Unauthorized { url: String },

    /// The server returned 403; the credentials do not grant access to `url`.
    #[error("forbidden: {url}")]
    Forbidden { url: String },

    /// The server returned 405; the request is not allowed on `url`.
    #[error("not allowed: {url}")]
    NotAllowed { url: String },

    /// The server returned 501; the request is not recognized.
    #[error("unknown request: {url}")]
    UnknownRequest { url: String },

    /// Any other failing HTTP status.
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    /// Connect, TLS, timeout or protocol failure below the HTTP status level.
    #[error("transport failure: {0}")]
    Http(#[from] ureq::Error),

    /// Reading the response body failed.
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),

    /// The response body is not valid UTF-8.
    #[error("response body is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// The payload could not be encoded or decoded.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// The transport could not be constructed from its configuration.
    #[error("invalid transport configuration: {0}")]
    Config(String),
}

impl TransportError {
    /// Map an HTTP status observed for `url` to its error.
    ///
    /// 401, 403, 405 and 501 become their dedicated variants; anything else
    /// becomes `Status`.
    pub fn from_status(url: &str, status: u16) -> Self {
        let url = url.to_string();
        match status {
            401 => TransportError::Unauthorized { url },
            403 => TransportError::Forbidden { url },
            405 => TransportError::NotAllowed { url },
            501 => TransportError::UnknownRequest { url },
            status => TransportError::Status { url, status },
        }
    }

    /// Convert a ureq error for `url`, classifying it when ureq reports a
    /// structured status code.
    pub fn from_ureq(url: &str, err: ureq::Error) -> Self {
        match err {
            ureq::Error::StatusCode(status) => Self::from_status(url, status),
            other => TransportError::Http(other),
        }
    }

    /// The HTTP status behind this error, if one was observed.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Unauthorized { .. } => Some(401),
            TransportError::Forbidden { .. } => Some(403),
            TransportError::NotAllowed { .. } => Some(405),
            TransportError::UnknownRequest { .. } => Some(501),
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True for the four statuses with dedicated variants.
    pub fn is_classified(&self) -> bool {
        matches!(
            self,
            TransportError::Unauthorized { .. }
                | TransportError::Forbidden { .. }
                | TransportError::NotAllowed { .. }
                | TransportError::UnknownRequest { .. }
        )
    }

    /// The URL a classified or status error refers to.
    pub fn url(&self) -> Option<&str> {
        match self {
            TransportError::Unauthorized { url }
            | TransportError::Forbidden { url }
            | TransportError::NotAllowed { url }
            | TransportError::UnknownRequest { url }
            | TransportError::Status { url, .. } => Some(url),
            _ => None,
        }
    }
}

/// Errors raised by the payload codec.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The text is not valid JSON for the requested shape, or a date field
    /// does not match `yyyy-MM-ddTHH:mm:ssZ`.
    #[error("syntax error: {0}")]
    Syntax(#[source] serde_json::Error),

    /// The value could not be serialized.
    #[error("serialization failed: {0}")]
    Encode(#[source] serde_json::Error),
}
