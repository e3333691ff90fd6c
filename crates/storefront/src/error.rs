//! Unified API error type.
//!
//! Every failure is classified once, at the API boundary, into one of the
//! variants below. Callers branch on the variant (or on [`ApiError::tag`]);
//! nothing outside this crate inspects raw status codes or bodies.

use std::collections::BTreeMap;

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

use crate::session::SessionError;

/// Errors surfaced by the storefront and admin clients.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The resource does not exist (HTTP 404).
    #[error("Not found: {0}")]
    NotFound(String),

    /// No valid session (HTTP 401). The stored session has been cleared,
    /// unless a newer login replaced it while the request was in flight.
    #[error("Authentication required")]
    AuthRequired,

    /// Authenticated but not allowed (HTTP 403).
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The backend rejected the input (HTTP 422). Field messages are joined.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Any other non-success status.
    #[error("Server error ({status}): {message}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Message from the body, or the canonical reason.
        message: String,
    },

    /// Transport failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Decode(#[from] serde_json::Error),

    /// The body was JSON but matched no known response shape.
    #[error("Unexpected response shape: {0}")]
    Envelope(String),

    /// Reading or writing the persisted session failed.
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Rejected client-side before any request was sent.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Stable string tags, one per error class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    AuthRequired,
    Forbidden,
    Validation,
    Server,
    Client,
}

impl ErrorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not-found",
            Self::AuthRequired => "auth-required",
            Self::Forbidden => "forbidden",
            Self::Validation => "validation-error",
            Self::Server => "server-error",
            Self::Client => "client-error",
        }
    }
}

/// Error body shape returned by the backend.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    errors: Option<BTreeMap<String, FieldMessages>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FieldMessages {
    Many(Vec<String>),
    One(String),
}

impl ErrorBody {
    fn message(&self) -> Option<String> {
        self.message
            .clone()
            .or_else(|| self.error.clone())
            .filter(|m| !m.trim().is_empty())
    }

    /// Field messages joined in field-name order.
    fn field_messages(&self) -> Option<String> {
        let errors = self.errors.as_ref()?;
        let joined = errors
            .values()
            .flat_map(|messages| match messages {
                FieldMessages::Many(list) => list.clone(),
                FieldMessages::One(one) => vec![one.clone()],
            })
            .collect::<Vec<_>>()
            .join("; ");
        (!joined.is_empty()).then_some(joined)
    }
}

impl ApiError {
    /// Classify a non-success response.
    #[must_use]
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
        let reason = || {
            status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string()
        };

        match status {
            StatusCode::NOT_FOUND => Self::NotFound(parsed.message().unwrap_or_else(reason)),
            StatusCode::UNAUTHORIZED => Self::AuthRequired,
            StatusCode::FORBIDDEN => Self::Forbidden(parsed.message().unwrap_or_else(reason)),
            StatusCode::UNPROCESSABLE_ENTITY => Self::Validation(
                parsed
                    .field_messages()
                    .or_else(|| parsed.message())
                    .unwrap_or_else(reason),
            ),
            StatusCode::BAD_REQUEST if parsed.errors.is_some() => {
                Self::Validation(parsed.field_messages().unwrap_or_else(reason))
            }
            _ => Self::Server {
                status: status.as_u16(),
                message: parsed.message().unwrap_or_else(reason),
            },
        }
    }

    /// The error class as a tag.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::AuthRequired => ErrorKind::AuthRequired,
            Self::Forbidden(_) => ErrorKind::Forbidden,
            Self::Validation(_) | Self::InvalidInput(_) => ErrorKind::Validation,
            Self::Server { .. } => ErrorKind::Server,
            Self::Http(_) | Self::Decode(_) | Self::Envelope(_) | Self::Session(_) => {
                ErrorKind::Client
            }
        }
    }

    /// Shorthand for `self.kind().as_str()`.
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        self.kind().as_str()
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Result type alias for `ApiError`.
pub type Result<T> = std::result::Result<T, ApiError>;
