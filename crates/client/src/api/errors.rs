//! API-specific error types
//!
//! Every failure of the request pipeline is reported as an [`ApiError`]. Non-2xx
//! responses carry an [`ErrorResponse`] that still holds the [`Response`] so
//! callers can inspect status and headers.

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use idpkit_domain::DomainError;
use reqwest::StatusCode;
use thiserror::Error;

use super::response::Response;
use crate::http::{BoxError, ContextError};

/// Categories of API errors, for callers that implement their own retry or
/// reporting policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCategory {
    /// Authentication errors (401, 403)
    Authentication,
    /// Rate limiting errors (429)
    RateLimit,
    /// Server errors (5xx)
    Server,
    /// Client errors (other non-2xx statuses)
    Client,
    /// Network/connection errors, including failed body reads
    Network,
    /// The call's context was cancelled or its deadline passed
    Cancelled,
    /// The response could not be interpreted
    Protocol,
    /// Malformed URLs, unserializable bodies, bad configuration
    Config,
}

/// Structured error built from a non-2xx response.
///
/// The body is kept as opaque text; no error schema is assumed. If the body
/// could not be read, `message` is empty and `read_error` holds the cause.
#[derive(Debug, Clone)]
pub struct ErrorResponse {
    /// Response that caused this error
    pub response: Response,
    /// Numeric status code
    pub code: u16,
    /// Canonical status label, e.g. `Not Found`
    pub kind: String,
    /// Raw body text
    pub message: String,
    /// Failure while reading the body, if any
    pub read_error: Option<Arc<dyn StdError + Send + Sync>>,
}

impl ErrorResponse {
    /// Build from the response metadata and the body bytes.
    pub fn new(response: Response, body: &[u8]) -> Self {
        let status = response.status();
        Self {
            code: status.as_u16(),
            kind: status.canonical_reason().unwrap_or_default().to_string(),
            message: String::from_utf8_lossy(body).into_owned(),
            read_error: None,
            response,
        }
    }

    /// Build for a response whose body could not be read.
    pub fn unreadable(response: Response, read_error: BoxError) -> Self {
        Self { read_error: Some(Arc::from(read_error)), ..Self::new(response, &[]) }
    }

    /// Status code of the response
    pub fn status(&self) -> StatusCode {
        self.response.status()
    }

    /// Classify by status
    pub fn category(&self) -> ApiErrorCategory {
        let status = self.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            ApiErrorCategory::Authentication
        } else if status == StatusCode::TOO_MANY_REQUESTS {
            ApiErrorCategory::RateLimit
        } else if status.is_server_error() {
            ApiErrorCategory::Server
        } else {
            ApiErrorCategory::Client
        }
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}: API responded with code {}, type {} and message {}",
            self.response.method(),
            self.response.url(),
            self.code,
            self.kind,
            self.message
        )?;
        if let Some(err) = &self.read_error {
            write!(f, " (body unreadable: {})", err)?;
        }
        Ok(())
    }
}

impl StdError for ErrorResponse {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.read_error.as_deref().map(|err| err as &(dyn StdError + 'static))
    }
}

/// API operation errors
#[derive(Debug, Error)]
pub enum ApiError {
    /// A path or origin could not be parsed as a URL
    #[error("Invalid URL {input:?}: {source}")]
    Url {
        /// Text that failed to parse
        input: String,
        /// Parser error
        #[source]
        source: url::ParseError,
    },

    /// A request body or header could not be encoded
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// An argument was rejected before any request was built
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The client configuration is incomplete or invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// The transport failed before a response arrived
    #[error("Transport error: {0}")]
    Transport(#[source] BoxError),

    /// The context terminated before a response arrived
    #[error(transparent)]
    Cancelled(#[from] ContextError),

    /// The server answered with a non-2xx status
    #[error(transparent)]
    Api(Box<ErrorResponse>),

    /// A 2xx body could not be read
    #[error("Failed to read response body: {source}")]
    Body {
        /// Response whose body failed
        response: Box<Response>,
        /// Read failure or context termination
        #[source]
        source: BoxError,
    },

    /// A 2xx body was not valid JSON for the target type
    #[error("Failed to decode response body: {source}")]
    Decode {
        /// Response whose body failed
        response: Box<Response>,
        /// JSON error
        #[source]
        source: serde_json::Error,
    },

    /// A 2xx body was required but empty
    #[error("Expected a response body but none was returned (status {})", .0.status())]
    EmptyBody(Box<Response>),
}

impl ApiError {
    pub(crate) fn url(input: &str, source: url::ParseError) -> Self {
        Self::Url { input: input.to_string(), source }
    }

    /// Get the error category for this error
    pub fn category(&self) -> ApiErrorCategory {
        match self {
            Self::Api(error) => error.category(),
            Self::Body { source, .. } if is_context_error(source.as_ref()) => ApiErrorCategory::Cancelled,
            Self::Transport(_) | Self::Body { .. } => ApiErrorCategory::Network,
            Self::Cancelled(_) => ApiErrorCategory::Cancelled,
            Self::Decode { .. } | Self::EmptyBody(_) => ApiErrorCategory::Protocol,
            Self::Url { .. } | Self::Encoding(_) | Self::InvalidInput(_) | Self::Config(_) => {
                ApiErrorCategory::Config
            }
        }
    }

    /// Response that accompanied the error, present whenever the server
    /// answered.
    pub fn response(&self) -> Option<&Response> {
        match self {
            Self::Api(error) => Some(&error.response),
            Self::Body { response, .. } | Self::Decode { response, .. } | Self::EmptyBody(response) => {
                Some(response)
            }
            _ => None,
        }
    }

    /// Status of the accompanying response
    pub fn status(&self) -> Option<StatusCode> {
        self.response().map(Response::status)
    }

    /// Structured error for a non-2xx response
    pub fn error_response(&self) -> Option<&ErrorResponse> {
        match self {
            Self::Api(error) => Some(error),
            _ => None,
        }
    }

    /// True if the call's context terminated, including during a body read.
    pub fn is_cancelled(&self) -> bool {
        match self {
            Self::Cancelled(_) => true,
            Self::Body { source, .. } => is_context_error(source.as_ref()),
            Self::Api(error) => error.read_error.as_deref().is_some_and(|err| is_context_error(err)),
            _ => false,
        }
    }
}

fn is_context_error(err: &(dyn StdError + Send + Sync + 'static)) -> bool {
    err.downcast_ref::<ContextError>().is_some()
}

impl From<ErrorResponse> for ApiError {
    fn from(error: ErrorResponse) -> Self {
        Self::Api(Box::new(error))
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Config(message) => Self::Config(message),
            DomainError::InvalidInput(message) => Self::InvalidInput(message),
        }
    }
}
