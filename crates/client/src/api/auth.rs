//! Request authentication
//!
//! Credentials are injected just before dispatch through an [`Authenticator`].
//! The trait is async and receives the call's [`Context`] so implementations
//! that refresh tokens over the network can honour cancellation.

use std::fmt;

use async_trait::async_trait;
use idpkit_domain::constants::API_TOKEN_SCHEME;
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::Request;
use tracing::warn;

use super::errors::ApiError;
use crate::http::Context;

/// Trait for injecting credentials into outbound requests
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Add credentials to `request`.
    async fn authorize(&self, request: &mut Request, ctx: &Context) -> Result<(), ApiError>;
}

/// Static API token sent as `Authorization: SSWS <token>`.
///
/// Without a token the request is sent unauthenticated and a warning is
/// traced.
#[derive(Clone, Default)]
pub struct StaticTokenAuthenticator {
    token: Option<String>,
}

impl StaticTokenAuthenticator {
    /// An empty token is treated as no token.
    pub fn new(token: impl Into<String>) -> Self {
        let token = token.into();
        Self { token: (!token.is_empty()).then_some(token) }
    }

    /// Authenticator that sends requests without credentials
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// True if a token is configured
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    fn header_value(token: &str) -> Result<HeaderValue, ApiError> {
        let mut value = HeaderValue::try_from(format!("{API_TOKEN_SCHEME} {token}")).map_err(|_| {
            ApiError::Encoding("API token contains characters not allowed in a header".to_string())
        })?;
        value.set_sensitive(true);
        Ok(value)
    }
}

impl From<Option<String>> for StaticTokenAuthenticator {
    fn from(token: Option<String>) -> Self {
        token.map_or_else(Self::anonymous, Self::new)
    }
}

impl fmt::Debug for StaticTokenAuthenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticTokenAuthenticator")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[async_trait]
impl Authenticator for StaticTokenAuthenticator {
    async fn authorize(&self, request: &mut Request, _ctx: &Context) -> Result<(), ApiError> {
        let Some(token) = self.token.as_deref() else {
            warn!(url = %request.url(), "no API token configured, sending unauthenticated request");
            return Ok(());
        };

        request.headers_mut().insert(AUTHORIZATION, Self::header_value(token)?);
        Ok(())
    }
}
