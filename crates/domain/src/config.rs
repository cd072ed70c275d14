//! Client configuration

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{BASE_URL_TEMPLATE, ORGANIZATION_PLACEHOLDER};
use crate::errors::{DomainError, Result};

/// Settings needed to build a client for one organization.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Organization identifier substituted into the origin template.
    pub organization: String,
    /// Static API token sent with the `SSWS` scheme.
    #[serde(default, skip_serializing)]
    pub api_token: Option<String>,
    /// Optional `User-Agent` header value
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Replaces the organization origin entirely (staging hosts, mock servers).
    #[serde(default)]
    pub base_url: Option<String>,
}

impl ClientConfig {
    /// Config for `organization` with a static token
    pub fn new(organization: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            organization: organization.into(),
            api_token: Some(api_token.into()),
            user_agent: None,
            base_url: None,
        }
    }

    /// Origin string for this organization, before URL parsing.
    ///
    /// An explicit `base_url` wins over the template.
    pub fn origin(&self) -> String {
        match &self.base_url {
            Some(url) => url.clone(),
            None => render_base_url(&self.organization),
        }
    }

    /// Reject configurations that can never produce a usable client.
    ///
    /// # Errors
    /// Returns `DomainError::Config` when neither an organization nor a base
    /// URL override is present.
    pub fn validate(&self) -> Result<()> {
        if self.organization.trim().is_empty() && self.base_url.is_none() {
            return Err(DomainError::Config(
                "organization must be set when no base_url override is given".to_string(),
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("organization", &self.organization)
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .field("user_agent", &self.user_agent)
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Substitute the organization into [`BASE_URL_TEMPLATE`].
///
/// The organization is inserted verbatim; check it with
/// [`is_organization_label`] first.
pub fn render_base_url(organization: &str) -> String {
    BASE_URL_TEMPLATE.replace(ORGANIZATION_PLACEHOLDER, organization)
}

/// True if `organization` is a single DNS label, so the rendered origin
/// cannot point at another host.
pub fn is_organization_label(organization: &str) -> bool {
    !organization.is_empty()
        && organization.len() <= 63
        && !organization.starts_with('-')
        && !organization.ends_with('-')
        && organization.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
}
