//! Organization origin and path resolution

use idpkit_domain::config::{is_organization_label, render_base_url};
use url::Url;

use super::errors::ApiError;

/// Build the organization-scoped origin, e.g. `https://acme.example-idp.com/`.
///
/// # Errors
/// Returns `ApiError::Url` if the organization is not a single DNS label or
/// produces an invalid host.
pub fn build_base_url(organization: &str) -> Result<Url, ApiError> {
    if !is_organization_label(organization) {
        return Err(ApiError::url(organization, url::ParseError::InvalidDomainCharacter));
    }
    parse_base_url(&render_base_url(organization))
}

/// Parse an explicit origin, e.g. a base URL override
pub fn parse_base_url(raw: &str) -> Result<Url, ApiError> {
    Url::parse(raw).map_err(|source| ApiError::url(raw, source))
}

/// Resolve `path` against `base` using RFC 3986 reference resolution.
///
/// Relative paths inherit scheme and host; absolute URLs replace the base.
/// A base path without a trailing slash loses its last segment, as the RFC
/// prescribes.
pub fn resolve(base: &Url, path: &str) -> Result<Url, ApiError> {
    base.join(path).map_err(|source| ApiError::url(path, source))
}
