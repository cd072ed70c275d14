//! Wire-level constants shared by the client and its configuration.
//!
//! These values are a contract with the remote identity API and are not meant
//! to be tuned.

/// Organization-scoped origin template. `{organization}` is replaced verbatim.
pub const BASE_URL_TEMPLATE: &str = "https://{organization}.example-idp.com/";
/// Placeholder replaced in [`BASE_URL_TEMPLATE`]
pub const ORGANIZATION_PLACEHOLDER: &str = "{organization}";

/// Authorization scheme for static API tokens.
pub const API_TOKEN_SCHEME: &str = "SSWS";

/// Media type for request and response bodies
pub const JSON_MEDIA_TYPE: &str = "application/json";

/// Upper bound on bytes read from a discarded body before the connection is
/// released back to the pool.
pub const DRAIN_LIMIT: usize = 512;

// Resource paths, relative to the organization origin
/// Users collection
pub const USERS_PATH: &str = "api/v1/users";
/// Groups collection
pub const GROUPS_PATH: &str = "api/v1/groups";

// Environment variables recognised by the config loader
/// Organization name
pub const ENV_ORGANIZATION: &str = "IDPKIT_ORGANIZATION";
/// API token
pub const ENV_API_TOKEN: &str = "IDPKIT_API_TOKEN";
/// User agent
pub const ENV_USER_AGENT: &str = "IDPKIT_USER_AGENT";
/// Base URL override
pub const ENV_BASE_URL: &str = "IDPKIT_BASE_URL";
