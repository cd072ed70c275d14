//! Resource collaborators
//!
//! Thin call sites over [`Client`](crate::Client): each service borrows the
//! client and only supplies a method, a path, an optional body and the type to
//! decode into.

pub mod groups;
pub mod users;

pub use groups::{GroupService, ListGroupsOptions};
pub use users::{ListUsersOptions, UserService};

use crate::api::errors::ApiError;

/// Percent-encode a resource id for use as a single path segment.
pub(crate) fn path_segment(kind: &str, id: &str) -> Result<String, ApiError> {
    if id.trim().is_empty() {
        return Err(ApiError::InvalidInput(format!("{kind} id must not be empty")));
    }
    Ok(urlencoding::encode(id).into_owned())
}
