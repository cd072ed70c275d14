//! User operations

use idpkit_domain::constants::USERS_PATH;
use idpkit_domain::{CreateUserRequest, User};
use reqwest::Method;
use tracing::{info, instrument};

use super::path_segment;
use crate::api::errors::ApiError;
use crate::api::options::{add_options, QueryParams};
use crate::api::response::Response;
use crate::api::Client;
use crate::http::Context;

/// Query parameters for listing users
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListUsersOptions {
    /// Prefix match on first name, last name or email
    pub q: Option<String>,
    /// Filter expression, e.g. `status eq "ACTIVE"`
    pub filter: Option<String>,
    /// Search expression over profile attributes
    pub search: Option<String>,
    /// Page size
    pub limit: Option<u32>,
    /// Cursor returned by a previous page
    pub after: Option<String>,
}

impl QueryParams for ListUsersOptions {
    fn query_pairs(&self) -> Vec<(String, String)> {
        [
            ("q", self.q.clone()),
            ("filter", self.filter.clone()),
            ("search", self.search.clone()),
            ("limit", self.limit.map(|limit| limit.to_string())),
            ("after", self.after.clone()),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.map(|value| (key.to_string(), value)))
        .collect()
    }
}

struct ActivationOptions {
    activate: bool,
}

impl QueryParams for ActivationOptions {
    fn query_pairs(&self) -> Vec<(String, String)> {
        vec![("activate".to_string(), self.activate.to_string())]
    }
}

/// User endpoints, borrowing the shared client
#[derive(Debug, Clone, Copy)]
pub struct UserService<'a> {
    client: &'a Client,
}

impl<'a> UserService<'a> {
    pub(crate) const fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Fetch one user by id
    #[instrument(skip(self, ctx))]
    pub async fn get(&self, ctx: &Context, user_id: &str) -> Result<(Response, User), ApiError> {
        let path = format!("{}/{}", USERS_PATH, path_segment("user", user_id)?);
        let (response, user): (Response, Option<User>) = self.client.get(ctx, &path).await?;
        let Some(user) = user else {
            return Err(ApiError::EmptyBody(Box::new(response)));
        };
        Ok((response, user))
    }

    /// List one page of users. An empty body is an empty page.
    #[instrument(skip(self, ctx))]
    pub async fn list(
        &self,
        ctx: &Context,
        options: Option<&ListUsersOptions>,
    ) -> Result<(Response, Vec<User>), ApiError> {
        let path = add_options(USERS_PATH, options)?;
        let (response, users): (Response, Option<Vec<User>>) = self.client.get(ctx, &path).await?;
        Ok((response, users.unwrap_or_default()))
    }

    /// Create a user, optionally activating it right away
    #[instrument(skip(self, ctx, user))]
    pub async fn create(
        &self,
        ctx: &Context,
        user: &CreateUserRequest,
        activate: bool,
    ) -> Result<(Response, User), ApiError> {
        let path = add_options(USERS_PATH, Some(&ActivationOptions { activate }))?;
        let (response, created): (Response, Option<User>) = self.client.post(ctx, &path, user).await?;
        let Some(created) = created else {
            return Err(ApiError::EmptyBody(Box::new(response)));
        };
        info!(user_id = %created.id, "user created");
        Ok((response, created))
    }

    /// Deactivate a user. Required before deletion.
    #[instrument(skip(self, ctx))]
    pub async fn deactivate(&self, ctx: &Context, user_id: &str) -> Result<Response, ApiError> {
        let path =
            format!("{}/{}/lifecycle/deactivate", USERS_PATH, path_segment("user", user_id)?);
        let request = self.client.new_request(Method::POST, &path)?;
        self.client.execute(ctx, request).await
    }

    /// Delete a user. The API only deletes deactivated users; deleting an
    /// active user deactivates it instead.
    #[instrument(skip(self, ctx))]
    pub async fn delete(&self, ctx: &Context, user_id: &str) -> Result<Response, ApiError> {
        let path = format!("{}/{}", USERS_PATH, path_segment("user", user_id)?);
        self.client.delete(ctx, &path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_options_only_encode_present_fields() {
        let options = ListUsersOptions { q: Some("ada".into()), limit: Some(10), ..Default::default() };
        assert_eq!(add_options(USERS_PATH, Some(&options)).unwrap(), "api/v1/users?limit=10&q=ada");
        assert_eq!(add_options(USERS_PATH, Some(&ListUsersOptions::default())).unwrap(), USERS_PATH);
    }

    #[test]
    fn test_filter_expression_is_escaped() {
        let options =
            ListUsersOptions { filter: Some(r#"status eq "ACTIVE""#.into()), ..Default::default() };
        assert_eq!(
            add_options(USERS_PATH, Some(&options)).unwrap(),
            "api/v1/users?filter=status+eq+%22ACTIVE%22"
        );
    }
}
