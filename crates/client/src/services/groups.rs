//! Group operations

use idpkit_domain::constants::GROUPS_PATH;
use idpkit_domain::{CreateGroupRequest, Group, User};
use reqwest::Method;
use tracing::{info, instrument};

use super::path_segment;
use crate::api::errors::ApiError;
use crate::api::options::{add_options, QueryParams};
use crate::api::response::Response;
use crate::api::Client;
use crate::http::Context;

/// Query parameters for listing groups
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListGroupsOptions {
    /// Prefix match on the group name
    pub q: Option<String>,
    /// Filter expression, e.g. `status eq "ACTIVE"`
    pub filter: Option<String>,
    /// Page size
    pub limit: Option<u32>,
    /// Cursor returned by a previous page
    pub after: Option<String>,
}

impl QueryParams for ListGroupsOptions {
    fn query_pairs(&self) -> Vec<(String, String)> {
        [
            ("q", self.q.clone()),
            ("filter", self.filter.clone()),
            ("limit", self.limit.map(|limit| limit.to_string())),
            ("after", self.after.clone()),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.map(|value| (key.to_string(), value)))
        .collect()
    }
}

/// Group endpoints, borrowing the shared client
#[derive(Debug, Clone, Copy)]
pub struct GroupService<'a> {
    client: &'a Client,
}

impl<'a> GroupService<'a> {
    pub(crate) const fn new(client: &'a Client) -> Self {
        Self { client }
    }

    fn group_path(group_id: &str) -> Result<String, ApiError> {
        Ok(format!("{}/{}", GROUPS_PATH, path_segment("group", group_id)?))
    }

    fn membership_path(group_id: &str, user_id: &str) -> Result<String, ApiError> {
        Ok(format!("{}/users/{}", Self::group_path(group_id)?, path_segment("user", user_id)?))
    }

    /// Fetch one group by id
    #[instrument(skip(self, ctx))]
    pub async fn get(&self, ctx: &Context, group_id: &str) -> Result<(Response, Group), ApiError> {
        let (response, group): (Response, Option<Group>) =
            self.client.get(ctx, &Self::group_path(group_id)?).await?;
        let Some(group) = group else {
            return Err(ApiError::EmptyBody(Box::new(response)));
        };
        Ok((response, group))
    }

    /// List groups, one page at a time
    #[instrument(skip(self, ctx))]
    pub async fn list(
        &self,
        ctx: &Context,
        options: Option<&ListGroupsOptions>,
    ) -> Result<(Response, Vec<Group>), ApiError> {
        let path = add_options(GROUPS_PATH, options)?;
        let (response, groups): (Response, Option<Vec<Group>>) = self.client.get(ctx, &path).await?;
        Ok((response, groups.unwrap_or_default()))
    }

    /// Create a group
    #[instrument(skip(self, ctx, group))]
    pub async fn create(
        &self,
        ctx: &Context,
        group: &CreateGroupRequest,
    ) -> Result<(Response, Group), ApiError> {
        let (response, created): (Response, Option<Group>) = self.client.post(ctx, GROUPS_PATH, group).await?;
        let Some(created) = created else {
            return Err(ApiError::EmptyBody(Box::new(response)));
        };
        info!(group_id = %created.id, "group created");
        Ok((response, created))
    }

    /// Delete a group
    #[instrument(skip(self, ctx))]
    pub async fn delete(&self, ctx: &Context, group_id: &str) -> Result<Response, ApiError> {
        self.client.delete(ctx, &Self::group_path(group_id)?).await
    }

    /// List members of a group
    #[instrument(skip(self, ctx))]
    pub async fn list_users(
        &self,
        ctx: &Context,
        group_id: &str,
    ) -> Result<(Response, Vec<User>), ApiError> {
        let path = format!("{}/users", Self::group_path(group_id)?);
        let (response, users): (Response, Option<Vec<User>>) = self.client.get(ctx, &path).await?;
        Ok((response, users.unwrap_or_default()))
    }

    /// Add a user to a group
    #[instrument(skip(self, ctx))]
    pub async fn add_user(
        &self,
        ctx: &Context,
        group_id: &str,
        user_id: &str,
    ) -> Result<Response, ApiError> {
        let request =
            self.client.new_request(Method::PUT, &Self::membership_path(group_id, user_id)?)?;
        self.client.execute(ctx, request).await
    }

    /// Remove a user from a group
    #[instrument(skip(self, ctx))]
    pub async fn remove_user(
        &self,
        ctx: &Context,
        group_id: &str,
        user_id: &str,
    ) -> Result<Response, ApiError> {
        self.client.delete(ctx, &Self::membership_path(group_id, user_id)?).await
    }
}
