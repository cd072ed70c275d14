//! # idpkit Client
//!
//! Client library for a remote identity-management HTTP API.
//!
//! This crate contains:
//! - The request/response pipeline (URL resolution, query encoding, JSON
//!   bodies, `SSWS` token authentication, context-bound dispatch, response
//!   classification)
//! - User and group resource operations built on that pipeline
//! - Configuration loading from environment or file
//!
//! ## Architecture
//! - Depends on `idpkit-domain` for configuration, constants and models
//! - Async on tokio; suspension happens only in transport dispatch
//! - No caching, retries or pagination; callers own those policies
//!
//! ```no_run
//! # async fn run() -> Result<(), idpkit_client::ApiError> {
//! use std::time::Duration;
//! use idpkit_client::{Client, Context};
//!
//! let client = Client::new("tok123", "acme")?;
//! let ctx = Context::background().with_timeout(Duration::from_secs(10));
//! let (_response, user) = client.users().get(&ctx, "00u1").await?;
//! println!("{}", user.id);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod http;
pub mod services;

pub use api::{
    add_options, ApiError, ApiErrorCategory, Authenticator, Client, ClientBuilder, ErrorResponse,
    QueryParams, Response, StaticTokenAuthenticator,
};
pub use http::{BoxError, Context, ContextError, Transport};
pub use idpkit_domain as domain;
pub use services::{GroupService, ListGroupsOptions, ListUsersOptions, UserService};
