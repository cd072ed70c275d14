//! Identity API request/response pipeline
//!
//! # Architecture
//!
//! - `origin`: organization origin and RFC 3986 path resolution
//! - `options`: typed query parameters, canonical encoding
//! - `client`: request building and the fetch entry points
//! - `auth`: credential injection (`SSWS` static token)
//! - `response`: status classification and body decoding
//! - `errors`: error taxonomy shared by every stage
//!
//! No stage retries; every error goes back to the immediate caller.

pub mod auth;
pub mod client;
pub mod errors;
pub mod options;
pub mod response;
pub mod origin;

pub use auth::{Authenticator, StaticTokenAuthenticator};
pub use client::{Client, ClientBuilder};
pub use errors::{ApiError, ApiErrorCategory, ErrorResponse};
pub use options::{add_options, encode_query, QueryParams};
pub use response::Response;
