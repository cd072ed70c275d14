//! HTTP plumbing: execution context and transport dispatch

pub mod context;
pub mod transport;

pub use context::{Context, ContextError};
pub use transport::{dispatch, BoxError, Transport};
