//! Transport dispatch
//!
//! The only place where the pipeline suspends. A request is raced against its
//! [`Context`]; when both fail, the context's termination reason is reported
//! because it is the root cause.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Request;
use tracing::{debug, instrument};

use super::context::Context;
use crate::api::errors::ApiError;

/// Boxed error produced by a [`Transport`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Underlying HTTP transport.
///
/// Implemented for [`reqwest::Client`]; tests substitute stubs. Connection
/// pooling and its thread-safety belong to the implementation.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `request` and return the response with its body unread.
    async fn execute(&self, request: Request) -> Result<reqwest::Response, BoxError>;
}

#[async_trait]
impl Transport for reqwest::Client {
    async fn execute(&self, request: Request) -> Result<reqwest::Response, BoxError> {
        reqwest::Client::execute(self, request).await.map_err(Into::into)
    }
}

/// Send `request` through `transport`, bound to `ctx`.
///
/// If `ctx` terminates first the in-flight call is dropped. A transport
/// failure observed after `ctx` terminated is reported as the context error.
#[instrument(skip_all, fields(method = %request.method(), url = %request.url()))]
pub async fn dispatch(
    transport: &dyn Transport,
    ctx: &Context,
    request: Request,
) -> Result<reqwest::Response, ApiError> {
    let outcome = tokio::select! {
        biased;
        () = ctx.done() => {
            let cause = ctx.termination();
            debug!(error = %cause, "context terminated before response");
            return Err(cause.into());
        }
        result = transport.execute(request) => result,
    };

    match outcome {
        Ok(response) => {
            debug!(status = %response.status(), "received HTTP response");
            Ok(response)
        }
        Err(err) => {
            if let Some(cause) = ctx.err() {
                debug!(error = %err, cause = %cause, "HTTP request failed after context terminated");
                return Err(cause.into());
            }
            debug!(error = %err, "HTTP request failed");
            Err(ApiError::Transport(err))
        }
    }
}

/// Read the full body, abandoning the read if `ctx` terminates.
///
/// A terminated context is reported as a boxed [`ContextError`] so callers can
/// attach the response metadata to either failure.
///
/// [`ContextError`]: super::context::ContextError
pub(crate) async fn read_body(ctx: &Context, response: reqwest::Response) -> Result<Bytes, BoxError> {
    tokio::select! {
        biased;
        () = ctx.done() => Err(Box::new(ctx.termination()) as BoxError),
        body = response.bytes() => body.map_err(Into::into),
    }
}

/// Read and discard at most `limit` bytes, then release the response.
///
/// Small leftovers are consumed so the connection can return to the pool;
/// larger bodies are abandoned. Read errors are ignored.
pub(crate) async fn drain(mut response: reqwest::Response, limit: usize) -> usize {
    let mut drained = 0;
    while drained < limit {
        match response.chunk().await {
            Ok(Some(chunk)) => drained += chunk.len(),
            Ok(None) | Err(_) => break,
        }
    }
    drained
}
