#![allow(dead_code)]

use std::sync::{Arc, Mutex, Once};

use async_trait::async_trait;
use idpkit_client::{BoxError, Client, Transport};
use reqwest::header::HeaderMap;
use reqwest::{Method, Request};
use url::Url;

/// What a stub transport saw for one request.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
}

/// Transport that answers every request with a fixed status and body.
pub struct StubTransport {
    status: u16,
    body: String,
    pub requests: Mutex<Vec<RecordedRequest>>,
}

impl StubTransport {
    pub fn new(status: u16, body: impl Into<String>) -> Arc<Self> {
        Arc::new(Self { status, body: body.into(), requests: Mutex::new(Vec::new()) })
    }

    pub fn recorded(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("recorder mutex poisoned").clone()
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn execute(&self, request: Request) -> Result<reqwest::Response, BoxError> {
        self.requests.lock().expect("recorder mutex poisoned").push(RecordedRequest {
            method: request.method().clone(),
            url: request.url().clone(),
            headers: request.headers().clone(),
            body: request.body().and_then(reqwest::Body::as_bytes).map(<[u8]>::to_vec),
        });

        let response = http::Response::builder().status(self.status).body(self.body.clone())?;
        Ok(reqwest::Response::from(response))
    }
}

/// Transport that always fails at the connection level.
pub struct BrokenTransport;

#[async_trait]
impl Transport for BrokenTransport {
    async fn execute(&self, _request: Request) -> Result<reqwest::Response, BoxError> {
        Err("connection reset by peer".into())
    }
}

/// Client for organization `acme` with token `tok123` wired to `transport`.
pub fn stub_client(transport: Arc<dyn Transport>) -> Client {
    Client::builder()
        .api_token("tok123")
        .organization("acme")
        .transport(transport)
        .build()
        .expect("client should build")
}

/// Client pointed at a mock server.
pub fn mock_client(uri: &str) -> Client {
    Client::builder()
        .api_token("tok123")
        .organization("acme")
        .base_url(uri)
        .user_agent("idpkit-tests/1.0")
        .build()
        .expect("client should build")
}

pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}
