//! Identity API client
//!
//! Builds authenticated JSON requests against an organization origin,
//! dispatches them under a [`Context`] and interprets the response envelope.
//! The client holds configuration only; it is cheap to clone and safe to share
//! across tasks.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use idpkit_domain::constants::{DRAIN_LIMIT, JSON_MEDIA_TYPE};
use idpkit_domain::ClientConfig;
use reqwest::header::{HeaderValue, ACCEPT, CONTENT_TYPE, USER_AGENT};
use reqwest::{Body, Method, Request};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, instrument};
use url::Url;

use super::auth::{Authenticator, StaticTokenAuthenticator};
use super::errors::ApiError;
use super::response::{check_response, decode_body, Response};
use super::origin::{build_base_url, parse_base_url, resolve};
use crate::http::transport::{drain, read_body};
use crate::http::{dispatch, Context, Transport};
use crate::services::{GroupService, UserService};

/// Client for one organization of the identity API
#[derive(Clone)]
pub struct Client {
    transport: Arc<dyn Transport>,
    authenticator: Arc<dyn Authenticator>,
    base_url: Url,
    organization: String,
    user_agent: Option<HeaderValue>,
}

impl Client {
    /// Create a client for `organization` authenticated with `api_token`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Url` if the organization does not yield a valid
    /// origin, or `ApiError::Config` if the HTTP transport cannot be built.
    pub fn new(api_token: impl Into<String>, organization: impl Into<String>) -> Result<Self, ApiError> {
        Self::builder().api_token(api_token).organization(organization).build()
    }

    /// Start configuring a client
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Build a client from loaded configuration
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        ClientBuilder::from_config(config).build()
    }

    /// Origin that relative paths resolve against
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Organization name, empty when only a base URL override was given
    pub fn organization(&self) -> &str {
        &self.organization
    }

    /// `User-Agent` sent with every request, if configured
    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_ref().and_then(|value| value.to_str().ok())
    }

    /// Swap the underlying transport, e.g. for a stub in tests.
    pub fn set_transport(&mut self, transport: Arc<dyn Transport>) {
        self.transport = transport;
    }

    /// User endpoints
    pub fn users(&self) -> UserService<'_> {
        UserService::new(self)
    }

    /// Group endpoints
    pub fn groups(&self) -> GroupService<'_> {
        GroupService::new(self)
    }

    /// Resolve a resource path against the organization origin.
    pub fn resolve(&self, path: &str) -> Result<Url, ApiError> {
        resolve(&self.base_url, path)
    }

    /// Build a request without a body.
    ///
    /// No network access happens here.
    pub fn new_request(&self, method: Method, path: &str) -> Result<Request, ApiError> {
        self.build_request(method, path, None)
    }

    /// Build a request carrying `body` encoded as JSON.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Encoding` if `body` cannot be serialized, or
    /// `ApiError::Url` if `path` cannot be resolved.
    pub fn new_request_with_body<B>(&self, method: Method, path: &str, body: &B) -> Result<Request, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let payload = serde_json::to_vec(body)
            .map_err(|e| ApiError::Encoding(format!("Failed to serialize body: {}", e)))?;
        self.build_request(method, path, Some(payload))
    }

    fn build_request(&self, method: Method, path: &str, payload: Option<Vec<u8>>) -> Result<Request, ApiError> {
        let url = self.resolve(path)?;
        let mut request = Request::new(method, url);

        if let Some(payload) = payload {
            request.headers_mut().insert(CONTENT_TYPE, HeaderValue::from_static(JSON_MEDIA_TYPE));
            *request.body_mut() = Some(Body::from(payload));
        }
        request.headers_mut().insert(ACCEPT, HeaderValue::from_static(JSON_MEDIA_TYPE));
        if let Some(agent) = &self.user_agent {
            request.headers_mut().insert(USER_AGENT, agent.clone());
        }

        Ok(request)
    }

    /// Inject credentials into `request`.
    pub async fn authorize(&self, ctx: &Context, request: &mut Request) -> Result<(), ApiError> {
        self.authenticator.authorize(request, ctx).await
    }

    /// Send `request` and decode a JSON body into `T`.
    ///
    /// An empty body yields `None`. A non-2xx status yields `ApiError::Api`;
    /// body read and decode failures yield `ApiError::Body` and
    /// `ApiError::Decode`. All three still carry the [`Response`].
    #[instrument(skip_all, fields(method = %request.method(), url = %request.url()))]
    pub async fn fetch_decoded<T>(&self, ctx: &Context, request: Request) -> Result<(Response, Option<T>), ApiError>
    where
        T: DeserializeOwned,
    {
        let (response, raw) = self.round_trip(ctx, request).await?;
        let body = match read_body(ctx, raw).await {
            Ok(body) => body,
            Err(source) => return Err(ApiError::Body { response: Box::new(response), source }),
        };
        match decode_body(&body) {
            Ok(value) => Ok((response, value)),
            Err(source) => Err(ApiError::Decode { response: Box::new(response), source }),
        }
    }

    /// Send `request` and return the body bytes verbatim.
    #[instrument(skip_all, fields(method = %request.method(), url = %request.url()))]
    pub async fn fetch_raw(&self, ctx: &Context, request: Request) -> Result<(Response, Bytes), ApiError> {
        let (response, raw) = self.round_trip(ctx, request).await?;
        match read_body(ctx, raw).await {
            Ok(body) => Ok((response, body)),
            Err(source) => Err(ApiError::Body { response: Box::new(response), source }),
        }
    }

    /// Send `request` and discard the body.
    #[instrument(skip_all, fields(method = %request.method(), url = %request.url()))]
    pub async fn execute(&self, ctx: &Context, request: Request) -> Result<Response, ApiError> {
        let (response, raw) = self.round_trip(ctx, request).await?;
        let drained = drain(raw, DRAIN_LIMIT).await;
        debug!(status = %response.status(), drained, "discarded response body");
        Ok(response)
    }

    /// GET `path` and decode the JSON response.
    pub async fn get<T: DeserializeOwned>(&self, ctx: &Context, path: &str) -> Result<(Response, Option<T>), ApiError> {
        let request = self.new_request(Method::GET, path)?;
        self.fetch_decoded(ctx, request).await
    }

    /// POST `body` as JSON to `path` and decode the JSON response.
    pub async fn post<B, T>(&self, ctx: &Context, path: &str, body: &B) -> Result<(Response, Option<T>), ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.new_request_with_body(Method::POST, path, body)?;
        self.fetch_decoded(ctx, request).await
    }

    /// PUT `body` as JSON to `path` and decode the JSON response.
    pub async fn put<B, T>(&self, ctx: &Context, path: &str, body: &B) -> Result<(Response, Option<T>), ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.new_request_with_body(Method::PUT, path, body)?;
        self.fetch_decoded(ctx, request).await
    }

    /// DELETE `path`, discarding any body.
    pub async fn delete(&self, ctx: &Context, path: &str) -> Result<Response, ApiError> {
        let request = self.new_request(Method::DELETE, path)?;
        self.execute(ctx, request).await
    }

    /// Authorize, dispatch and classify. Every exchange that reaches the
    /// server produces exactly one [`Response`].
    async fn round_trip(
        &self,
        ctx: &Context,
        mut request: Request,
    ) -> Result<(Response, reqwest::Response), ApiError> {
        self.authorize(ctx, &mut request).await?;

        let method = request.method().clone();
        let url = request.url().clone();
        let raw = dispatch(self.transport.as_ref(), ctx, request).await?;
        let response = Response::from_raw(method, url, &raw);

        check_response(ctx, response, raw).await
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url.as_str())
            .field("organization", &self.organization)
            .field("user_agent", &self.user_agent())
            .finish_non_exhaustive()
    }
}

/// Builder for [`Client`]
#[derive(Default)]
pub struct ClientBuilder {
    config: ClientConfig,
    transport: Option<Arc<dyn Transport>>,
    authenticator: Option<Arc<dyn Authenticator>>,
}

impl ClientBuilder {
    /// Seed the builder with loaded configuration
    pub fn from_config(config: &ClientConfig) -> Self {
        Self { config: config.clone(), ..Default::default() }
    }

    /// API token sent with the `SSWS` scheme
    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.config.api_token = Some(token.into());
        self
    }

    /// Organization whose origin the client talks to
    pub fn organization(mut self, organization: impl Into<String>) -> Self {
        self.config.organization = organization.into();
        self
    }

    /// `User-Agent` header value
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = Some(agent.into());
        self
    }

    /// Replace the organization origin, e.g. with a mock server URI.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = Some(url.into());
        self
    }

    /// Use a custom transport instead of a default `reqwest::Client`.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Use a custom authenticator instead of the static token.
    pub fn authenticator(mut self, authenticator: Arc<dyn Authenticator>) -> Self {
        self.authenticator = Some(authenticator);
        self
    }

    /// Build the client
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is incomplete, the origin is not a
    /// valid URL, the user agent is not a valid header, or the default
    /// transport cannot be created
    pub fn build(self) -> Result<Client, ApiError> {
        let Self { config, transport, authenticator } = self;
        config.validate()?;

        let base_url = match &config.base_url {
            Some(url) => parse_base_url(url)?,
            None => build_base_url(&config.organization)?,
        };

        let user_agent = config
            .user_agent
            .filter(|agent| !agent.is_empty())
            .map(|agent| {
                HeaderValue::try_from(agent)
                    .map_err(|e| ApiError::Config(format!("Invalid user agent: {}", e)))
            })
            .transpose()?;

        let transport: Arc<dyn Transport> = match transport {
            Some(transport) => transport,
            None => Arc::new(
                reqwest::Client::builder()
                    .build()
                    .map_err(|e| ApiError::Config(format!("Failed to build HTTP transport: {}", e)))?,
            ),
        };

        let authenticator: Arc<dyn Authenticator> = match authenticator {
            Some(authenticator) => authenticator,
            None => Arc::new(StaticTokenAuthenticator::from(config.api_token)),
        };

        debug!(base_url = %base_url, organization = %config.organization, "client configured");

        Ok(Client {
            transport,
            authenticator,
            base_url,
            organization: config.organization,
            user_agent,
        })
    }
}

#[cfg(test)]
mod tests {
    use reqwest::header::AUTHORIZATION;
    use serde::ser::Error as _;

    use super::*;

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: serde::Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(S::Error::custom("refusing to serialize"))
        }
    }

    #[test]
    fn test_new_builds_organization_origin() {
        let client = Client::new("tok123", "acme").unwrap();
        assert_eq!(client.base_url().as_str(), "https://acme.example-idp.com/");
        assert_eq!(client.organization(), "acme");
        assert_eq!(client.user_agent(), None);
    }

    #[test]
    fn test_new_rejects_invalid_organization() {
        assert!(matches!(Client::new("tok", "bad org"), Err(ApiError::Url { .. })));
    }

    #[test]
    fn test_organization_with_host_characters_is_rejected() {
        assert!(matches!(Client::new("tok", "evil.example#"), Err(ApiError::Url { .. })));
    }

    #[test]
    fn test_builder_requires_organization_or_base_url() {
        assert!(matches!(Client::builder().api_token("tok").build(), Err(ApiError::Config(_))));
    }

    #[test]
    fn test_request_without_body() {
        let client = Client::new("tok123", "acme").unwrap();
        let request = client.new_request(Method::GET, "users/42").unwrap();

        assert_eq!(request.method(), &Method::GET);
        assert_eq!(request.url().as_str(), "https://acme.example-idp.com/users/42");
        assert_eq!(request.headers().get(ACCEPT).unwrap(), JSON_MEDIA_TYPE);
        assert!(request.headers().get(CONTENT_TYPE).is_none());
        assert!(request.headers().get(USER_AGENT).is_none());
        assert!(request.body().is_none());
        // credentials are added at dispatch time
        assert!(request.headers().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_request_with_body() {
        let client = Client::builder()
            .api_token("tok123")
            .organization("acme")
            .user_agent("idpkit-tests/1.0")
            .build()
            .unwrap();
        let body = serde_json::json!({ "profile": { "login": "ada@example.com" } });
        let request = client.new_request_with_body(Method::POST, "api/v1/users", &body).unwrap();

        assert_eq!(request.headers().get(CONTENT_TYPE).unwrap(), JSON_MEDIA_TYPE);
        assert_eq!(request.headers().get(ACCEPT).unwrap(), JSON_MEDIA_TYPE);
        assert_eq!(request.headers().get(USER_AGENT).unwrap(), "idpkit-tests/1.0");

        let bytes = request.body().and_then(Body::as_bytes).unwrap();
        let sent: serde_json::Value = serde_json::from_slice(bytes).unwrap();
        assert_eq!(sent, body);
    }

    #[test]
    fn test_unserializable_body_is_encoding_error() {
        let client = Client::new("tok123", "acme").unwrap();
        let err = client.new_request_with_body(Method::POST, "x", &Unserializable).unwrap_err();
        assert!(matches!(err, ApiError::Encoding(_)));
    }

    #[test]
    fn test_invalid_user_agent_is_config_error() {
        let result = Client::builder().organization("acme").user_agent("bad\nagent").build();
        assert!(matches!(result, Err(ApiError::Config(_))));
    }

    #[tokio::test]
    async fn test_authorize_applies_static_token() {
        let client = Client::new("tok123", "acme").unwrap();
        let mut request = client.new_request(Method::GET, "users/42").unwrap();
        client.authorize(&Context::background(), &mut request).await.unwrap();
        assert_eq!(request.headers().get(AUTHORIZATION).unwrap(), "SSWS tok123");
    }

    #[test]
    fn test_debug_omits_credentials() {
        let client = Client::new("tok123", "acme").unwrap();
        assert!(!format!("{client:?}").contains("tok123"));
    }

    #[test]
    fn test_client_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Client>();
    }
}
