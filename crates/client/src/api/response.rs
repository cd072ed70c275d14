//! Response interpretation
//!
//! Classification is purely by status class: 2xx succeeds, anything else is
//! an [`ErrorResponse`] holding the raw body text.

use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use super::errors::{ApiError, ErrorResponse};
use crate::http::transport::read_body;
use crate::http::Context;

/// Status and headers of a completed exchange.
///
/// The body has already been consumed by the client; this value is returned
/// with every outcome that reached the server, errors included.
#[derive(Debug, Clone)]
pub struct Response {
    method: Method,
    url: Url,
    status: StatusCode,
    headers: HeaderMap,
}

impl Response {
    /// Assemble response metadata.
    pub fn new(method: Method, url: Url, status: StatusCode, headers: HeaderMap) -> Self {
        Self { method, url, status, headers }
    }

    pub(crate) fn from_raw(method: Method, url: Url, raw: &reqwest::Response) -> Self {
        Self::new(method, url, raw.status(), raw.headers().clone())
    }

    /// Method of the request that produced this response
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// URL of the request that produced this response
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Status code returned by the server
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Response headers
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Header value as text, if present and valid ASCII.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    /// True for 2xx statuses
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Split a raw response into success or [`ErrorResponse`].
///
/// On success the raw response is handed back so the caller can consume the
/// body. On failure the body is read in full and stored verbatim; a failed
/// read still yields an [`ErrorResponse`], with the cause in `read_error`.
pub(crate) async fn check_response(
    ctx: &Context,
    response: Response,
    raw: reqwest::Response,
) -> Result<(Response, reqwest::Response), ApiError> {
    if response.is_success() {
        return Ok((response, raw));
    }

    let error = match read_body(ctx, raw).await {
        Ok(body) => ErrorResponse::new(response, &body),
        Err(err) => {
            debug!(status = %response.status(), error = %err, "failed to read error body");
            ErrorResponse::unreadable(response, err)
        }
    };
    Err(error.into())
}

/// Decode the first JSON value of a body. Empty or whitespace-only bodies
/// decode to `None`; anything after the first value is ignored.
pub(crate) fn decode_body<T: DeserializeOwned>(body: &[u8]) -> Result<Option<T>, serde_json::Error> {
    serde_json::Deserializer::from_slice(body).into_iter::<T>().next().transpose()
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Created {
        id: String,
    }

    fn raw(status: u16, body: &'static str) -> reqwest::Response {
        reqwest::Response::from(http::Response::builder().status(status).body(body).unwrap())
    }

    fn response_for(raw: &reqwest::Response) -> Response {
        Response::from_raw(
            Method::POST,
            Url::parse("https://acme.example-idp.com/api/v1/users").unwrap(),
            raw,
        )
    }

    #[tokio::test]
    async fn test_every_2xx_status_is_success() {
        for status in 200..=299 {
            let raw = raw(status, "");
            let response = response_for(&raw);
            let result = check_response(&Context::background(), response, raw).await;
            assert!(result.is_ok(), "status {status} should be success");
        }
    }

    #[tokio::test]
    async fn test_non_2xx_statuses_are_api_errors() {
        for status in [100, 199, 300, 304, 400, 401, 404, 409, 429, 500, 503, 599] {
            let raw = raw(status, "nope");
            let response = response_for(&raw);
            let err = check_response(&Context::background(), response, raw).await.unwrap_err();
            match err {
                ApiError::Api(error) => {
                    assert_eq!(error.code, status);
                    assert_eq!(error.message, "nope");
                    assert_eq!(error.response.status().as_u16(), status);
                }
                other => panic!("expected API error for {status}, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_error_body_is_kept_verbatim() {
        let raw = raw(404, r#"{"msg":"not found"}"#);
        let response = response_for(&raw);
        let err = check_response(&Context::background(), response, raw).await.unwrap_err();
        let error = err.error_response().unwrap();
        assert_eq!(error.code, 404);
        assert_eq!(error.kind, "Not Found");
        assert_eq!(error.message, "{\"msg\":\"not found\"}");
    }

    #[test]
    fn test_decode_body() {
        let created: Option<Created> = decode_body(br#"{"id":"7"}"#).unwrap();
        assert_eq!(created, Some(Created { id: "7".into() }));

        let empty: Option<Created> = decode_body(b"").unwrap();
        assert_eq!(empty, None);

        let blank: Option<Created> = decode_body(b" \n").unwrap();
        assert_eq!(blank, None);

        assert!(decode_body::<Created>(b"{not json").is_err());
        assert!(decode_body::<Created>(b"<html>").is_err());
    }

    #[test]
    fn test_decode_body_reads_first_value_only() {
        let first: Option<Created> = decode_body(b"{\"id\":\"7\"}\n{\"id\":\"8\"}").unwrap();
        assert_eq!(first, Some(Created { id: "7".into() }));
    }

    #[tokio::test]
    async fn test_cancelled_error_body_read_keeps_error_response() {
        let ctx = Context::background();
        ctx.cancel();
        let raw = raw(503, "unavailable");
        let response = response_for(&raw);
        let err = check_response(&ctx, response, raw).await.unwrap_err();

        let error = err.error_response().expect("non-2xx must yield an error response");
        assert_eq!(error.code, 503);
        assert_eq!(error.kind, "Service Unavailable");
        assert!(error.read_error.is_some());
        assert!(err.is_cancelled());
        assert_eq!(err.status(), Some(StatusCode::SERVICE_UNAVAILABLE));
    }

    #[test]
    fn test_header_lookup() {
        let mut headers = HeaderMap::new();
        headers.insert("x-rate-limit-remaining", "42".parse().unwrap());
        let response = Response::new(
            Method::GET,
            Url::parse("https://acme.example-idp.com/").unwrap(),
            StatusCode::OK,
            headers,
        );
        assert_eq!(response.header("X-Rate-Limit-Remaining"), Some("42"));
        assert_eq!(response.header("missing"), None);
    }
}
