// Contribution page HTTP client.
// Fetches the raw calendar markup through a pluggable proxy.

use std::future::Future;

use reqwest::{
    Client, Response, StatusCode,
    header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT},
};
use tracing::debug;

use crate::error::{CalendarError, Result};

/// Public endpoint that mirrors the GitHub contributions page.
pub const DEFAULT_PROXY_BASE: &str = "https://api.bloggify.net/gh-calendar/";

/// Source of raw contribution-page HTML for a username.
pub trait CalendarProxy: Send + Sync {
    fn fetch(&self, username: &str) -> impl Future<Output = Result<String>> + Send;
}

/// Any `Fn(String) -> Future<Output = Result<String>>` works as a proxy.
impl<F, Fut> CalendarProxy for F
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = Result<String>> + Send,
{
    fn fetch(&self, username: &str) -> impl Future<Output = Result<String>> + Send {
        self(username.to_string())
    }
}

/// Default proxy issuing `GET <base>?username=<user>`.
#[derive(Debug, Clone)]
pub struct HttpProxy {
    client: Client,
    base_url: String,
}

impl HttpProxy {
    /// Create a client against the public endpoint.
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_PROXY_BASE)
    }

    /// Create a client against another endpoint (self-hosted mirror, test server).
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("text/html"));
        headers.insert(USER_AGENT, HeaderValue::from_static("ghcal"));

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(CalendarError::Http)?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check response status and convert errors.
    async fn check_response(&self, response: Response) -> Result<Response> {
        match response.status() {
            status if status.is_success() => Ok(response),
            StatusCode::NOT_FOUND => Err(CalendarError::NotFound(response.url().to_string())),
            status => Err(CalendarError::Status {
                status,
                body: response.text().await.unwrap_or_default(),
            }),
        }
    }
}

impl CalendarProxy for HttpProxy {
    async fn fetch(&self, username: &str) -> Result<String> {
        debug!(username, base_url = %self.base_url, "fetching contribution page");
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("username", username)])
            .send()
            .await
            .map_err(CalendarError::Http)?;

        let response = self.check_response(response).await?;
        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{Mock, MockServer, ResponseTemplate, matchers};

    #[tokio::test]
    async fn test_fetch_passes_username() {
        let server = MockServer::start().await;
        Mock::given(matchers::method("GET"))
            .and(matchers::query_param("username", "alice"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<div>calendar</div>"))
            .expect(1)
            .mount(&server)
            .await;

        let proxy = HttpProxy::with_base_url(server.uri()).unwrap();
        let body = proxy.fetch("alice").await.unwrap();
        assert_eq!(body, "<div>calendar</div>");
    }

    #[tokio::test]
    async fn test_fetch_not_found() {
        let server = MockServer::start().await;
        Mock::given(matchers::method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let proxy = HttpProxy::with_base_url(server.uri()).unwrap();
        let err = proxy.fetch("ghost").await.unwrap_err();
        assert!(matches!(err, CalendarError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_fetch_server_error_keeps_body() {
        let server = MockServer::start().await;
        Mock::given(matchers::method("GET"))
            .respond_with(ResponseTemplate::new(502).set_body_string("upstream down"))
            .mount(&server)
            .await;

        let proxy = HttpProxy::with_base_url(server.uri()).unwrap();
        match proxy.fetch("alice").await.unwrap_err() {
            CalendarError::Status { status, body } => {
                assert_eq!(status, StatusCode::BAD_GATEWAY);
                assert_eq!(body, "upstream down");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_closure_proxy() {
        let proxy = |username: String| async move { Ok::<_, CalendarError>(format!("<p>{username}</p>")) };
        assert_eq!(proxy.fetch("bob").await.unwrap(), "<p>bob</p>");
    }
}
