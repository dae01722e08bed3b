//! reqwest wrapper that opens an `outgoing_http` span per request.

use tracing::field::Empty;
use tracing::{Instrument, Level};

#[derive(Clone)]
pub struct TracedClient {
    inner: reqwest::Client,
    bearer: Option<String>,
}

impl TracedClient {
    pub fn new(inner: reqwest::Client) -> Self {
        Self {
            inner,
            bearer: None,
        }
    }

    /// Attach `Authorization: Bearer <token>` to every request.
    pub fn with_bearer(mut self, token: Option<String>) -> Self {
        self.bearer = token.filter(|t| !t.trim().is_empty());
        self
    }

    /// Execute a built request inside a span recording the response status.
    pub async fn execute(&self, req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        let span = tracing::span!(
            Level::INFO,
            "outgoing_http",
            http.method = %req.method(),
            http.url = %req.url(),
            http.status_code = Empty,
            error = Empty,
        );

        async {
            let response = self.inner.execute(req).await?;
            let status = response.status();
            tracing::Span::current().record("http.status_code", status.as_u16());
            if status.is_client_error() || status.is_server_error() {
                tracing::Span::current().record("error", true);
            }
            Ok(response)
        }
        .instrument(span)
        .await
    }

    /// Request builder with the configured credentials applied.
    pub fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        let builder = self.inner.request(method, url);
        match &self.bearer {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

impl Default for TracedClient {
    fn default() -> Self {
        Self::new(reqwest::Client::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn bearer_token_is_sent() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/ping")
                    .header("authorization", "Bearer s3cret");
                then.status(200);
            })
            .await;

        let client = TracedClient::default().with_bearer(Some("s3cret".into()));
        let req = client
            .request(reqwest::Method::GET, &server.url("/ping"))
            .build()
            .unwrap();
        let resp = client.execute(req).await.unwrap();

        assert_eq!(resp.status(), 200);
        mock.assert_async().await;
    }

    #[test]
    fn blank_token_is_ignored() {
        let client = TracedClient::default().with_bearer(Some("  ".into()));
        let req = client
            .request(reqwest::Method::GET, "http://localhost/x")
            .build()
            .unwrap();
        assert!(req.headers().get("authorization").is_none());
    }
}
