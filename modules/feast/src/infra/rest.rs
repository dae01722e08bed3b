use std::time::Duration;

use anyhow::{bail, Context};
use async_trait::async_trait;
use futures::stream::BoxStream;
use reqwest::{Method, StatusCode};
use serde::Serialize;
use tracing::{debug, instrument};
use url::Url;

use crate::domain::events::{ChangeEvent, ChangeKind};
use crate::domain::ports::{ChangeSource, CollectionPort};
use crate::domain::resource::Resource;
use crate::infra::changes::ChangeBroadcaster;
use crate::infra::http::TracedClient;

/// HTTP adapter for the collection endpoints under `{base}/api/`.
///
/// `GET`/`POST /api/{collection}` list and create, `PUT`/`DELETE /api/{collection}/{id}`
/// update and delete. A 204 or an empty body is an empty success.
pub struct RestBackend {
    client: TracedClient,
    base: Url,
    changes: ChangeBroadcaster,
}

impl RestBackend {
    pub fn new(client: TracedClient, base: Url) -> Self {
        Self {
            client,
            base,
            changes: ChangeBroadcaster::default(),
        }
    }

    /// Build the reqwest client from connection settings. A zero timeout disables it.
    pub fn connect(base: Url, api_token: Option<String>, timeout: Duration) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder();
        if !timeout.is_zero() {
            builder = builder.timeout(timeout);
        }
        let inner = builder.build().context("Failed to build HTTP client")?;
        Ok(Self::new(
            TracedClient::new(inner).with_bearer(api_token),
            base,
        ))
    }

    fn endpoint(&self, collection: &str, id: Option<&str>) -> anyhow::Result<Url> {
        let mut url = self.base.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| anyhow::anyhow!("Backend base URL '{}' cannot carry a path", self.base))?;
            segments.pop_if_empty().extend(["api", collection]);
            if let Some(id) = id {
                segments.push(id);
            }
        }
        Ok(url)
    }

    /// One round trip. `Ok(None)` for 204 and empty bodies.
    async fn call<B>(
        &self,
        method: Method,
        collection: &str,
        id: Option<&str>,
        body: Option<&B>,
    ) -> anyhow::Result<Option<String>>
    where
        B: Serialize + Sync + ?Sized,
    {
        let url = self.endpoint(collection, id)?;
        let failed = format!("API call failed on {} ({method})", url.path());

        let mut builder = self.client.request(method.clone(), url.as_str());
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let request = builder.build().with_context(|| failed.clone())?;
        let response = self
            .client
            .execute(request)
            .await
            .with_context(|| failed.clone())?;

        let status = response.status();
        let text = response.text().await.with_context(|| failed.clone())?;
        if !status.is_success() {
            bail!("{failed}: {}", error_detail(status, &text));
        }
        if status == StatusCode::NO_CONTENT || text.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(text))
    }

    fn publish(&self, collection: &str, kind: ChangeKind, id: Option<String>) {
        self.changes.send(ChangeEvent::new(collection, kind, id));
    }
}

/// The body's `message` field when there is one, else the status reason.
fn error_detail(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message")?.as_str().map(str::to_owned))
        .filter(|m| !m.trim().is_empty())
        .or_else(|| status.canonical_reason().map(str::to_owned))
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
}

#[async_trait]
impl<R: Resource> CollectionPort<R> for RestBackend {
    #[instrument(name = "feast.rest.list", skip(self), fields(collection = R::COLLECTION))]
    async fn list(&self) -> anyhow::Result<Vec<R>> {
        let Some(body) = self
            .call::<()>(Method::GET, R::COLLECTION, None, None)
            .await?
        else {
            return Ok(Vec::new());
        };
        let items: Vec<R> = serde_json::from_str(&body)
            .with_context(|| format!("Invalid {} list returned by /api/{}", R::KIND, R::COLLECTION))?;
        debug!(count = items.len(), "listed");
        Ok(items)
    }

    #[instrument(name = "feast.rest.create", skip_all, fields(collection = R::COLLECTION))]
    async fn create(&self, draft: &R::Draft) -> anyhow::Result<Option<R>> {
        let body = self
            .call(Method::POST, R::COLLECTION, None, Some(draft))
            .await?;
        let created = body.and_then(|b| match serde_json::from_str::<R>(&b) {
            Ok(record) => Some(record),
            Err(e) => {
                debug!(error = %e, "create acknowledged without a record body");
                None
            }
        });
        self.publish(
            R::COLLECTION,
            ChangeKind::Created,
            created.as_ref().map(|r| r.id().to_string()),
        );
        Ok(created)
    }

    #[instrument(name = "feast.rest.update", skip(self, patch), fields(collection = R::COLLECTION))]
    async fn update(&self, id: &str, patch: &R::Patch) -> anyhow::Result<()> {
        self.call(Method::PUT, R::COLLECTION, Some(id), Some(patch))
            .await?;
        self.publish(R::COLLECTION, ChangeKind::Updated, Some(id.to_string()));
        Ok(())
    }

    #[instrument(name = "feast.rest.delete", skip(self), fields(collection = R::COLLECTION))]
    async fn delete(&self, id: &str) -> anyhow::Result<()> {
        self.call::<()>(Method::DELETE, R::COLLECTION, Some(id), None)
            .await?;
        self.publish(R::COLLECTION, ChangeKind::Deleted, Some(id.to_string()));
        Ok(())
    }
}

impl ChangeSource for RestBackend {
    fn changes(&self) -> BoxStream<'static, ChangeEvent> {
        self.changes.changes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_handles_trailing_slash() {
        for base in ["http://api.local", "http://api.local/"] {
            let backend = RestBackend::new(TracedClient::default(), Url::parse(base).unwrap());
            let url = backend.endpoint("orders", Some("o 1")).unwrap();
            assert_eq!(url.as_str(), "http://api.local/api/orders/o%201");
        }
    }

    #[test]
    fn endpoint_keeps_base_path() {
        let backend = RestBackend::new(
            TracedClient::default(),
            Url::parse("http://host/restaurant/").unwrap(),
        );
        let url = backend.endpoint("dishes", None).unwrap();
        assert_eq!(url.path(), "/restaurant/api/dishes");
    }

    #[test]
    fn error_detail_prefers_message_field() {
        assert_eq!(
            error_detail(StatusCode::BAD_REQUEST, r#"{"message":"price is required"}"#),
            "price is required"
        );
        assert_eq!(error_detail(StatusCode::NOT_FOUND, "<html>"), "Not Found");
        assert_eq!(
            error_detail(StatusCode::INTERNAL_SERVER_ERROR, r#"{"message":""}"#),
            "Internal Server Error"
        );
    }
}
