use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use anyhow::{bail, Context};
use async_trait::async_trait;
use chrono::Utc;
use futures::stream::BoxStream;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::contract::model::{Category, Dish, LocalizedText};
use crate::domain::events::{ChangeEvent, ChangeKind};
use crate::domain::ports::{ChangeSource, CollectionPort};
use crate::domain::resource::Resource;
use crate::infra::changes::ChangeBroadcaster;

/// Backend kept in process memory: one list of JSON rows per collection.
///
/// Rows are stored type-erased so a single instance serves every `Resource`.
#[derive(Default)]
pub struct InMemoryBackend {
    rows: Mutex<HashMap<&'static str, Vec<Value>>>,
    changes: ChangeBroadcaster,
    calls: AtomicUsize,
    offline: AtomicBool,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert records as-is, keeping their ids.
    pub fn seed<R: Resource>(&self, records: impl IntoIterator<Item = R>) -> anyhow::Result<()> {
        let mut rows = self.rows.lock();
        let table = rows.entry(R::COLLECTION).or_default();
        for record in records {
            table.push(serde_json::to_value(&record).context("Failed to store record")?);
        }
        Ok(())
    }

    /// Number of port calls served so far, failed ones included.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// While offline every port call fails.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn enter(&self, collection: &str, op: &str) -> anyhow::Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.offline.load(Ordering::SeqCst) {
            bail!("API call failed on /api/{collection} ({op}): backend offline");
        }
        Ok(())
    }

    fn publish(&self, collection: &str, kind: ChangeKind, id: Option<String>) {
        self.changes.send(ChangeEvent::new(collection, kind, id));
    }

    /// A small bilingual menu for trying the client without a server.
    pub fn demo() -> anyhow::Result<Self> {
        let backend = Self::new();
        let text = |en: &str, ar: &str, fr: &str| LocalizedText {
            en: en.to_string(),
            ar: ar.to_string(),
            fr: fr.to_string(),
        };
        backend.seed([
            Category {
                id: "starters".into(),
                name: text("Starters", "مقبلات", "Entrées"),
                display_order: 1,
            },
            Category {
                id: "mains".into(),
                name: text("Main dishes", "أطباق رئيسية", "Plats"),
                display_order: 2,
            },
            Category {
                id: "desserts".into(),
                name: text("Desserts", "حلويات", "Desserts"),
                display_order: 3,
            },
        ])?;

        let dish = |id: &str, category: &str, name: LocalizedText, cents: i64, order: i32| Dish {
            id: id.to_string(),
            category_id: Some(category.to_string()),
            name,
            description: LocalizedText::default(),
            price: Decimal::new(cents, 2),
            image_url: None,
            is_available: true,
            display_order: order,
            created_at: None,
        };
        let mut sold_out = dish("makrout", "desserts", text("Makrout", "مقروط", "Makrout"), 350, 7);
        sold_out.is_available = false;
        backend.seed([
            dish("chorba", "starters", text("Chorba", "شوربة", "Chorba"), 450, 1),
            dish("bourek", "starters", text("Bourek", "بوراك", "Bourek"), 300, 2),
            dish("couscous", "mains", text("Couscous", "كسكس", "Couscous"), 1200, 3),
            dish("chakhchoukha", "mains", text("Chakhchoukha", "شخشوخة", "Chakhchoukha"), 1100, 4),
            dish("rechta", "mains", text("Rechta", "رشتة", "Rechta"), 1000, 5),
            dish("baklawa", "desserts", text("Baklawa", "بقلاوة", "Baklava"), 400, 6),
            sold_out,
        ])?;
        Ok(backend)
    }
}

fn row_id(row: &Value) -> Option<&str> {
    row.get("id").and_then(Value::as_str)
}

#[async_trait]
impl<R: Resource> CollectionPort<R> for InMemoryBackend {
    #[instrument(name = "feast.memory.list", skip(self), fields(collection = R::COLLECTION))]
    async fn list(&self) -> anyhow::Result<Vec<R>> {
        self.enter(R::COLLECTION, "GET")?;
        let rows = self.rows.lock();
        rows.get(R::COLLECTION)
            .map(|table| {
                table
                    .iter()
                    .map(|row| serde_json::from_value(row.clone()))
                    .collect::<Result<Vec<R>, _>>()
            })
            .transpose()
            .with_context(|| format!("Corrupt {} row", R::KIND))
            .map(Option::unwrap_or_default)
    }

    #[instrument(name = "feast.memory.create", skip_all, fields(collection = R::COLLECTION))]
    async fn create(&self, draft: &R::Draft) -> anyhow::Result<Option<R>> {
        self.enter(R::COLLECTION, "POST")?;
        let record = R::from_draft(Uuid::new_v4().to_string(), draft.clone(), Utc::now());
        let row = serde_json::to_value(&record).context("Failed to store record")?;
        self.rows.lock().entry(R::COLLECTION).or_default().push(row);
        debug!(id = record.id(), "created");
        self.publish(R::COLLECTION, ChangeKind::Created, Some(record.id().to_string()));
        Ok(Some(record))
    }

    #[instrument(name = "feast.memory.update", skip(self, patch), fields(collection = R::COLLECTION))]
    async fn update(&self, id: &str, patch: &R::Patch) -> anyhow::Result<()> {
        self.enter(R::COLLECTION, "PUT")?;
        {
            let mut rows = self.rows.lock();
            let Some(row) = rows
                .get_mut(R::COLLECTION)
                .and_then(|table| table.iter_mut().find(|r| row_id(r) == Some(id)))
            else {
                bail!("API call failed on /api/{}/{id} (PUT): Not Found", R::COLLECTION);
            };
            let mut record: R =
                serde_json::from_value(row.clone()).with_context(|| format!("Corrupt {} row", R::KIND))?;
            record.apply_patch(patch.clone());
            *row = serde_json::to_value(&record).context("Failed to store record")?;
        }
        self.publish(R::COLLECTION, ChangeKind::Updated, Some(id.to_string()));
        Ok(())
    }

    #[instrument(name = "feast.memory.delete", skip(self), fields(collection = R::COLLECTION))]
    async fn delete(&self, id: &str) -> anyhow::Result<()> {
        self.enter(R::COLLECTION, "DELETE")?;
        let removed = {
            let mut rows = self.rows.lock();
            rows.get_mut(R::COLLECTION).is_some_and(|table| {
                let before = table.len();
                table.retain(|r| row_id(r) != Some(id));
                table.len() != before
            })
        };
        if !removed {
            bail!("API call failed on /api/{}/{id} (DELETE): Not Found", R::COLLECTION);
        }
        self.publish(R::COLLECTION, ChangeKind::Deleted, Some(id.to_string()));
        Ok(())
    }
}

impl ChangeSource for InMemoryBackend {
    fn changes(&self) -> BoxStream<'static, ChangeEvent> {
        self.changes.changes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::model::{NewCategory, Order};

    #[tokio::test]
    async fn create_assigns_ids_and_lists_back() {
        let backend = InMemoryBackend::new();
        let created: Option<Category> = backend
            .create(&NewCategory {
                name: LocalizedText::uniform("Soups"),
                display_order: 4,
            })
            .await
            .unwrap();
        let created = created.unwrap();
        assert!(Uuid::parse_str(&created.id).is_ok());

        let listed: Vec<Category> = backend.list().await.unwrap();
        assert_eq!(listed, vec![created]);
    }

    #[tokio::test]
    async fn missing_rows_are_reported() {
        let backend = InMemoryBackend::new();
        let err = CollectionPort::<Category>::delete(&backend, "nope")
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "API call failed on /api/categories/nope (DELETE): Not Found"
        );
    }

    #[tokio::test]
    async fn empty_collection_lists_empty() {
        let backend = InMemoryBackend::new();
        let orders: Vec<Order> = backend.list().await.unwrap();
        assert!(orders.is_empty());
        assert_eq!(backend.calls(), 1);
    }

    #[tokio::test]
    async fn offline_backend_fails_every_call() {
        let backend = InMemoryBackend::demo().unwrap();
        backend.set_offline(true);
        let res: anyhow::Result<Vec<Dish>> = backend.list().await;
        assert!(res.unwrap_err().to_string().contains("backend offline"));
    }
}
