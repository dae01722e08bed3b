//! Admin list/edit panels.
//!
//! Every panel owns a full copy of one backend collection. Mutations are awaited and,
//! once the backend accepts them, the whole collection is fetched again; a failed
//! mutation leaves the local copy as it was.

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::domain::error::DomainError;
use crate::domain::ports::{CollectionPort, Confirm, Notifier};
use crate::domain::resource::Resource;

pub mod dishes;
pub mod orders;
pub mod users;

pub use dishes::DishesPanel;
pub use orders::OrdersPanel;
pub use users::{UserStats, UsersPanel};

/// Records that can be matched by the panel search box.
pub trait Searchable {
    /// `needle` is already trimmed and lowercased and never empty.
    fn matches(&self, needle: &str) -> bool;
}

pub(crate) fn contains_lowercase(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

pub struct CollectionPanel<R: Resource> {
    port: Arc<dyn CollectionPort<R>>,
    notifier: Arc<dyn Notifier>,
    items: Vec<R>,
    search: String,
}

impl<R: Resource> CollectionPanel<R> {
    pub fn new(port: Arc<dyn CollectionPort<R>>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            port,
            notifier,
            items: Vec::new(),
            search: String::new(),
        }
    }

    /// Replace the local copy with the backend's collection.
    #[instrument(name = "feast.panel.load", skip(self), fields(collection = R::COLLECTION))]
    pub async fn load(&mut self) -> Result<(), DomainError> {
        match self.port.list().await {
            Ok(mut items) => {
                R::arrange(&mut items);
                debug!(count = items.len(), "collection fetched");
                self.items = items;
                Ok(())
            }
            Err(e) => {
                warn!(error = %format!("{e:#}"), "failed to fetch collection");
                self.notifier
                    .error(format!("Failed to load {}", R::COLLECTION));
                Err(DomainError::from_infra(e))
            }
        }
    }

    pub fn items(&self) -> &[R] {
        &self.items
    }

    pub fn find(&self, id: &str) -> Option<&R> {
        self.items.iter().find(|r| r.id() == id)
    }

    pub(crate) fn require(&self, id: &str) -> Result<&R, DomainError> {
        self.find(id)
            .ok_or_else(|| DomainError::not_found(R::KIND, id))
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search = query.into();
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    /// Insert a record, then refetch.
    #[instrument(name = "feast.panel.create", skip_all, fields(collection = R::COLLECTION))]
    pub async fn create(&mut self, draft: &R::Draft) -> Result<Option<R>, DomainError> {
        let res = self.port.create(draft).await;
        self.settle(res, "create", format!("{} created", R::KIND))
            .await
    }

    /// Update a record by id, then refetch.
    #[instrument(name = "feast.panel.update", skip(self, patch), fields(collection = R::COLLECTION))]
    pub async fn update(&mut self, id: &str, patch: &R::Patch) -> Result<(), DomainError> {
        let res = self.port.update(id, patch).await;
        self.settle(res, "update", format!("{} updated", R::KIND))
            .await
    }

    /// Delete a record after the person at the keyboard agreed.
    ///
    /// Returns `Ok(false)` when the deletion was declined; nothing is sent in that case.
    #[instrument(name = "feast.panel.delete", skip(self, confirm), fields(collection = R::COLLECTION))]
    pub async fn delete(&mut self, id: &str, confirm: &dyn Confirm) -> Result<bool, DomainError> {
        let prompt = format!("Delete {} {id}? This cannot be undone.", R::KIND.to_lowercase());
        if !confirm.confirm(&prompt) {
            debug!("deletion declined");
            return Ok(false);
        }
        let res = self.port.delete(id).await;
        self.settle(res, "delete", format!("{} deleted", R::KIND))
            .await?;
        Ok(true)
    }

    async fn settle<T>(
        &mut self,
        res: anyhow::Result<T>,
        verb: &str,
        success: String,
    ) -> Result<T, DomainError> {
        match res {
            Ok(value) => {
                self.notifier.success(success);
                // The mutation already happened; a failed refetch is reported by `load`.
                let _ = self.load().await;
                Ok(value)
            }
            Err(e) => {
                warn!(error = %format!("{e:#}"), verb, "mutation failed");
                self.notifier
                    .error(format!("Failed to {verb} {}", R::KIND.to_lowercase()));
                Err(DomainError::from_infra(e))
            }
        }
    }
}

impl<R: Resource + Searchable> CollectionPanel<R> {
    /// Records matching the current search, in presentation order.
    pub fn filtered(&self) -> Vec<&R> {
        let needle = self.search.trim().to_lowercase();
        self.items
            .iter()
            .filter(|r| needle.is_empty() || r.matches(&needle))
            .collect()
    }
}
