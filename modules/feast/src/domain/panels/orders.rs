use std::sync::Arc;

use futures::stream::BoxStream;
use futures::StreamExt;
use tracing::{debug, info, instrument};

use super::{contains_lowercase, CollectionPanel, Searchable};
use crate::contract::model::{Order, OrderPatch, OrderStatus};
use crate::domain::error::DomainError;
use crate::domain::events::ChangeEvent;
use crate::domain::lifecycle::TransitionPolicy;
use crate::domain::ports::{CollectionPort, Notifier};
use crate::domain::resource::Resource;

impl Searchable for Order {
    fn matches(&self, needle: &str) -> bool {
        [&self.id, &self.customer_name, &self.customer_phone]
            .into_iter()
            .any(|field| contains_lowercase(field, needle))
    }
}

/// Orders table with a status filter and the configured transition policy.
pub struct OrdersPanel {
    panel: CollectionPanel<Order>,
    policy: TransitionPolicy,
    status_filter: Option<OrderStatus>,
}

impl OrdersPanel {
    pub fn new(
        port: Arc<dyn CollectionPort<Order>>,
        notifier: Arc<dyn Notifier>,
        policy: TransitionPolicy,
    ) -> Self {
        Self {
            panel: CollectionPanel::new(port, notifier),
            policy,
            status_filter: None,
        }
    }

    pub fn panel(&self) -> &CollectionPanel<Order> {
        &self.panel
    }

    pub fn panel_mut(&mut self) -> &mut CollectionPanel<Order> {
        &mut self.panel
    }

    pub async fn load(&mut self) -> Result<(), DomainError> {
        self.panel.load().await
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.panel.set_search(query);
    }

    pub fn set_status_filter(&mut self, status: Option<OrderStatus>) {
        self.status_filter = status;
    }

    pub fn status_filter(&self) -> Option<OrderStatus> {
        self.status_filter
    }

    /// Orders matching both the search box and the status filter.
    pub fn visible(&self) -> Vec<&Order> {
        self.panel
            .filtered()
            .into_iter()
            .filter(|o| self.status_filter.map_or(true, |s| s == o.status))
            .collect()
    }

    /// Number of loaded orders per status, every status listed.
    pub fn status_counts(&self) -> Vec<(OrderStatus, usize)> {
        status_counts(self.panel.items())
    }

    /// Send `{status}` for one order, subject to the transition policy.
    /// Setting the current status again sends nothing.
    #[instrument(name = "feast.orders.set_status", skip(self), fields(to = %status))]
    pub async fn set_status(&mut self, id: &str, status: OrderStatus) -> Result<(), DomainError> {
        let current = self.panel.require(id)?.status;
        if let Err(e) = self.policy.check(current, status) {
            self.panel.notifier().error(e.to_string());
            return Err(e);
        }
        if current == status {
            debug!("status unchanged");
            return Ok(());
        }
        self.panel.update(id, &OrderPatch { status }).await?;
        info!(from = %current, "order status changed");
        Ok(())
    }

    /// Refetch on every change to the orders collection until `changes` ends.
    /// `on_refresh` runs after each successful refetch.
    #[instrument(name = "feast.orders.follow", skip_all)]
    pub async fn follow<F>(&mut self, mut changes: BoxStream<'static, ChangeEvent>, mut on_refresh: F)
    where
        F: FnMut(&OrdersPanel),
    {
        while let Some(event) = changes.next().await {
            if !event.concerns(Order::COLLECTION) {
                continue;
            }
            debug!(kind = ?event.kind, id = ?event.id, "orders changed");
            if self.load().await.is_ok() {
                on_refresh(&*self);
            }
        }
    }
}

pub fn status_counts<'a>(orders: impl IntoIterator<Item = &'a Order>) -> Vec<(OrderStatus, usize)> {
    let mut counts: Vec<(OrderStatus, usize)> =
        OrderStatus::ALL.into_iter().map(|s| (s, 0)).collect();
    for order in orders {
        if let Some(slot) = counts.iter_mut().find(|(s, _)| *s == order.status) {
            slot.1 += 1;
        }
    }
    counts
}
