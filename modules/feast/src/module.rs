use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDate};
use futures::stream::BoxStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

use crate::config::FeastConfig;
use crate::contract::model::{Category, Dish, Order, Reservation, User};
use crate::domain::catalog::Catalog;
use crate::domain::checkout::OrderSubmission;
use crate::domain::dashboard::Dashboard;
use crate::domain::error::DomainError;
use crate::domain::events::ChangeEvent;
use crate::domain::gate::AdminGate;
use crate::domain::panels::{DishesPanel, OrdersPanel, UsersPanel};
use crate::domain::ports::{ChangeSource, CollectionPort, Notifier, SessionStore};
use crate::domain::reservation::ReservationSubmission;
use crate::infra::poller::OrdersPoller;
use crate::infra::session::MemorySession;

/// Everything a backend adapter must serve.
pub trait Backend:
    CollectionPort<Category>
    + CollectionPort<Dish>
    + CollectionPort<Order>
    + CollectionPort<User>
    + CollectionPort<Reservation>
    + ChangeSource
{
}

impl<T> Backend for T where
    T: CollectionPort<Category>
        + CollectionPort<Dish>
        + CollectionPort<Order>
        + CollectionPort<User>
        + CollectionPort<Reservation>
        + ChangeSource
{
}

/// Wires one backend, one notifier and one session into the storefront and admin components.
#[derive(Clone)]
pub struct Feast {
    config: FeastConfig,
    categories: Arc<dyn CollectionPort<Category>>,
    dishes: Arc<dyn CollectionPort<Dish>>,
    orders: Arc<dyn CollectionPort<Order>>,
    users: Arc<dyn CollectionPort<User>>,
    reservations: Arc<dyn CollectionPort<Reservation>>,
    changes: Arc<dyn ChangeSource>,
    notifier: Arc<dyn Notifier>,
    session: Arc<dyn SessionStore>,
}

impl Feast {
    pub fn new<B: Backend + 'static>(
        backend: Arc<B>,
        notifier: Arc<dyn Notifier>,
        config: FeastConfig,
    ) -> Self {
        debug!(
            language = %config.language,
            policy = ?config.transition_policy,
            "wiring feast components"
        );
        Self {
            config,
            categories: backend.clone(),
            dishes: backend.clone(),
            orders: backend.clone(),
            users: backend.clone(),
            reservations: backend.clone(),
            changes: backend,
            notifier,
            session: Arc::new(MemorySession::new()),
        }
    }

    pub fn config(&self) -> &FeastConfig {
        &self.config
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    pub async fn load_catalog(&self) -> Result<Catalog, DomainError> {
        Catalog::load(self.categories.as_ref(), self.dishes.as_ref())
            .await
            .inspect_err(|_| self.notifier.error("Failed to load the menu".to_string()))
    }

    pub fn checkout(&self) -> OrderSubmission {
        OrderSubmission::new(self.orders.clone(), self.notifier.clone())
    }

    pub fn reservations(&self) -> ReservationSubmission {
        ReservationSubmission::new(self.reservations.clone(), self.notifier.clone())
    }

    pub fn admin_gate(&self) -> AdminGate {
        AdminGate::new(
            self.config.admin_password.clone(),
            self.config.max_login_attempts,
            self.session.clone(),
        )
    }

    pub fn dishes_panel(&self) -> DishesPanel {
        DishesPanel::new(self.dishes.clone(), self.notifier.clone())
    }

    pub fn orders_panel(&self) -> OrdersPanel {
        OrdersPanel::new(
            self.orders.clone(),
            self.notifier.clone(),
            self.config.transition_policy,
        )
    }

    pub fn users_panel(&self) -> UsersPanel {
        UsersPanel::new(self.users.clone(), self.notifier.clone())
    }

    /// Fetch orders, dishes and categories concurrently and summarize them.
    #[instrument(name = "feast.dashboard", skip(self))]
    pub async fn dashboard(&self) -> Result<Dashboard, DomainError> {
        let (orders, dishes, categories) = tokio::try_join!(
            self.orders.list(),
            self.dishes.list(),
            self.categories.list()
        )
        .map_err(|e| {
            self.notifier.error("Failed to load dashboard data".to_string());
            DomainError::from_infra(e)
        })?;
        Ok(Dashboard::compute(&orders, &dishes, &categories, self.config.language))
    }

    /// Changes made through this client's backend.
    pub fn changes(&self) -> BoxStream<'static, ChangeEvent> {
        self.changes.changes()
    }

    /// Poll the orders collection every `watch_interval_sec` seconds until `cancel` fires.
    pub fn watch_orders(&self, cancel: CancellationToken) -> OrdersPoller {
        let every = Duration::from_secs(self.config.watch_interval_sec.max(1));
        info!(every_sec = every.as_secs(), "watching orders");
        OrdersPoller::spawn(self.orders.clone(), every, cancel)
    }

    /// Local calendar date used to reject reservations in the past.
    pub fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}
