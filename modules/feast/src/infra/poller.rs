use std::sync::Arc;
use std::time::Duration;

use futures::stream::BoxStream;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::contract::model::Order;
use crate::domain::events::{ChangeEvent, ChangeKind};
use crate::domain::ports::{ChangeSource, CollectionPort};
use crate::domain::resource::Resource;
use crate::infra::changes::ChangeBroadcaster;

/// Watches the orders collection by listing it on an interval.
///
/// Emits `Refreshed` whenever the snapshot differs from the previous one, which
/// also picks up changes made by other admins. The first poll only sets the baseline.
pub struct OrdersPoller {
    changes: ChangeBroadcaster,
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl OrdersPoller {
    /// Start polling on the current tokio runtime.
    pub fn spawn(
        orders: Arc<dyn CollectionPort<Order>>,
        every: Duration,
        cancel: CancellationToken,
    ) -> Self {
        let changes = ChangeBroadcaster::default();
        let handle = tokio::spawn(poll_loop(
            orders,
            every.max(Duration::from_millis(10)),
            changes.clone(),
            cancel.clone(),
        ));
        Self {
            changes,
            cancel,
            handle: Some(handle),
        }
    }

    /// Stop polling and wait for the task to finish.
    pub async fn stop(mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                warn!(error = %e, "orders poller task failed");
            }
        }
    }
}

impl Drop for OrdersPoller {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl ChangeSource for OrdersPoller {
    fn changes(&self) -> BoxStream<'static, ChangeEvent> {
        self.changes.changes()
    }
}

async fn poll_loop(
    orders: Arc<dyn CollectionPort<Order>>,
    every: Duration,
    changes: ChangeBroadcaster,
    cancel: CancellationToken,
) {
    info!(interval_ms = every.as_millis() as u64, "orders poller started");
    let mut ticker = tokio::time::interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last: Option<Vec<Order>> = None;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let mut snapshot = match orders.list().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %format!("{e:#}"), "orders poll failed");
                continue;
            }
        };
        Order::arrange(&mut snapshot);

        match &last {
            Some(previous) if *previous == snapshot => {}
            Some(_) => {
                debug!(count = snapshot.len(), "orders snapshot changed");
                changes.send(ChangeEvent::new(Order::COLLECTION, ChangeKind::Refreshed, None));
                last = Some(snapshot);
            }
            None => last = Some(snapshot),
        }
    }
    info!("orders poller stopped");
}
