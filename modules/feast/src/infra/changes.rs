use futures::stream::BoxStream;
use futures::StreamExt;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tracing::trace;

use crate::domain::events::ChangeEvent;
use crate::domain::ports::ChangeSource;

/// Bounded fan-out of change events built on `tokio::sync::broadcast`.
/// Slow subscribers lose the oldest events rather than stalling publishers.
#[derive(Clone)]
pub struct ChangeBroadcaster {
    tx: broadcast::Sender<ChangeEvent>,
}

impl ChangeBroadcaster {
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Publish to current subscribers. Having none is not an error.
    pub fn send(&self, event: ChangeEvent) {
        trace!(collection = %event.collection, kind = ?event.kind, "change published");
        let _ = self.tx.send(event);
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for ChangeBroadcaster {
    fn default() -> Self {
        Self::new(64)
    }
}

impl ChangeSource for ChangeBroadcaster {
    fn changes(&self) -> BoxStream<'static, ChangeEvent> {
        BroadcastStream::new(self.tx.subscribe())
            .filter_map(|res| async move { res.ok() })
            .boxed()
    }
}
