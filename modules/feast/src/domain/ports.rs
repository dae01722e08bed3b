use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::domain::events::ChangeEvent;
use crate::domain::resource::Resource;

/// Port for the domain layer: the backend operations one collection supports.
/// Object-safe and async-friendly via `async_trait`.
#[async_trait]
pub trait CollectionPort<R: Resource>: Send + Sync {
    /// Fetch the whole collection.
    async fn list(&self) -> anyhow::Result<Vec<R>>;
    /// Insert one record. `None` when the backend acknowledged without a body.
    async fn create(&self, draft: &R::Draft) -> anyhow::Result<Option<R>>;
    /// Update one record by id.
    async fn update(&self, id: &str, patch: &R::Patch) -> anyhow::Result<()>;
    /// Delete one record by id.
    async fn delete(&self, id: &str) -> anyhow::Result<()>;
}

/// Output port: a feed of backend change notifications.
pub trait ChangeSource: Send + Sync {
    fn changes(&self) -> BoxStream<'static, ChangeEvent>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A short user-facing message about the outcome of an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Output port: where user-facing notices go (a toast, a terminal line, a test recorder).
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);

    fn success(&self, message: String) {
        self.notify(Notice {
            level: NoticeLevel::Success,
            message,
        });
    }

    fn error(&self, message: String) {
        self.notify(Notice {
            level: NoticeLevel::Error,
            message,
        });
    }
}

/// Asks the person at the keyboard to confirm a destructive action.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Key/value storage that lives as long as the client session.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}
