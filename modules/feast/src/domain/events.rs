use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Created,
    Updated,
    Deleted,
    /// The collection changed in a way the observer could not attribute to a single row.
    Refreshed,
}

/// Transport-agnostic change notification for one backend collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub collection: String,
    pub kind: ChangeKind,
    pub id: Option<String>,
    pub at: DateTime<Utc>,
}

impl ChangeEvent {
    pub fn new(collection: &str, kind: ChangeKind, id: Option<String>) -> Self {
        Self {
            collection: collection.to_string(),
            kind,
            id,
            at: Utc::now(),
        }
    }

    pub fn concerns(&self, collection: &str) -> bool {
        self.collection == collection
    }
}
