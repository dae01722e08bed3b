use std::collections::HashMap;

use parking_lot::RwLock;

use crate::domain::ports::SessionStore;

/// Session storage that lives as long as the process.
#[derive(Debug, Default)]
pub struct MemorySession {
    values: RwLock<HashMap<String, String>>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySession {
    fn get(&self, key: &str) -> Option<String> {
        self.values.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.values.write().insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.values.write().remove(key);
    }
}
