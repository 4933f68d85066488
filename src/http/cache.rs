use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde_json::Value;

/// Parsed responses keyed by exact request URL. Entries never expire or
/// evict within a session; the catalog behind them is finite (114 chapters)
/// and treated as immutable.
#[derive(Clone, Default)]
pub struct ResponseCache {
    entries: Arc<RwLock<HashMap<String, Arc<Value>>>>,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, url: &str) -> Option<Arc<Value>> {
        self.entries.read().unwrap().get(url).cloned()
    }

    pub fn insert(&self, url: String, value: Value) -> Arc<Value> {
        let value = Arc::new(value);
        self.entries
            .write()
            .unwrap()
            .insert(url, Arc::clone(&value));
        value
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().unwrap().is_empty()
    }
}
