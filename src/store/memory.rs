use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{Result, bail};
use async_trait::async_trait;
use serde_json::Value;

use super::RealtimeStore;

/// In-memory store for tests and offline runs. Paths are flat keys.
#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, Value>>,
    failing: Mutex<Vec<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, path: &str, value: Value) -> Self {
        self.values.lock().unwrap().insert(path.to_string(), value);
        self
    }

    /// Make reads of `path` fail, to exercise error handling.
    pub fn failing(self, path: &str) -> Self {
        self.failing.lock().unwrap().push(path.to_string());
        self
    }
}

#[async_trait]
impl RealtimeStore for MemoryStore {
    async fn get(&self, path: &str) -> Result<Option<Value>> {
        if self.failing.lock().unwrap().iter().any(|p| p == path) {
            bail!("simulated read failure for {path}");
        }
        Ok(self
            .values
            .lock()
            .unwrap()
            .get(path)
            .filter(|v| !v.is_null())
            .cloned())
    }
}
