//! Read-only access to the realtime database behind the dashboard.
//!
//! The database and its schema belong to another service. Pages only read
//! paths from it; a missing path is `None`, never an error.

pub mod firebase;
pub mod memory;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

pub use firebase::FirebaseStore;
pub use memory::MemoryStore;

/// A keyed JSON store. Could be Firebase, a fixture, etc.
#[async_trait]
pub trait RealtimeStore: Send + Sync {
    /// Value at `path`, or `None` when nothing is stored there.
    async fn get(&self, path: &str) -> Result<Option<Value>>;
}

/// Display text for a scalar read from the store.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
