use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use super::RealtimeStore;

/// Firebase Realtime Database over its REST API (`GET {base}/{path}.json`).
pub struct FirebaseStore {
    base_url: String,
    token: Option<String>,
    client: reqwest::Client,
}

impl FirebaseStore {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.is_empty()),
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// REST URL for a database path.
    pub fn url_for(&self, path: &str) -> String {
        let path = path.trim_matches('/');
        match &self.token {
            Some(token) => format!("{}/{}.json?auth={}", self.base_url, path, urlencoded(token)),
            None => format!("{}/{}.json", self.base_url, path),
        }
    }
}

#[async_trait]
impl RealtimeStore for FirebaseStore {
    async fn get(&self, path: &str) -> Result<Option<Value>> {
        debug!(path, base = %self.base_url, "reading realtime store");
        let resp = self
            .client
            .get(self.url_for(path))
            .send()
            .await
            .with_context(|| format!("failed to reach realtime store for {path}"))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            bail!("realtime store error reading {path} ({status}): {text}");
        }

        let value: Value = resp
            .json()
            .await
            .with_context(|| format!("realtime store returned invalid JSON for {path}"))?;
        Ok((!value.is_null()).then_some(value))
    }
}

fn urlencoded(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char);
            }
            _ => out.push_str(&format!("%{b:02X}")),
        }
    }
    out
}
