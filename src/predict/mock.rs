use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use super::{Endpoint, PredictError, Predictor, UploadRequest};

/// What a scripted call answers with.
#[derive(Debug, Clone)]
pub enum Reply {
    /// A successful response with this body.
    Json(Value),
    /// A non-success status with no body.
    Status(u16),
    /// Never answers.
    Hang,
}

/// One scripted answer, delivered after `delay`.
#[derive(Debug, Clone)]
pub struct Scripted {
    pub delay: Duration,
    pub reply: Reply,
}

impl Scripted {
    pub fn json(value: Value) -> Self {
        Self {
            delay: Duration::ZERO,
            reply: Reply::Json(value),
        }
    }

    pub fn status(code: u16) -> Self {
        Self {
            delay: Duration::ZERO,
            reply: Reply::Status(code),
        }
    }

    pub fn hang() -> Self {
        Self {
            delay: Duration::ZERO,
            reply: Reply::Hang,
        }
    }

    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// What the predictor was asked to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub url: String,
    pub field: &'static str,
    pub filename: String,
    pub bytes: usize,
}

/// A scripted predictor for tests. Answers calls in order, records each one.
pub struct MockPredictor {
    script: Vec<Scripted>,
    index: AtomicUsize,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockPredictor {
    pub fn new(script: Vec<Scripted>) -> Self {
        Self {
            script,
            index: AtomicUsize::new(0),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Predictor for MockPredictor {
    async fn predict(
        &self,
        endpoint: &Endpoint,
        upload: &UploadRequest,
    ) -> Result<Value, PredictError> {
        self.calls.lock().unwrap().push(RecordedCall {
            url: endpoint.url.clone(),
            field: endpoint.field,
            filename: upload.filename.clone(),
            bytes: upload.bytes.len(),
        });

        let i = self.index.fetch_add(1, Ordering::SeqCst);
        let Some(scripted) = self.script.get(i).cloned() else {
            panic!("MockPredictor: no more replies (called {} times)", i + 1);
        };

        tokio::time::sleep(scripted.delay).await;
        match scripted.reply {
            Reply::Json(value) => Ok(value),
            Reply::Status(code) => Err(PredictError::Server {
                url: endpoint.url.clone(),
                status: code,
                reason: reqwest::StatusCode::from_u16(code)
                    .ok()
                    .and_then(|s| s.canonical_reason())
                    .unwrap_or("")
                    .to_string(),
                detail: None,
            }),
            Reply::Hang => std::future::pending().await,
        }
    }
}
