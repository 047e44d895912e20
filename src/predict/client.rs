use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use tracing::{debug, warn};

use super::{Endpoint, PredictError, UploadRequest};

/// Sends one upload to a prediction service and returns the parsed JSON body.
///
/// Implementations do not retry. Shape checks happen in the caller.
#[async_trait]
pub trait Predictor: Send + Sync {
    async fn predict(&self, endpoint: &Endpoint, upload: &UploadRequest)
    -> Result<Value, PredictError>;
}

/// Multipart-over-HTTP predictor used against the real services.
pub struct HttpPredictor {
    client: reqwest::Client,
}

impl HttpPredictor {
    /// `timeout` of `None` waits for the service as long as it takes.
    pub fn new(timeout: Option<Duration>) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }
}

#[async_trait]
impl Predictor for HttpPredictor {
    async fn predict(
        &self,
        endpoint: &Endpoint,
        upload: &UploadRequest,
    ) -> Result<Value, PredictError> {
        let transport = |source| PredictError::Transport {
            url: endpoint.url.clone(),
            source,
        };

        let part = Part::bytes(upload.bytes.clone())
            .file_name(upload.filename.clone())
            .mime_str(upload.mime_type)
            .map_err(transport)?;
        let form = Form::new().part(endpoint.field, part);

        debug!(
            url = %endpoint.url,
            file = %upload.filename,
            bytes = upload.bytes.len(),
            "uploading"
        );
        let resp = self
            .client
            .post(&endpoint.url)
            .multipart(form)
            .send()
            .await
            .map_err(transport)?;

        let status = resp.status();
        let body = resp.bytes().await.map_err(transport)?;

        if !status.is_success() {
            let detail = error_detail(&body);
            warn!(url = %endpoint.url, %status, detail = ?detail, "prediction service failed");
            return Err(PredictError::Server {
                url: endpoint.url.clone(),
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("").to_string(),
                detail,
            });
        }

        serde_json::from_slice(&body).map_err(|source| PredictError::Decode {
            url: endpoint.url.clone(),
            source,
        })
    }
}

/// Pull the `error` string out of a `{"error": "..."}` body.
fn error_detail(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    value.get("error")?.as_str().map(str::to_string)
}
