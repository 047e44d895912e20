//! The upload workflow shared by every prediction page.
//!
//! A page holds one selected file, a loading flag, and the last applied
//! result. Submissions are numbered; only the newest one may replace the
//! result, so a slow early response can never overwrite a later one.
//! Closing the page cancels whatever is still in flight.

use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tracing::{debug, info};

use crate::predict::{Endpoint, PredictError, PredictionKind, Predictor, UploadRequest};

/// The file input of a page: at most one selection, optional extension filter.
#[derive(Debug, Default)]
pub struct FileInput {
    accept: Option<&'static str>,
    selected: Option<PathBuf>,
}

impl FileInput {
    pub fn new(accept: Option<&'static str>) -> Self {
        Self {
            accept,
            selected: None,
        }
    }

    /// Replace the selection. A path failing the filter keeps the old one.
    pub fn select(&mut self, path: impl Into<PathBuf>) -> Result<(), PredictError> {
        let path = path.into();
        if let Some(extension) = self.accept {
            let matches = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case(extension));
            if !matches {
                return Err(PredictError::UnsupportedFile { path, extension });
            }
        }
        self.selected = Some(path);
        Ok(())
    }

    pub fn selected(&self) -> Option<&Path> {
        self.selected.as_deref()
    }
}

/// How a submission ended, when it did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission<T> {
    /// The response became the page's result.
    Applied(T),
    /// A newer submission was issued before this one resolved.
    Superseded,
    /// The page was closed before this one resolved.
    Discarded,
}

impl<T> Submission<T> {
    pub fn applied(self) -> Option<T> {
        match self {
            Submission::Applied(t) => Some(t),
            _ => None,
        }
    }
}

/// One prediction page: form, submit handler and result state.
pub struct UploadPage<K: PredictionKind> {
    endpoint: Endpoint,
    predictor: Arc<dyn Predictor>,
    input: Mutex<FileInput>,
    result: Mutex<Option<K::Output>>,
    generation: AtomicU64,
    in_flight: AtomicUsize,
    loading: watch::Sender<bool>,
    closed: watch::Sender<bool>,
    _kind: PhantomData<K>,
}

impl<K: PredictionKind> UploadPage<K> {
    pub fn new(endpoint: Endpoint, predictor: Arc<dyn Predictor>) -> Self {
        Self {
            endpoint,
            predictor,
            input: Mutex::new(FileInput::new(K::ACCEPT)),
            result: Mutex::new(None),
            generation: AtomicU64::new(0),
            in_flight: AtomicUsize::new(0),
            loading: watch::channel(false).0,
            closed: watch::channel(false).0,
            _kind: PhantomData,
        }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn select(&self, path: impl Into<PathBuf>) -> Result<(), PredictError> {
        self.input.lock().unwrap().select(path)
    }

    pub fn selected(&self) -> Option<PathBuf> {
        self.input.lock().unwrap().selected().map(Path::to_path_buf)
    }

    /// The last applied result, if any.
    pub fn result(&self) -> Option<K::Output> {
        self.result.lock().unwrap().clone()
    }

    pub fn is_loading(&self) -> bool {
        *self.loading.borrow()
    }

    /// Follow the loading flag, e.g. to drive a spinner.
    pub fn loading(&self) -> watch::Receiver<bool> {
        self.loading.subscribe()
    }

    pub fn is_closed(&self) -> bool {
        *self.closed.borrow()
    }

    /// Tear the page down. In-flight submissions resolve to `Discarded`.
    pub fn close(&self) {
        self.closed.send_replace(true);
    }

    /// Upload the selected file and, if this is still the newest submission,
    /// make the decoded response the page's result.
    ///
    /// Fails fast without any I/O when nothing is selected. A failed
    /// submission leaves the previous result in place.
    pub async fn submit(&self) -> Result<Submission<K::Output>, PredictError> {
        let path = self.selected().ok_or(PredictError::NoFileSelected)?;
        if self.is_closed() {
            return Ok(Submission::Discarded);
        }

        let upload = UploadRequest::read(&path).await?;
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        info!(page = K::NAME, generation, file = %upload.filename, "submitting");

        let response = {
            let _guard = InFlight::enter(self);
            let mut closed = self.closed.subscribe();
            tokio::select! {
                r = self.predictor.predict(&self.endpoint, &upload) => Some(r),
                _ = closed.wait_for(|c| *c) => None,
            }
        };

        let Some(response) = response else {
            debug!(page = K::NAME, generation, "page closed while request in flight");
            return Ok(Submission::Discarded);
        };
        if self.is_closed() {
            return Ok(Submission::Discarded);
        }
        if generation != self.generation.load(Ordering::SeqCst) {
            debug!(page = K::NAME, generation, "dropping superseded response");
            return Ok(Submission::Superseded);
        }

        let output: K::Output =
            serde_json::from_value(response?).map_err(|source| PredictError::Decode {
                url: self.endpoint.url.clone(),
                source,
            })?;
        *self.result.lock().unwrap() = Some(output.clone());
        info!(page = K::NAME, generation, "result applied");
        Ok(Submission::Applied(output))
    }

    fn enter(&self) {
        if self.in_flight.fetch_add(1, Ordering::SeqCst) == 0 {
            self.loading.send_replace(true);
        }
    }

    fn leave(&self) {
        if self.in_flight.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.loading.send_replace(false);
        }
    }
}

/// Keeps the loading flag raised while a request is outstanding, including
/// when the submitting future is dropped mid-request.
struct InFlight<'a, K: PredictionKind> {
    page: &'a UploadPage<K>,
}

impl<'a, K: PredictionKind> InFlight<'a, K> {
    fn enter(page: &'a UploadPage<K>) -> Self {
        page.enter();
        Self { page }
    }
}

impl<K: PredictionKind> Drop for InFlight<'_, K> {
    fn drop(&mut self) {
        self.page.leave();
    }
}
