//! Background generation with supersede semantics.
//!
//! Only the latest request matters: starting a new one aborts whatever is
//! still in flight, and a stale result is never published.

use crate::client::{Backend, CodeGenerator};
use crate::target::TargetLanguage;
use lvd_core::model::Project;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Latest state of the generator, as seen by watchers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GenerationStatus {
    #[default]
    Idle,
    Running { request: u64 },
    Done { request: u64, code: String },
}

impl GenerationStatus {
    pub fn code(&self) -> Option<&str> {
        match self {
            GenerationStatus::Done { code, .. } => Some(code),
            _ => None,
        }
    }
}

pub struct GenerationTask<B: Backend> {
    generator: Arc<CodeGenerator<B>>,
    status: Arc<watch::Sender<GenerationStatus>>,
    in_flight: Option<JoinHandle<()>>,
    next_request: u64,
}

impl<B: Backend> GenerationTask<B> {
    pub fn new(generator: CodeGenerator<B>) -> Self {
        let (status, _) = watch::channel(GenerationStatus::Idle);
        Self {
            generator: Arc::new(generator),
            status: Arc::new(status),
            in_flight: None,
            next_request: 0,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<GenerationStatus> {
        self.status.subscribe()
    }

    pub fn status(&self) -> GenerationStatus {
        self.status.borrow().clone()
    }

    /// Start generating for a snapshot of `project`, aborting any earlier
    /// request. Returns the new request id. Must be called inside a tokio
    /// runtime.
    pub fn spawn(&mut self, project: Arc<Project>, lang: TargetLanguage) -> u64 {
        self.cancel();
        self.next_request += 1;
        let request = self.next_request;
        self.status.send_replace(GenerationStatus::Running { request });

        let generator = Arc::clone(&self.generator);
        let status = Arc::clone(&self.status);
        self.in_flight = Some(tokio::spawn(async move {
            let code = generator.generate(&project, lang).await;
            status.send_if_modified(|current| match current {
                GenerationStatus::Running { request: r } if *r == request => {
                    *current = GenerationStatus::Done { request, code };
                    true
                }
                _ => {
                    log::debug!("dropping stale generation result #{request}");
                    false
                }
            });
        }));
        log::debug!("generation #{request} started ({lang})");
        request
    }

    /// Abort the in-flight request, if any. A finished result stays
    /// published; an unfinished one reverts the status to idle.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
        self.status.send_if_modified(|current| {
            if matches!(current, GenerationStatus::Running { .. }) {
                *current = GenerationStatus::Idle;
                true
            } else {
                false
            }
        });
    }

    /// Wait for the in-flight request to settle and return the published
    /// status.
    pub async fn join(&mut self) -> GenerationStatus {
        if let Some(handle) = self.in_flight.take()
            && let Err(e) = handle.await
            && !e.is_cancelled()
        {
            log::warn!("generation task panicked: {e}");
        }
        self.status()
    }
}

impl<B: Backend> Drop for GenerationTask<B> {
    fn drop(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }
}
