//! Backend acquisition for renderers whose generator is loaded lazily.
//!
//! A `BackendLoader` walks an ordered list of sources. Each attempt is bounded by a
//! timeout and each source gets a bounded number of attempts with exponential
//! backoff. The outcome is a typed `Acquired` value consumed once at the start of an
//! export, so the renderers themselves never retry.
//!
//! A ready backend is kept for the life of the process. A failure is handed to every
//! caller that was already waiting on the same acquisition, then forgotten.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::render::docx::{DocxPackager, ZipPackager};
use crate::render::RenderError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AcquireError {
    #[error("{name} did not respond within {timeout_ms}ms")]
    TimedOut { name: String, timeout_ms: u64 },

    #[error("{name} failed to load: {reason}")]
    LoadFailed { name: String, reason: String },

    #[error("no backend sources configured")]
    NoSources,
}

/// Result of one acquisition.
pub enum Acquired<T: ?Sized> {
    Ready(Arc<T>),
    Failed(String),
}

impl<T: ?Sized> Acquired<T> {
    /// Converts a failure into the user-facing "library unavailable" error.
    pub fn into_result(self, what: &str) -> Result<Arc<T>, RenderError> {
        match self {
            Acquired::Ready(backend) => Ok(backend),
            Acquired::Failed(reason) => Err(RenderError::LibraryUnavailable(
                unavailable_message(what, &reason),
            )),
        }
    }
}

#[cfg(test)]
impl<T: ?Sized> Acquired<T> {
    fn is_ready(&self) -> bool {
        matches!(self, Acquired::Ready(_))
    }
}

/// Names the usual causes and what the user can do about them.
pub fn unavailable_message(what: &str, reason: &str) -> String {
    format!(
        "The {what} generator could not be loaded ({reason}). This is usually caused by a \
         network problem or a content blocker such as an ad-blocker. Check your connection \
         or allow the resource, then try the export again."
    )
}

#[async_trait]
pub trait BackendSource<T: ?Sized + Send + Sync>: Send + Sync {
    fn name(&self) -> &str;

    async fn load(&self) -> Result<Arc<T>, AcquireError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcquirePolicy {
    pub attempt_timeout: Duration,
    pub attempts_per_source: u32,
    pub base_backoff: Duration,
}

impl AcquirePolicy {
    pub fn new(attempt_timeout: Duration, attempts_per_source: u32) -> Self {
        Self {
            attempt_timeout,
            attempts_per_source: attempts_per_source.max(1),
            base_backoff: Duration::from_millis(100),
        }
    }

    /// Delay before retry number `retry` (zero-based): 100ms, 200ms, 400ms, ...
    pub fn backoff(&self, retry: u32) -> Duration {
        self.base_backoff * 2u32.saturating_pow(retry.min(16))
    }
}

pub struct BackendLoader<T: ?Sized + Send + Sync> {
    what: &'static str,
    sources: Vec<Arc<dyn BackendSource<T>>>,
    policy: AcquirePolicy,
    slot: Mutex<Slot<T>>,
    /// Bumped under the slot lock each time an acquisition finishes.
    generation: AtomicU64,
}

struct Slot<T: ?Sized> {
    ready: Option<Arc<T>>,
    last_failure: Option<String>,
}

impl<T: ?Sized + Send + Sync> BackendLoader<T> {
    pub fn new(
        what: &'static str,
        sources: Vec<Arc<dyn BackendSource<T>>>,
        policy: AcquirePolicy,
    ) -> Self {
        Self {
            what,
            sources,
            policy,
            slot: Mutex::new(Slot {
                ready: None,
                last_failure: None,
            }),
            generation: AtomicU64::new(0),
        }
    }

    pub fn what(&self) -> &'static str {
        self.what
    }

    pub async fn acquire(&self) -> Acquired<T> {
        let seen = self.generation.load(Ordering::Acquire);
        let mut slot = self.slot.lock().await;

        if let Some(backend) = &slot.ready {
            return Acquired::Ready(Arc::clone(backend));
        }
        // Someone else finished an attempt while we waited for the lock.
        if self.generation.load(Ordering::Acquire) != seen {
            if let Some(reason) = &slot.last_failure {
                return Acquired::Failed(reason.clone());
            }
        }

        let outcome = self.run_sources().await;
        let acquired = match outcome {
            Ok(backend) => {
                slot.ready = Some(Arc::clone(&backend));
                slot.last_failure = None;
                Acquired::Ready(backend)
            }
            Err(err) => {
                let reason = err.to_string();
                slot.last_failure = Some(reason.clone());
                Acquired::Failed(reason)
            }
        };
        self.generation.fetch_add(1, Ordering::Release);
        acquired
    }

    async fn run_sources(&self) -> Result<Arc<T>, AcquireError> {
        let mut last_error = AcquireError::NoSources;
        for source in &self.sources {
            for attempt in 0..self.policy.attempts_per_source {
                if attempt > 0 {
                    tokio::time::sleep(self.policy.backoff(attempt - 1)).await;
                }
                let result = tokio::time::timeout(self.policy.attempt_timeout, source.load())
                    .await
                    .unwrap_or_else(|_| {
                        Err(AcquireError::TimedOut {
                            name: source.name().to_string(),
                            timeout_ms: self.policy.attempt_timeout.as_millis() as u64,
                        })
                    });
                match result {
                    Ok(backend) => {
                        debug!(backend = self.what, source = source.name(), attempt, "Backend acquired");
                        return Ok(backend);
                    }
                    Err(err) => {
                        warn!(
                            backend = self.what,
                            source = source.name(),
                            attempt,
                            error = %err,
                            "Backend acquisition attempt failed"
                        );
                        last_error = err;
                    }
                }
            }
        }
        Err(last_error)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// DOCX sources
// ────────────────────────────────────────────────────────────────────────────

/// The in-process ZIP packager. Always available once the binary is running.
pub struct BundledZipSource;

#[async_trait]
impl BackendSource<dyn DocxPackager> for BundledZipSource {
    fn name(&self) -> &str {
        "bundled-zip"
    }

    async fn load(&self) -> Result<Arc<dyn DocxPackager>, AcquireError> {
        Ok(Arc::new(ZipPackager))
    }
}

pub fn docx_loader(policy: AcquirePolicy) -> BackendLoader<dyn DocxPackager> {
    let sources: Vec<Arc<dyn BackendSource<dyn DocxPackager>>> = vec![Arc::new(BundledZipSource)];
    BackendLoader::new("DOCX", sources, policy)
}
