//! Single-flight engine acquisition.
//!
//! [`EngineHandle`] owns at most one engine. The first [`acquire`] starts
//! the load; callers arriving while it is in flight await the same shared
//! future. A failed load is handed to every caller awaiting it and leaves
//! the handle ready for a fresh attempt.
//!
//! [`acquire`]: EngineHandle::acquire

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use serde::{Deserialize, Serialize};

use crate::engine::{EngineLoader, LoadedEngine};
use crate::error::EngineError;
use crate::progress::{ProgressFn, ProgressReporter};

/// Observable lifecycle of an [`EngineHandle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineState {
    Unloaded,
    Loading,
    Ready,
    Error,
}

type LoadOutcome<E> = Result<Arc<LoadedEngine<E>>, EngineError>;
type PendingLoad<E> = Shared<BoxFuture<'static, LoadOutcome<E>>>;

enum Slot<E> {
    Unloaded,
    Loading {
        attempt: u64,
        load: PendingLoad<E>,
        progress: ProgressReporter,
    },
    Ready(Arc<LoadedEngine<E>>),
    Failed(EngineError),
}

struct Inner<E> {
    slot: Slot<E>,
    attempts: u64,
}

/// Shared handle to a lazily loaded engine.
pub struct EngineHandle<L: EngineLoader> {
    loader: Arc<L>,
    inner: Mutex<Inner<L::Engine>>,
}

impl<L: EngineLoader> EngineHandle<L> {
    #[must_use]
    pub fn new(loader: L) -> Self {
        Self {
            loader: Arc::new(loader),
            inner: Mutex::new(Inner {
                slot: Slot::Unloaded,
                attempts: 0,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<L::Engine>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> EngineState {
        match self.lock().slot {
            Slot::Unloaded => EngineState::Unloaded,
            Slot::Loading { .. } => EngineState::Loading,
            Slot::Ready(_) => EngineState::Ready,
            Slot::Failed(_) => EngineState::Error,
        }
    }

    /// Error of the most recent failed load, while no retry has started.
    #[must_use]
    pub fn last_error(&self) -> Option<EngineError> {
        match &self.lock().slot {
            Slot::Failed(e) => Some(e.clone()),
            _ => None,
        }
    }

    /// Number of load attempts started so far.
    #[must_use]
    pub fn attempts(&self) -> u64 {
        self.lock().attempts
    }

    /// Return the ready engine, loading it first if needed.
    ///
    /// `on_progress` receives non-decreasing values in `[0, 1]`; an
    /// already-ready engine reports `1.0` once.
    ///
    /// # Errors
    ///
    /// Returns the load attempt's error. The next call starts a new attempt.
    pub async fn acquire(
        &self,
        on_progress: Option<ProgressFn>,
    ) -> Result<Arc<LoadedEngine<L::Engine>>, EngineError> {
        let (attempt, load) = {
            let mut inner = self.lock();
            match &inner.slot {
                Slot::Ready(engine) => {
                    let engine = Arc::clone(engine);
                    drop(inner);
                    if let Some(callback) = on_progress {
                        callback(1.0);
                    }
                    return Ok(engine);
                }
                Slot::Loading {
                    attempt,
                    load,
                    progress,
                } => {
                    tracing::debug!(attempt, "joining in-flight engine load");
                    let joined = (*attempt, load.clone());
                    let progress = progress.clone();
                    drop(inner);
                    if let Some(callback) = on_progress {
                        progress.subscribe(callback);
                    }
                    joined
                }
                Slot::Unloaded | Slot::Failed(_) => {
                    inner.attempts += 1;
                    let attempt = inner.attempts;
                    let progress = ProgressReporter::new();
                    if let Some(callback) = on_progress {
                        progress.subscribe(callback);
                    }
                    let load = self.start_load(attempt, progress.clone());
                    inner.slot = Slot::Loading {
                        attempt,
                        load: load.clone(),
                        progress,
                    };
                    (attempt, load)
                }
            }
        };

        let outcome = load.await;
        self.settle(attempt, &outcome);
        outcome
    }

    fn start_load(&self, attempt: u64, progress: ProgressReporter) -> PendingLoad<L::Engine> {
        tracing::info!(attempt, "loading video engine");
        let loader = Arc::clone(&self.loader);
        async move {
            let engine = loader.load(&progress).await?;
            progress.finish();
            Ok(Arc::new(LoadedEngine::new(engine)))
        }
        .boxed()
        .shared()
    }

    /// Record the outcome of `attempt`, unless the slot has moved on.
    fn settle(&self, attempt: u64, outcome: &LoadOutcome<L::Engine>) {
        let mut inner = self.lock();
        let current = matches!(inner.slot, Slot::Loading { attempt: a, .. } if a == attempt);
        if !current {
            return;
        }
        inner.slot = match outcome {
            Ok(engine) => {
                tracing::info!(attempt, "video engine ready");
                Slot::Ready(Arc::clone(engine))
            }
            Err(e) => {
                tracing::warn!(attempt, error = %e, "video engine load failed");
                Slot::Failed(e.clone())
            }
        };
    }
}

impl<L: EngineLoader> std::fmt::Debug for EngineHandle<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineHandle")
            .field("state", &self.state())
            .field("attempts", &self.attempts())
            .finish_non_exhaustive()
    }
}
