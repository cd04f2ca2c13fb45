//! Load progress fan-out.
//!
//! A single load may have several waiting callers, each with its own
//! callback. [`ProgressReporter`] delivers every update to all of them and
//! guarantees the values each one sees are in `[0, 1]` and never decrease.

use std::sync::{Arc, Mutex, PoisonError};

/// Callback receiving load progress as a ratio in `[0, 1]`.
pub type ProgressFn = Arc<dyn Fn(f64) + Send + Sync>;

#[derive(Default)]
struct State {
    last: f64,
    subscribers: Vec<ProgressFn>,
}

/// Cloneable handle that loaders report progress through.
#[derive(Clone, Default)]
pub struct ProgressReporter {
    state: Arc<Mutex<State>>,
}

impl std::fmt::Debug for ProgressReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressReporter")
            .field("last", &self.last())
            .finish_non_exhaustive()
    }
}

impl ProgressReporter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback. It immediately receives the current value so
    /// late subscribers start where the load already is.
    pub fn subscribe(&self, callback: ProgressFn) {
        let current = {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            state.subscribers.push(Arc::clone(&callback));
            state.last
        };
        callback(current);
    }

    /// Report progress. Values are clamped to `[0, 1]`; values below the
    /// last reported one are raised to it; NaN is ignored.
    pub fn report(&self, ratio: f64) {
        if ratio.is_nan() {
            return;
        }
        let (value, subscribers) = {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            state.last = ratio.clamp(0.0, 1.0).max(state.last);
            (state.last, state.subscribers.clone())
        };
        // Callbacks run outside the lock so they may call back into us.
        for callback in subscribers {
            callback(value);
        }
    }

    /// Report completion (`1.0`).
    pub fn finish(&self) {
        self.report(1.0);
    }

    /// Last reported value.
    #[must_use]
    pub fn last(&self) -> f64 {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn recorder() -> (ProgressFn, Arc<Mutex<Vec<f64>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let callback: ProgressFn = Arc::new(move |v| sink.lock().unwrap().push(v));
        (callback, seen)
    }

    #[test]
    fn values_are_clamped_and_monotonic() {
        let reporter = ProgressReporter::new();
        let (callback, seen) = recorder();
        reporter.subscribe(callback);
        for v in [0.2, 0.1, 1.5, f64::NAN, 0.5] {
            reporter.report(v);
        }
        assert_eq!(*seen.lock().unwrap(), vec![0.0, 0.2, 0.2, 1.0, 1.0]);
    }

    #[test]
    fn late_subscriber_starts_at_current_value() {
        let reporter = ProgressReporter::new();
        reporter.report(0.4);
        let (callback, seen) = recorder();
        reporter.subscribe(callback);
        reporter.finish();
        assert_eq!(*seen.lock().unwrap(), vec![0.4, 1.0]);
    }

    #[test]
    fn negative_values_clamp_to_zero() {
        let reporter = ProgressReporter::new();
        reporter.report(-3.0);
        assert!(reporter.last().abs() < f64::EPSILON);
    }
}
