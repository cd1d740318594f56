//! Timing hook for top-level operations.
//!
//! Scoring functions never log or time themselves; callers that want
//! instrumentation hand an [`Observer`] to [`Evaluator`](crate::Evaluator).

use std::time::{Duration, Instant};

use tracing::info;

/// Receives the name and wall time of each completed operation.
pub trait Observer: Send + Sync {
    fn record(&self, operation: &str, elapsed: Duration);
}

impl<F> Observer for F
where
    F: Fn(&str, Duration) + Send + Sync,
{
    fn record(&self, operation: &str, elapsed: Duration) {
        self(operation, elapsed)
    }
}

/// Logs every operation at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl Observer for TracingObserver {
    fn record(&self, operation: &str, elapsed: Duration) {
        info!(
            operation,
            elapsed_secs = elapsed.as_secs_f64(),
            "Elapsed time for {}: {:.4} seconds",
            operation,
            elapsed.as_secs_f64()
        );
    }
}

/// Runs `f` and reports its duration to `observer`, if any.
pub fn timed<T>(observer: Option<&dyn Observer>, operation: &str, f: impl FnOnce() -> T) -> T {
    let Some(observer) = observer else {
        return f();
    };
    let start = Instant::now();
    let out = f();
    observer.record(operation, start.elapsed());
    out
}
