//! Progress reporting and cooperative cancellation.
//!
//! The engine never blocks on the caller: progress is pushed synchronously
//! through a [`ProgressSink`], and cancellation is polled from a
//! [`CancellationToken`] between units of work.

use std::sync::atomic::{AtomicBool, AtomicU8, AtomicUsize, Ordering};
use std::sync::Arc;

/// Receives progress updates. Percentages never decrease.
pub trait ProgressSink: Send + Sync {
    /// Called with a percentage in `0..=100` and an optional phase message.
    fn update(&self, percent: u8, message: Option<&str>);
}

/// Discards every update.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn update(&self, _percent: u8, _message: Option<&str>) {}
}

impl<F> ProgressSink for F
where
    F: Fn(u8, Option<&str>) + Send + Sync,
{
    fn update(&self, percent: u8, message: Option<&str>) {
        self(percent, message)
    }
}

/// Shared cancellation flag. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    /// A token that has not been cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation was requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Forwards to a sink, clamping updates so the reported percentage is monotonic.
pub struct Progress<'a> {
    sink: &'a dyn ProgressSink,
    current: AtomicU8,
}

impl<'a> Progress<'a> {
    /// Wrap a sink.
    pub fn new(sink: &'a dyn ProgressSink) -> Self {
        Self {
            sink,
            current: AtomicU8::new(0),
        }
    }

    /// Report `percent` (clamped to 100 and to the highest value seen so far).
    pub fn report(&self, percent: u8, message: Option<&str>) {
        let percent = percent.min(100);
        let previous = self.current.fetch_max(percent, Ordering::SeqCst);
        self.sink.update(previous.max(percent), message);
    }

    /// A counter spreading `steps` completions over `from..to`.
    #[must_use]
    pub fn span(&self, from: u8, to: u8, steps: usize) -> ProgressSpan<'_, 'a> {
        ProgressSpan {
            progress: self,
            from,
            to: to.max(from),
            steps,
            done: AtomicUsize::new(0),
        }
    }
}

/// A sub-range of the overall progress, advanced one step at a time.
/// Safe to advance from several threads.
pub struct ProgressSpan<'p, 'a> {
    progress: &'p Progress<'a>,
    from: u8,
    to: u8,
    steps: usize,
    done: AtomicUsize,
}

impl ProgressSpan<'_, '_> {
    /// Mark one step as done.
    pub fn step(&self) {
        let done = self.done.fetch_add(1, Ordering::Relaxed) + 1;
        let width = usize::from(self.to - self.from);
        let offset = if self.steps == 0 {
            width
        } else {
            (done.min(self.steps) * width) / self.steps
        };
        // offset <= width <= 100
        self.progress.report(self.from + offset as u8, None);
    }
}
