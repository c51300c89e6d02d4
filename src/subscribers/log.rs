//! # LogWriter: events rendered through `tracing`
//!
//! The built-in logging sink. Install any `tracing` subscriber in the binary
//! and add `LogWriter` to [`SupervisorBuilder::with_subscribers`](crate::SupervisorBuilder::with_subscribers).
//!
//! ## Levels
//! - `RunnableExited` with an error → the error's [`Level`]
//! - `CloserFailed` → the error's [`Level`] (default `error`)
//! - `DrainTimedOut`, `SubscriberOverflow`, `SubscriberPanicked` → `warn`
//! - `ShutdownRequested`, `DrainStarted`, `DrainCompleted` → `info`
//! - everything else → `debug`
//!
//! ## Example output
//! ```text
//! INFO  runkit: shutdown requested signal="SIGTERM"
//! INFO  runkit: drain started timeout_ms=10000
//! ERROR runkit: closer failed runnable="db" error="Pool::close: internal error: broken pipe"
//! WARN  runkit: drain timed out timeout_ms=10000 stuck=["cache"]
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;
use crate::taxonomy::Level;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

macro_rules! at_level {
    ($level:expr, $($args:tt)+) => {
        match $level {
            Level::Error => tracing::error!(target: "runkit", $($args)+),
            Level::Warn => tracing::warn!(target: "runkit", $($args)+),
            Level::Info => tracing::info!(target: "runkit", $($args)+),
            Level::Debug => tracing::debug!(target: "runkit", $($args)+),
        }
    };
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let runnable = e.runnable.as_deref().unwrap_or("-");
        let reason = e.reason.as_deref().unwrap_or("");

        match e.kind {
            EventKind::RunnableStarting => {
                tracing::debug!(target: "runkit", runnable, "runnable starting");
            }
            EventKind::RunnableExited => match e.level {
                Some(level) => at_level!(level, runnable, error = reason, "runnable exited"),
                None => tracing::info!(target: "runkit", runnable, "runnable exited"),
            },
            EventKind::ShutdownRequested => {
                tracing::info!(target: "runkit", signal = reason, "shutdown requested");
            }
            EventKind::DrainStarted => {
                tracing::info!(target: "runkit", timeout_ms = e.timeout_ms, "drain started");
            }
            EventKind::CloserStopped => {
                tracing::debug!(target: "runkit", runnable, "closer stopped");
            }
            EventKind::CloserFailed => {
                at_level!(
                    e.level.unwrap_or_default(),
                    runnable,
                    error = reason,
                    "closer failed"
                );
            }
            EventKind::DrainCompleted => {
                tracing::info!(target: "runkit", "drain completed");
            }
            EventKind::DrainTimedOut => {
                tracing::warn!(
                    target: "runkit",
                    timeout_ms = e.timeout_ms,
                    stuck = ?e.stuck.as_deref().unwrap_or_default(),
                    "drain timed out"
                );
            }
            EventKind::SubscriberOverflow => {
                tracing::warn!(target: "runkit", subscriber = runnable, reason, "subscriber dropped event");
            }
            EventKind::SubscriberPanicked => {
                tracing::warn!(target: "runkit", subscriber = runnable, info = reason, "subscriber panicked");
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
