//! # Runtime events emitted by the supervisor.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Run events**: runnable lifecycle and the shutdown trigger
//! - **Drain events**: closer outcomes and the drain verdict
//! - **Subscriber events**: delivery problems inside the sink itself
//!
//! The [`Event`] struct carries metadata such as timestamps, runnable name,
//! reasons, severity and the drain timeout.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Use `seq` to restore the exact order when events are delivered out of order.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use runkit::{Event, EventKind, Level};
//!
//! let ev = Event::new(EventKind::RunnableExited)
//!     .with_runnable("http")
//!     .with_reason("address in use")
//!     .with_level(Level::Error);
//!
//! assert_eq!(ev.kind, EventKind::RunnableExited);
//! assert_eq!(ev.runnable.as_deref(), Some("http"));
//! assert_eq!(ev.reason.as_deref(), Some("address in use"));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

use crate::taxonomy::{Error, Level};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Run events ===
    /// A runnable's blocking entry point is about to be called.
    ///
    /// Sets:
    /// - `runnable`: runnable name
    RunnableStarting,

    /// A runnable's entry point returned (or panicked).
    ///
    /// Sets:
    /// - `runnable`: runnable name
    /// - `reason`: error message (only when it returned an error)
    /// - `level`: the error's level (only when it returned an error)
    RunnableExited,

    /// Shutdown requested (OS signal observed).
    ///
    /// Sets:
    /// - `reason`: signal name
    ShutdownRequested,

    // === Drain events ===
    /// Drain began; closers are being invoked.
    ///
    /// Sets:
    /// - `timeout_ms`: effective (floored) close timeout
    DrainStarted,

    /// A closer returned `Ok`.
    ///
    /// Sets:
    /// - `runnable`: owning runnable name
    CloserStopped,

    /// A closer returned an error or panicked.
    ///
    /// Sets:
    /// - `runnable`: owning runnable name
    /// - `reason`: failure message
    /// - `level`: the error's level
    CloserFailed,

    /// Every closer returned within the close timeout.
    DrainCompleted,

    /// Close timeout elapsed before every closer returned.
    ///
    /// Sets:
    /// - `timeout_ms`: effective close timeout
    /// - `stuck`: names of closers still running
    DrainTimedOut,

    // === Subscriber events ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `runnable`: subscriber name
    /// - `reason`: panic info/message
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `runnable`: subscriber name
    /// - `reason`: reason string (e.g., "full", "closed")
    SubscriberOverflow,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Name of the runnable (or subscriber), if applicable.
    pub runnable: Option<Arc<str>>,
    /// Human-readable reason (errors, signal names, overflow details).
    pub reason: Option<Arc<str>>,
    /// Severity of the error behind `reason`.
    pub level: Option<Level>,
    /// Close timeout in milliseconds (compact).
    pub timeout_ms: Option<u32>,
    /// Closers still running when drain gave up.
    pub stuck: Option<Arc<[String]>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            runnable: None,
            reason: None,
            level: None,
            timeout_ms: None,
            stuck: None,
        }
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches a runnable name.
    #[inline]
    pub fn with_runnable(mut self, name: impl Into<Arc<str>>) -> Self {
        self.runnable = Some(name.into());
        self
    }

    #[inline]
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = Some(level);
        self
    }

    /// Attaches message and level of a classified error.
    #[inline]
    pub fn with_error(self, err: &Error) -> Self {
        self.with_reason(err.to_string()).with_level(err.level())
    }

    /// Attaches a timeout duration (stored as milliseconds).
    #[inline]
    pub fn with_timeout(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.timeout_ms = Some(ms);
        self
    }

    #[inline]
    pub fn with_stuck(mut self, stuck: Vec<String>) -> Self {
        self.stuck = Some(stuck.into());
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_runnable(subscriber)
            .with_reason(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_runnable(subscriber)
            .with_reason(info)
    }

    #[inline]
    pub fn is_subscriber_overflow(&self) -> bool {
        matches!(self.kind, EventKind::SubscriberOverflow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_is_monotonic() {
        let a = Event::new(EventKind::DrainStarted);
        let b = Event::new(EventKind::DrainCompleted);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_timeout_saturates() {
        let ev = Event::new(EventKind::DrainTimedOut).with_timeout(Duration::from_secs(u64::MAX));
        assert_eq!(ev.timeout_ms, Some(u32::MAX));
    }

    #[test]
    fn test_with_error_copies_level() {
        let err = Error::builder().level(Level::Warn).cause("slow disk").build();
        let ev = Event::new(EventKind::CloserFailed).with_error(&err);
        assert_eq!(ev.level, Some(Level::Warn));
        assert_eq!(ev.reason.as_deref(), Some("slow disk"));
    }
}
