//! Runtime conditions raised by the supervisor itself.
//!
//! [`RuntimeError`] is the leaf of a chain: the supervisor never returns it
//! bare but wraps it in a classified [`Error`](crate::Error) with op
//! `"Supervisor::run"`, so callers see one error type everywhere. Reach the
//! leaf with [`Error::opaque_cause`](crate::Error::opaque_cause) and
//! `downcast_ref::<RuntimeError>()`.

use thiserror::Error;

use crate::taxonomy::{Error as Classified, Kind, Level};

pub(crate) const OP_RUN: &str = "Supervisor::run";

/// # Errors produced by the runkit supervisor.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// `run` was called with nothing registered.
    #[error("no runnables registered")]
    NoRunnables,

    /// `run` was called on a supervisor that already left `Idle`.
    #[error("supervisor already started")]
    AlreadyStarted,

    /// The process received an interrupt/termination request.
    #[error("terminated by signal {signal}")]
    Terminated {
        /// Signal name, e.g. `SIGTERM`.
        signal: &'static str,
    },

    /// Signal handlers could not be installed.
    #[error("failed to listen for shutdown signals: {0}")]
    SignalListener(#[from] std::io::Error),

    /// A runnable panicked instead of returning.
    #[error("runnable '{name}' panicked: {info}")]
    RunnablePanicked {
        /// Registered name of the runnable.
        name: String,
        /// Panic payload, if it was a string.
        info: String,
    },
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use runkit::RuntimeError;
    ///
    /// assert_eq!(RuntimeError::NoRunnables.as_label(), "runtime_no_runnables");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::NoRunnables => "runtime_no_runnables",
            RuntimeError::AlreadyStarted => "runtime_already_started",
            RuntimeError::Terminated { .. } => "runtime_terminated",
            RuntimeError::SignalListener(_) => "runtime_signal_listener",
            RuntimeError::RunnablePanicked { .. } => "runtime_runnable_panicked",
        }
    }

    /// Kind and level under which the supervisor reports this condition.
    pub fn classification(&self) -> (Kind, Level) {
        match self {
            RuntimeError::NoRunnables | RuntimeError::AlreadyStarted => {
                (Kind::Invalid, Level::Error)
            }
            RuntimeError::Terminated { .. } => (Kind::Unknown, Level::Info),
            RuntimeError::SignalListener(_) | RuntimeError::RunnablePanicked { .. } => {
                (Kind::Internal, Level::Error)
            }
        }
    }

    /// Wraps this condition in a classified error labelled with `op`.
    pub(crate) fn into_classified(self, op: &'static str) -> Classified {
        let (kind, level) = self.classification();
        let builder = Classified::builder().op(op).kind(kind).level(level);
        let builder = match &self {
            RuntimeError::Terminated { signal } => builder.field("signal", signal),
            RuntimeError::RunnablePanicked { name, .. } => builder.field("runnable", name),
            _ => builder,
        };
        builder.cause(self).build()
    }
}
