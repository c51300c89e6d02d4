//! # Supervisor lifecycle state.
//!
//! ```text
//! Idle ──run()──► Running ──first terminal event──► Draining ──► Stopped
//!   └──────────────────close()──────────────────────────┘
//! ```
//!
//! Transitions are compare-and-swap on an [`AtomicU8`], so two callers racing
//! into drain cannot both win.

use std::sync::atomic::{AtomicU8, Ordering};

/// Observable lifecycle phase of a [`Supervisor`](crate::Supervisor).
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SupervisorState {
    /// Constructed; runnables may be registered.
    Idle = 0,
    /// `run` was called and the race is undecided.
    Running = 1,
    /// Closers are being invoked.
    Draining = 2,
    /// Drain finished (or timed out). Terminal.
    Stopped = 3,
}

impl SupervisorState {
    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => SupervisorState::Idle,
            1 => SupervisorState::Running,
            2 => SupervisorState::Draining,
            _ => SupervisorState::Stopped,
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            SupervisorState::Idle => "idle",
            SupervisorState::Running => "running",
            SupervisorState::Draining => "draining",
            SupervisorState::Stopped => "stopped",
        }
    }
}

/// Atomic holder for [`SupervisorState`].
#[derive(Debug)]
pub(super) struct StateCell(AtomicU8);

impl StateCell {
    pub(super) fn new() -> Self {
        Self(AtomicU8::new(SupervisorState::Idle as u8))
    }

    pub(super) fn get(&self) -> SupervisorState {
        SupervisorState::from_u8(self.0.load(Ordering::Acquire))
    }

    pub(super) fn set(&self, state: SupervisorState) {
        self.0.store(state as u8, Ordering::Release);
    }

    /// Moves `from → to`; false if the current state is not `from`.
    pub(super) fn transition(&self, from: SupervisorState, to: SupervisorState) -> bool {
        self.0
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Enters `Draining` from `Idle` or `Running`. Only one caller ever gets `true`.
    pub(super) fn begin_drain(&self) -> bool {
        self.transition(SupervisorState::Running, SupervisorState::Draining)
            || self.transition(SupervisorState::Idle, SupervisorState::Draining)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_is_entered_once() {
        let cell = StateCell::new();
        assert!(cell.transition(SupervisorState::Idle, SupervisorState::Running));
        assert!(cell.begin_drain());
        assert!(!cell.begin_drain());
        assert_eq!(cell.get(), SupervisorState::Draining);

        cell.set(SupervisorState::Stopped);
        assert!(!cell.begin_drain());
        assert_eq!(cell.get().as_label(), "stopped");
    }

    #[test]
    fn test_drain_from_idle() {
        let cell = StateCell::new();
        assert!(cell.begin_drain());
        assert!(!cell.transition(SupervisorState::Idle, SupervisorState::Running));
    }
}
