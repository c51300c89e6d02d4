//! Runtime core: orchestration and lifecycle.
//!
//! The public API from this module is [`Supervisor`] with its builder,
//! configuration and observable state.
//!
//! Internal modules:
//! - [`supervisor`]: registration, the run race, the close entry point;
//! - [`drain`]: bounded, concurrent invocation of every closer;
//! - [`state`]: lifecycle state machine;
//! - [`shutdown`]: cross-platform shutdown signal handling;
//! - [`builder`]: subscriber wiring;
//! - [`config`]: runtime settings.

mod builder;
mod config;
mod drain;
mod shutdown;
mod state;
mod supervisor;

pub use builder::SupervisorBuilder;
pub use config::{ENV_BUS_CAPACITY, ENV_CLOSE_TIMEOUT, MIN_CLOSE_TIMEOUT, SupervisorConfig};
pub use state::SupervisorState;
pub use supervisor::Supervisor;
