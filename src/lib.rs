//! # runkit
//!
//! **Runkit** is a process-lifecycle kernel for service binaries.
//!
//! It runs a set of independently blocking components (network listeners,
//! background workers) until the first one terminates or the process is asked
//! to stop, then releases every component's resources within a bounded time.
//! Alongside it ships a structured error taxonomy so that one error, wrapped
//! on its way up through the call layers, can be logged once at the boundary.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │   Runnable   │   │   Runnable   │   │   Runnable   │
//!     │ (+ Closer?)  │   │ (+ Closer?)  │   │ (+ Closer?)  │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Supervisor (process lifecycle)                                   │
//! │  - state: Idle → Running → Draining → Stopped                     │
//! │  - completion channel (first terminal event wins)                 │
//! │  - signal listener (SIGINT / SIGTERM)                             │
//! │  - runtime CancellationToken (child per runnable)                 │
//! └──────┬──────────────────────────────────────────────────┬────────┘
//!        │ publishes Events                                 │ drain
//!        ▼                                                  ▼
//! ┌──────────────────────────────┐        ┌──────────────────────────┐
//! │ Bus (broadcast channel)      │        │ JoinSet of closer tasks  │
//! └──────┬───────────────────────┘        │ bounded by close timeout │
//!        ▼                                └──────────────────────────┘
//!   subscriber listener ──► SubscriberSet ──► LogWriter (tracing), custom sinks
//! ```
//!
//! ### Lifecycle
//! ```text
//! register(Some(runnable)) ...
//! run()
//!   ├─► every runnable: run(token) ──┐
//!   ├─► signal listener ─────────────┼──► first terminal event
//!   │                                ▼
//!   ├─► cancel runtime token
//!   ├─► drain: every Closer concurrently, wait ≤ max(close_timeout, 10s)
//!   │       ├─ all returned ─► DrainCompleted
//!   │       └─ timeout      ─► DrainTimedOut { stuck }
//!   └─► return the first terminal event, unmodified
//! ```
//!
//! ## Features
//! | Area              | Description                                                        | Key types / traits                          |
//! |-------------------|--------------------------------------------------------------------|---------------------------------------------|
//! | **Supervision**   | Race runnables against OS signals, then drain closers.             | [`Supervisor`], [`SupervisorState`]         |
//! | **Components**    | Blocking entry point plus optional release capability.             | [`Runnable`], [`Closer`], [`RunnableFn`], [`CloserSet`] |
//! | **Errors**        | Classified, chain-walkable errors with kind and level.            | [`Error`], [`Kind`], [`Level`], [`RuntimeError`] |
//! | **Taxonomy**      | Kind → description, RPC code, HTTP status; trail and fields.       | [`Classification`], [`operation_trail`], [`collected_fields`] |
//! | **Subscriber API**| Hook into lifecycle events (logging, metrics, custom sinks).       | [`Subscribe`], [`LogWriter`]                |
//! | **Configuration** | Close timeout, bus capacity, environment lookup.                   | [`SupervisorConfig`], [`get_env`]           |
//!
//! ## Example
//! ```rust,no_run
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//! use runkit::{Error, LogWriter, RunnableFn, Subscribe, Supervisor, SupervisorConfig, report};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Error> {
//!     let cfg = SupervisorConfig::from_env()?;
//!     let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
//!     let mut sup = Supervisor::builder(cfg).with_subscribers(subs).build();
//!
//!     sup.register(Some(
//!         RunnableFn::new("http", |ctx: CancellationToken| async move {
//!             ctx.cancelled().await;
//!             Ok::<_, Error>(())
//!         })
//!         .with_close(|| async { Ok(()) })
//!         .into_arc(),
//!     ));
//!
//!     if let Err(err) = sup.run().await {
//!         report::log_error(&err);
//!         return Err(err);
//!     }
//!     Ok(())
//! }
//! ```
mod core;
mod env;
mod error;
mod events;
mod runnables;
mod subscribers;
pub mod taxonomy;

#[cfg(test)]
mod test_util;

// ---- Public re-exports ----

pub use self::core::{
    ENV_BUS_CAPACITY, ENV_CLOSE_TIMEOUT, MIN_CLOSE_TIMEOUT, Supervisor, SupervisorBuilder,
    SupervisorConfig, SupervisorState,
};
pub use env::get_env;
pub use error::RuntimeError;
pub use events::{Bus, Event, EventKind};
pub use runnables::{CloseFn, Closer, CloserSet, Runnable, RunnableFn, RunnableRef};
pub use subscribers::{LogWriter, Subscribe, SubscriberSet};
pub use taxonomy::{
    BoxError, Cause, Classification, Error, ErrorBuilder, Field, Kind, Level, Op,
    collected_fields, operation_trail, report,
};
