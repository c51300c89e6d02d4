//! # Event subscribers: the supervisor's logging sink.
//!
//! The supervisor never logs on its own. It publishes [`Event`](crate::Event)s
//! on the bus and whatever subscribers the caller supplied decide what to do
//! with them.
//!
//! ```text
//! Supervisor ── publish(Event) ──► Bus ──► listener ──► SubscriberSet
//!                                                          │
//!                                          ┌───────────────┼───────────┐
//!                                          ▼               ▼           ▼
//!                                      LogWriter        Metrics     Custom
//!                                     (tracing)
//! ```
//!
//! - [`Subscribe`]: the extension trait
//! - [`SubscriberSet`]: per-subscriber queues and workers
//! - [`LogWriter`]: built-in `tracing` sink

mod log;
mod set;
mod subscribe;

pub use log::LogWriter;
pub use set::SubscriberSet;
pub(crate) use set::panic_message;
pub use subscribe::Subscribe;
