//! # Structured error taxonomy.
//!
//! Two orthogonal axes classify every failure:
//! - [`Kind`]: *what* went wrong; drives protocol status translation;
//! - [`Level`]: *how loudly* to surface it; drives logging only.
//!
//! Lower layers wrap what they receive in a new [`Error`] with their own
//! [`Op`] and [`Field`]s. The outermost boundary walks the chain once
//! ([`operation_trail`], [`collected_fields`]) and logs it ([`report::log_error`]).

mod builder;
mod chain;
mod error;
mod field;
mod kind;
mod level;
pub mod report;

pub use builder::{Empty, ErrorBuilder, Ready};
pub use chain::{Chain, collected_fields, operation_trail};
pub use error::{BoxError, Cause, Error};
pub use field::{Field, Op};
pub use kind::{Classification, Kind};
pub use level::Level;
