//! # Runnable components and their release capabilities.
//!
//! - [`Runnable`]: blocking entry point, optionally exposing a [`Closer`]
//! - [`RunnableFn`] / [`CloseFn`]: closure-backed implementations
//! - [`CloserSet`]: ordered group of closers that closes as one

mod closers;
mod runnable;
mod runnable_fn;

pub use closers::CloserSet;
pub use runnable::{Closer, Runnable, RunnableRef};
pub use runnable_fn::{CloseFn, RunnableFn};
