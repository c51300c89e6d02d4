//! # Runnable and Closer capabilities.
//!
//! A [`Runnable`] has one blocking entry point that returns when the component
//! terminates or fails. A component that also owns resources exposes a
//! [`Closer`] through [`Runnable::as_closer`]; the supervisor calls it exactly
//! once, during drain.
//!
//! The [`CancellationToken`] passed to `run` is cancelled once the supervisor
//! has decided to stop. It is a request: a runnable that ignores it keeps
//! running until the process exits.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::taxonomy::Error;

/// Shared handle to a registered runnable.
pub type RunnableRef = Arc<dyn Runnable>;

/// Bounded release of the resources a component owns.
///
/// Implementations must tolerate being called on a partially initialized
/// component and must not panic.
#[async_trait]
pub trait Closer: Send + Sync {
    async fn close(&self) -> Result<(), Error>;
}

/// # Component with a blocking entry point.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use tokio_util::sync::CancellationToken;
/// use runkit::{Closer, Error, Runnable};
///
/// struct Listener;
///
/// #[async_trait]
/// impl Runnable for Listener {
///     fn name(&self) -> &str { "listener" }
///
///     async fn run(&self, ctx: CancellationToken) -> Result<(), Error> {
///         ctx.cancelled().await;
///         Ok(())
///     }
///
///     fn as_closer(&self) -> Option<&dyn Closer> { Some(self) }
/// }
///
/// #[async_trait]
/// impl Closer for Listener {
///     async fn close(&self) -> Result<(), Error> { Ok(()) }
/// }
/// ```
#[async_trait]
pub trait Runnable: Send + Sync + 'static {
    /// Stable, human-readable name used in events.
    fn name(&self) -> &str;

    /// Runs until the component terminates (`Ok`) or fails (`Err`).
    async fn run(&self, ctx: CancellationToken) -> Result<(), Error>;

    /// The release capability, if this component has one.
    fn as_closer(&self) -> Option<&dyn Closer> {
        None
    }
}
