//! # Function-backed runnables and closers.
//!
//! [`RunnableFn`] wraps a closure `F: Fn(CancellationToken) -> Fut`, producing a
//! fresh future per call, with an optional release capability attached via
//! [`RunnableFn::with_close`] or [`RunnableFn::with_closer`].
//!
//! ## Example
//! ```rust
//! use tokio_util::sync::CancellationToken;
//! use runkit::{Error, RunnableFn, RunnableRef};
//!
//! let worker: RunnableRef = RunnableFn::new("worker", |ctx: CancellationToken| async move {
//!     ctx.cancelled().await;
//!     Ok::<_, Error>(())
//! })
//! .with_close(|| async { Ok(()) })
//! .into_arc();
//!
//! assert_eq!(worker.name(), "worker");
//! assert!(worker.as_closer().is_some());
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::runnable::{Closer, Runnable};
use crate::taxonomy::Error;

/// Closure-backed [`Closer`].
pub struct CloseFn<F>(F);

impl<F> CloseFn<F> {
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait]
impl<F, Fut> Closer for CloseFn<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), Error>> + Send,
{
    async fn close(&self) -> Result<(), Error> {
        (self.0)().await
    }
}

/// Closure-backed [`Runnable`].
pub struct RunnableFn<F> {
    name: Cow<'static, str>,
    run: F,
    close: Option<Arc<dyn Closer>>,
}

impl<F> RunnableFn<F> {
    /// Creates a runnable without a release capability.
    pub fn new(name: impl Into<Cow<'static, str>>, run: F) -> Self {
        Self {
            name: name.into(),
            run,
            close: None,
        }
    }

    /// Attaches a closure as the release capability.
    pub fn with_close<C, CFut>(self, close: C) -> Self
    where
        C: Fn() -> CFut + Send + Sync + 'static,
        CFut: Future<Output = Result<(), Error>> + Send + 'static,
    {
        self.with_closer(Arc::new(CloseFn::new(close)))
    }

    /// Attaches an existing closer (e.g. a [`CloserSet`](crate::CloserSet)).
    pub fn with_closer(mut self, closer: Arc<dyn Closer>) -> Self {
        self.close = Some(closer);
        self
    }

    /// Wraps the runnable in an `Arc`, ready for registration.
    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }
}

#[async_trait]
impl<F, Fut> Runnable for RunnableFn<F>
where
    F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), Error>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, ctx: CancellationToken) -> Result<(), Error> {
        (self.run)(ctx).await
    }

    fn as_closer(&self) -> Option<&dyn Closer> {
        self.close.as_deref()
    }
}
