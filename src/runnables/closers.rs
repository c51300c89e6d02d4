//! # CloserSet: auxiliary resources owned by one component.
//!
//! An adapter (an HTTP listener, an RPC server) usually owns more than its
//! socket: client pools, caches, file handles. It collects them in a
//! [`CloserSet`] and exposes the set as its [`Closer`].
//!
//! ## Rules
//! - Members are closed **sequentially**, in insertion order.
//! - A failing member never stops the remaining ones.
//! - Failures are aggregated into one `Internal` error: fields list every
//!   failed member (`closer`, `error`), the cause is the first failure so the
//!   operation trail continues through it.

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use super::{runnable::Closer, runnable_fn::CloseFn};
use crate::taxonomy::{Error, Kind};

const OP_CLOSE: &str = "CloserSet::close";

/// Ordered collection of named closers that closes as one.
///
/// # Example
/// ```
/// use runkit::{Closer, CloserSet, Error};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let mut set = CloserSet::new();
/// set.add_fn("pool", || async { Ok(()) });
/// set.add_fn("cache", || async { Err(Error::builder().op("Cache::flush").build()) });
///
/// let err = set.close().await.unwrap_err();
/// assert_eq!(err.operation_trail()[1].as_str(), "Cache::flush");
/// # }
/// ```
#[derive(Default)]
pub struct CloserSet {
    closers: Vec<(Cow<'static, str>, Arc<dyn Closer>)>,
}

impl CloserSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a closer.
    pub fn add(&mut self, name: impl Into<Cow<'static, str>>, closer: Arc<dyn Closer>) {
        self.closers.push((name.into(), closer));
    }

    /// Appends a closure as a closer.
    pub fn add_fn<C, Fut>(&mut self, name: impl Into<Cow<'static, str>>, close: C)
    where
        C: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), Error>> + Send + 'static,
    {
        self.add(name, Arc::new(CloseFn::new(close)));
    }

    pub fn len(&self) -> usize {
        self.closers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closers.is_empty()
    }
}

#[async_trait]
impl Closer for CloserSet {
    async fn close(&self) -> Result<(), Error> {
        let mut failures = Vec::new();
        for (name, closer) in &self.closers {
            if let Err(err) = closer.close().await {
                failures.push((name, err));
            }
        }

        let mut failures = failures.into_iter();
        let Some((first_name, first_err)) = failures.next() else {
            return Ok(());
        };

        let mut builder = Error::builder()
            .op(OP_CLOSE)
            .kind(Kind::Internal)
            .field("closer", first_name)
            .field("error", &first_err);
        for (name, err) in failures {
            builder = builder.field("closer", name).field("error", err);
        }
        Err(builder.cause(first_err).build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn failing(op: &'static str) -> impl Fn() -> std::future::Ready<Result<(), Error>> {
        move || std::future::ready(Err(Error::builder().op(op).build()))
    }

    #[tokio::test]
    async fn test_empty_set_closes_cleanly() {
        assert!(CloserSet::new().close().await.is_ok());
    }

    #[tokio::test]
    async fn test_members_close_in_order_despite_failures() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let mut set = CloserSet::new();
        for name in ["a", "b", "c"] {
            let order = Arc::clone(&order);
            set.add_fn(name, move || {
                let order = Arc::clone(&order);
                async move {
                    order.lock().expect("lock").push(name);
                    if name == "b" {
                        Err(Error::builder().op("b::close").build())
                    } else {
                        Ok(())
                    }
                }
            });
        }

        let err = set.close().await.expect_err("b fails");
        assert_eq!(*order.lock().expect("lock"), ["a", "b", "c"]);
        assert_eq!(err.kind(), Kind::Internal);
        assert_eq!(err.fields()[0].value, "b");
    }

    #[tokio::test]
    async fn test_every_failure_is_listed_and_first_is_cause() {
        let mut set = CloserSet::new();
        set.add_fn("first", failing("first::close"));
        set.add_fn("second", failing("second::close"));
        assert_eq!(set.len(), 2);

        let err = set.close().await.expect_err("both fail");
        let closers: Vec<&str> = err
            .fields()
            .iter()
            .filter(|f| f.key == "closer")
            .map(|f| f.value.as_str())
            .collect();
        assert_eq!(closers, ["first", "second"]);

        let trail: Vec<String> = err.operation_trail().iter().map(|op| op.to_string()).collect();
        assert_eq!(trail, ["CloserSet::close", "first::close"]);
    }
}
