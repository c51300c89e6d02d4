//! # Supervisor: races runnables against OS signals, then drains.
//!
//! The [`Supervisor`] owns the registered runnables, the event [`Bus`] and the
//! runtime [`CancellationToken`]. [`Supervisor::run`] is the single blocking
//! entry point of a service process.
//!
//! ## High-level architecture
//! ```text
//! register(runnable) ×N  (Idle)
//!
//! run():
//!   ├─ empty set → Err(NoRunnables)          (state stays Idle)
//!   ├─ Idle → Running
//!   ├─ spawn per runnable:
//!   │     publish(RunnableStarting)
//!   │     run(child token) under catch_unwind
//!   │     publish(RunnableExited) ──► tx.send(result)
//!   ├─ spawn signal listener:
//!   │     SIGINT/SIGTERM ─► publish(ShutdownRequested) ──► tx.send(Err(Terminated))
//!   │
//!   ├─ first = rx.recv()                      (the race)
//!   ├─ runtime_token.cancel()                 (request, never a force)
//!   ├─ close() ─► drain(floored close timeout)
//!   └─ return first, unmodified
//! ```
//!
//! ## Rules
//! - The first terminal event wins; later results are discarded.
//! - When several runnables fail at nearly the same instant, which one is
//!   returned is nondeterministic.
//! - Runnables that ignore their token are left running (orphaned) until the
//!   process exits; the supervisor never waits for them.
//! - Drain outcomes are published as events and never alter the returned value.
//! - Drain runs at most once, whether reached via `run` or `close`. Every
//!   caller returns only after that single drain is over.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//! use runkit::{Error, Kind, RunnableFn, Supervisor, SupervisorConfig};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let mut sup = Supervisor::new(SupervisorConfig::default());
//!
//!     sup.register(Some(
//!         RunnableFn::new("listener", |ctx: CancellationToken| async move {
//!             ctx.cancelled().await;
//!             Ok::<_, Error>(())
//!         })
//!         .into_arc(),
//!     ));
//!     sup.register(Some(
//!         RunnableFn::new("migrator", |_ctx: CancellationToken| async {
//!             tokio::time::sleep(Duration::from_millis(10)).await;
//!             Err::<(), _>(Error::builder().op("Migrator::run").kind(Kind::Internal).build())
//!         })
//!         .into_arc(),
//!     ));
//!
//!     let err = sup.run().await.unwrap_err();
//!     assert_eq!(err.op().map(|op| op.as_str()), Some("Migrator::run"));
//! }
//! ```

use std::panic::AssertUnwindSafe;
use std::sync::Mutex;

use futures::FutureExt;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::{
    builder::SupervisorBuilder,
    config::SupervisorConfig,
    drain::drain,
    shutdown,
    state::{StateCell, SupervisorState},
};
use crate::error::{OP_RUN, RuntimeError};
use crate::events::{Bus, Event, EventKind};
use crate::runnables::RunnableRef;
use crate::subscribers::panic_message;
use crate::taxonomy::Error;

type Completion = mpsc::UnboundedSender<Result<(), Error>>;

/// Process-lifecycle supervisor for a set of blocking runnables.
pub struct Supervisor {
    cfg: SupervisorConfig,
    bus: Bus,
    runnables: Vec<RunnableRef>,
    state: StateCell,
    runtime_token: CancellationToken,
    /// Cancelled once drain has finished and subscribers were flushed.
    drained: CancellationToken,
    /// Subscriber listener, awaited once drain is over so sinks see the verdict.
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl Supervisor {
    /// Creates a supervisor without subscribers.
    ///
    /// Does not require a running Tokio runtime.
    pub fn new(cfg: SupervisorConfig) -> Self {
        let bus = Bus::new(cfg.bus_capacity_clamped());
        Self::new_internal(cfg, bus, None)
    }

    /// Returns a builder for a supervisor with subscribers.
    pub fn builder(cfg: SupervisorConfig) -> SupervisorBuilder {
        SupervisorBuilder::new(cfg)
    }

    pub(super) fn new_internal(
        cfg: SupervisorConfig,
        bus: Bus,
        listener: Option<JoinHandle<()>>,
    ) -> Self {
        Self {
            cfg,
            bus,
            runnables: Vec::new(),
            state: StateCell::new(),
            runtime_token: CancellationToken::new(),
            drained: CancellationToken::new(),
            listener: Mutex::new(listener),
        }
    }

    /// Adds one runnable to the managed set.
    ///
    /// `None` is a no-op, so optional components can be wired unconditionally.
    /// Registration after `run` or `close` is ignored.
    pub fn register(&mut self, runnable: Option<RunnableRef>) {
        if self.state.get() != SupervisorState::Idle {
            return;
        }
        if let Some(r) = runnable {
            self.runnables.push(r);
        }
    }

    /// Number of registered runnables.
    pub fn len(&self) -> usize {
        self.runnables.len()
    }

    /// True if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.runnables.is_empty()
    }

    /// Current lifecycle phase.
    pub fn state(&self) -> SupervisorState {
        self.state.get()
    }

    /// Creates a raw receiver for runtime events published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.bus.subscribe()
    }

    /// Runs every registered runnable until the first terminal event, then drains.
    ///
    /// Returns whatever the first terminal event carried: a runnable's own
    /// result (`Ok(())` for a clean exit), a `Terminated` error on SIGINT/SIGTERM,
    /// or a `RunnablePanicked` error. Drain outcomes never replace it.
    ///
    /// # Errors
    /// - `NoRunnables` if nothing is registered (nothing is started)
    /// - `AlreadyStarted` if the supervisor left `Idle`
    pub async fn run(&self) -> Result<(), Error> {
        if self.runnables.is_empty() {
            return Err(RuntimeError::NoRunnables.into_classified(OP_RUN));
        }
        if !self
            .state
            .transition(SupervisorState::Idle, SupervisorState::Running)
        {
            return Err(RuntimeError::AlreadyStarted.into_classified(OP_RUN));
        }

        let (tx, mut rx) = mpsc::unbounded_channel();
        self.spawn_signal_listener(tx.clone());
        for runnable in &self.runnables {
            self.spawn_runnable(runnable.clone(), tx.clone());
        }
        drop(tx);

        let first = rx.recv().await.unwrap_or(Ok(()));
        drop(rx);

        self.close().await?;
        first
    }

    /// Drains every registered closer, bounded by the floored close timeout.
    ///
    /// Also cancels the runtime token. Only the first call drains; later calls
    /// (including the one made by `run`) wait for that drain to finish and
    /// return `Ok(())`.
    pub async fn close(&self) -> Result<(), Error> {
        if !self.state.begin_drain() {
            self.drained.cancelled().await;
            return Ok(());
        }
        self.runtime_token.cancel();

        drain(
            &self.runnables,
            &self.bus,
            self.cfg.close_timeout_floored(),
        )
        .await;

        self.state.set(SupervisorState::Stopped);
        self.flush_subscribers().await;
        self.drained.cancel();
        Ok(())
    }

    fn spawn_runnable(&self, runnable: RunnableRef, tx: Completion) {
        let bus = self.bus.clone();
        let ctx = self.runtime_token.child_token();

        tokio::spawn(async move {
            let name = runnable.name().to_owned();
            bus.publish(Event::new(EventKind::RunnableStarting).with_runnable(name.as_str()));

            let result = match AssertUnwindSafe(runnable.run(ctx)).catch_unwind().await {
                Ok(result) => result,
                Err(panic) => Err(RuntimeError::RunnablePanicked {
                    name: name.clone(),
                    info: panic_message(&*panic),
                }
                .into_classified(OP_RUN)),
            };

            let mut exited = Event::new(EventKind::RunnableExited).with_runnable(name.as_str());
            if let Err(err) = &result {
                exited = exited.with_error(err);
            }
            bus.publish(exited);
            let _ = tx.send(result);
        });
    }

    /// Forwards the first SIGINT/SIGTERM as a terminal event. Exits with the runtime token.
    fn spawn_signal_listener(&self, tx: Completion) {
        let bus = self.bus.clone();
        let token = self.runtime_token.clone();

        tokio::spawn(async move {
            let err = tokio::select! {
                _ = token.cancelled() => return,
                res = shutdown::wait_for_shutdown_signal() => match res {
                    Ok(signal) => {
                        bus.publish(Event::new(EventKind::ShutdownRequested).with_reason(signal));
                        RuntimeError::Terminated { signal }
                    }
                    Err(e) => RuntimeError::SignalListener(e),
                },
            };
            let _ = tx.send(Err(err.into_classified(OP_RUN)));
        });
    }

    /// Waits for subscribers to process everything up to the drain verdict.
    async fn flush_subscribers(&self) {
        let listener = match self.listener.lock() {
            Ok(mut guard) => guard.take(),
            Err(_) => None,
        };
        if let Some(handle) = listener {
            let _ = tokio::time::timeout(self.cfg.close_timeout_floored(), handle).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runnables::RunnableFn;
    use crate::taxonomy::Kind;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn fails_after(name: &'static str, delay: Duration) -> RunnableRef {
        RunnableFn::new(name, move |_ctx: CancellationToken| async move {
            tokio::time::sleep(delay).await;
            Err::<(), _>(Error::builder().op("Db::run").kind(Kind::Internal).build())
        })
        .into_arc()
    }

    fn pends_forever(name: &'static str) -> RunnableRef {
        RunnableFn::new(name, |_ctx: CancellationToken| async {
            futures::future::pending::<()>().await;
            Ok::<_, Error>(())
        })
        .into_arc()
    }

    fn counting_closer(name: &'static str, calls: &Arc<AtomicUsize>) -> RunnableRef {
        let calls = Arc::clone(calls);
        RunnableFn::new(name, |ctx: CancellationToken| async move {
            ctx.cancelled().await;
            Ok::<_, Error>(())
        })
        .with_close(move || {
            let calls = Arc::clone(&calls);
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        })
        .into_arc()
    }

    async fn kaboom(_ctx: CancellationToken) -> Result<(), Error> {
        panic!("kaboom")
    }

    fn received(rx: &mut broadcast::Receiver<Event>) -> Vec<Event> {
        let mut out = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            out.push(ev);
        }
        out
    }

    fn leaf(err: &Error) -> Option<&RuntimeError> {
        err.opaque_cause()
            .and_then(|e| e.downcast_ref::<RuntimeError>())
    }

    #[tokio::test]
    async fn test_run_without_runnables_fails_immediately() {
        let sup = Supervisor::new(SupervisorConfig::default());
        let err = sup.run().await.expect_err("must fail");

        assert_eq!(err.kind(), Kind::Invalid);
        assert!(matches!(leaf(&err), Some(RuntimeError::NoRunnables)));
        assert_eq!(sup.state(), SupervisorState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_failure_wins_without_waiting_for_others() {
        let mut sup = Supervisor::new(SupervisorConfig::default());
        sup.register(Some(pends_forever("http")));
        sup.register(Some(fails_after("db", Duration::from_millis(50))));
        sup.register(Some(pends_forever("grpc")));

        let started = tokio::time::Instant::now();
        let err = sup.run().await.expect_err("db fails");

        assert_eq!(err.op().map(|op| op.as_str()), Some("Db::run"));
        assert_eq!(err.kind(), Kind::Internal);
        assert!(started.elapsed() < Duration::from_secs(1));
        assert_eq!(sup.state(), SupervisorState::Stopped);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_closer_is_bounded_by_floored_timeout() {
        let cfg = SupervisorConfig {
            close_timeout: Duration::from_millis(1),
            ..SupervisorConfig::default()
        };
        let mut sup = Supervisor::new(cfg);
        sup.register(Some(
            RunnableFn::new("slow", |_ctx: CancellationToken| async {
                Err::<(), _>(Error::builder().op("Slow::run").build())
            })
            .with_close(|| async {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(())
            })
            .into_arc(),
        ));
        let mut rx = sup.subscribe();

        let started = tokio::time::Instant::now();
        let err = sup.run().await.expect_err("runnable error is returned");
        let elapsed = started.elapsed();

        assert_eq!(err.op().map(|op| op.as_str()), Some("Slow::run"));
        assert!(elapsed >= Duration::from_secs(10));
        assert!(elapsed < Duration::from_secs(11));

        let timed_out = received(&mut rx)
            .into_iter()
            .find(|e| e.kind == EventKind::DrainTimedOut)
            .expect("drain timeout is reported");
        assert_eq!(timed_out.stuck.as_deref(), Some(&["slow".to_string()][..]));
    }

    #[tokio::test]
    async fn test_failing_closer_does_not_block_sibling() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut sup = Supervisor::new(SupervisorConfig::default());
        sup.register(Some(
            RunnableFn::new("broken", |_ctx: CancellationToken| async {
                Ok::<_, Error>(())
            })
            .with_close(|| async {
                Err(Error::builder().op("Broken::close").kind(Kind::Internal).build())
            })
            .into_arc(),
        ));
        sup.register(Some(counting_closer("healthy", &calls)));
        let mut rx = sup.subscribe();

        sup.run().await.expect("clean exit wins the race");
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let events = received(&mut rx);
        let failed = events
            .iter()
            .find(|e| e.kind == EventKind::CloserFailed)
            .expect("failure is reported");
        assert_eq!(failed.runnable.as_deref(), Some("broken"));
        assert!(events.iter().any(|e| e.kind == EventKind::CloserStopped
            && e.runnable.as_deref() == Some("healthy")));
        assert!(events.iter().any(|e| e.kind == EventKind::DrainCompleted));
    }

    #[test]
    fn test_register_none_is_a_no_op() {
        let mut sup = Supervisor::new(SupervisorConfig::default());
        sup.register(None);
        assert!(sup.is_empty());

        sup.register(Some(pends_forever("http")));
        sup.register(None);
        assert_eq!(sup.len(), 1);
    }

    #[tokio::test]
    async fn test_close_runs_closers_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut sup = Supervisor::new(SupervisorConfig::default());
        sup.register(Some(counting_closer("svc", &calls)));

        sup.close().await.expect("first close");
        sup.close().await.expect("second close");

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(sup.state(), SupervisorState::Stopped);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_waits_for_drain_started_by_close() {
        let released = Arc::new(AtomicUsize::new(0));
        let flag = Arc::clone(&released);
        let mut sup = Supervisor::new(SupervisorConfig::default());
        sup.register(Some(
            RunnableFn::new("svc", |ctx: CancellationToken| async move {
                ctx.cancelled().await;
                Ok::<_, Error>(())
            })
            .with_close(move || {
                let flag = Arc::clone(&flag);
                async move {
                    tokio::time::sleep(Duration::from_secs(3)).await;
                    flag.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }
            })
            .into_arc(),
        ));

        let (from_run, closed) = tokio::join!(
            async {
                let res = sup.run().await;
                (res, sup.state(), released.load(Ordering::SeqCst))
            },
            async {
                tokio::time::sleep(Duration::from_millis(10)).await;
                sup.close().await
            },
        );

        let (res, state, released_at_return) = from_run;
        res.expect("cancelled runnable exits cleanly");
        closed.expect("close");
        assert_eq!(state, SupervisorState::Stopped);
        assert_eq!(released_at_return, 1);
    }

    #[tokio::test]
    async fn test_second_run_is_rejected() {
        let mut sup = Supervisor::new(SupervisorConfig::default());
        sup.register(Some(
            RunnableFn::new("oneshot", |_ctx: CancellationToken| async {
                Ok::<_, Error>(())
            })
            .into_arc(),
        ));

        sup.run().await.expect("first run");
        let err = sup.run().await.expect_err("second run");
        assert!(matches!(leaf(&err), Some(RuntimeError::AlreadyStarted)));

        sup.register(Some(pends_forever("late")));
        assert_eq!(sup.len(), 1);
    }

    #[tokio::test]
    async fn test_panicking_runnable_ends_the_race() {
        let mut sup = Supervisor::new(SupervisorConfig::default());
        sup.register(Some(pends_forever("http")));
        sup.register(Some(
            RunnableFn::new("bomb", kaboom).into_arc(),
        ));

        let err = sup.run().await.expect_err("panic is terminal");
        assert_eq!(err.kind(), Kind::Internal);
        assert_eq!(err.fields()[0].value, "bomb");
        match leaf(&err) {
            Some(RuntimeError::RunnablePanicked { name, info }) => {
                assert_eq!(name, "bomb");
                assert_eq!(info, "kaboom");
            }
            other => panic!("unexpected leaf: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_losers_observe_cancellation() {
        let (done_tx, done_rx) = tokio::sync::oneshot::channel::<()>();
        let done_tx = Arc::new(Mutex::new(Some(done_tx)));

        let mut sup = Supervisor::new(SupervisorConfig::default());
        sup.register(Some(
            RunnableFn::new("winner", |_ctx: CancellationToken| async {
                Ok::<_, Error>(())
            })
            .into_arc(),
        ));
        sup.register(Some(
            RunnableFn::new("loser", move |ctx: CancellationToken| {
                let done_tx = Arc::clone(&done_tx);
                async move {
                    ctx.cancelled().await;
                    if let Some(tx) = done_tx.lock().expect("lock").take() {
                        let _ = tx.send(());
                    }
                    Ok::<_, Error>(())
                }
            })
            .into_arc(),
        ));

        sup.run().await.expect("winner exits cleanly");
        tokio::time::timeout(Duration::from_secs(5), done_rx)
            .await
            .expect("loser was cancelled")
            .expect("sender kept");
    }
}
