//! # Drain: bounded, best-effort release of every closer.
//!
//! ```text
//! drain(runnables, bus, timeout)
//!   ├─► publish(DrainStarted)
//!   ├─► JoinSet: one task per runnable exposing a Closer
//!   │      └─ close() under catch_unwind ─► CloserStopped | CloserFailed
//!   └─► timeout(floored close timeout, join all):
//!          ├─ all joined  → publish(DrainCompleted)
//!          └─ elapsed     → publish(DrainTimedOut{stuck}), detach stragglers
//! ```
//!
//! ## Rules
//! - Closers run concurrently and independently: a failing, slow or panicking
//!   closer never blocks or fails its siblings.
//! - Closer failures and the timeout are logged through `tracing` and
//!   published as events; drain itself never fails.
//! - Stragglers are detached, not aborted. They keep running until they return
//!   or the process exits.

use std::panic::AssertUnwindSafe;
use std::time::Duration;

use futures::FutureExt;
use tokio::task::JoinSet;

use crate::events::{Bus, Event, EventKind};
use crate::runnables::RunnableRef;
use crate::subscribers::panic_message;
use crate::taxonomy::Level;

/// Invokes every registered closer and waits at most `timeout` for all of them.
///
/// Returns the names of closers that had not finished when the timeout elapsed.
pub(super) async fn drain(runnables: &[RunnableRef], bus: &Bus, timeout: Duration) -> Vec<String> {
    bus.publish(Event::new(EventKind::DrainStarted).with_timeout(timeout));

    let mut set = JoinSet::new();
    let mut pending = Vec::new();
    for runnable in runnables.iter().filter(|r| r.as_closer().is_some()) {
        let name = runnable.name().to_owned();
        pending.push(name.clone());
        set.spawn(close_one(runnable.clone(), name, bus.clone()));
    }

    let join_all = async {
        while let Some(joined) = set.join_next().await {
            if let Ok(name) = joined {
                if let Some(pos) = pending.iter().position(|p| *p == name) {
                    pending.remove(pos);
                }
            }
        }
    };

    let joined = tokio::time::timeout(timeout, join_all).await;
    match joined {
        Ok(()) => {
            bus.publish(Event::new(EventKind::DrainCompleted));
            Vec::new()
        }
        Err(_) => {
            set.detach_all();
            tracing::warn!(
                target: "runkit",
                timeout_ms = timeout.as_millis() as u64,
                stuck = ?pending,
                "drain timed out"
            );
            bus.publish(
                Event::new(EventKind::DrainTimedOut)
                    .with_timeout(timeout)
                    .with_stuck(pending.clone()),
            );
            pending
        }
    }
}

/// Runs one closer and reports its outcome. Returns the runnable's name.
async fn close_one(runnable: RunnableRef, name: String, bus: Bus) -> String {
    let Some(closer) = runnable.as_closer() else {
        return name;
    };

    let event = match AssertUnwindSafe(closer.close()).catch_unwind().await {
        Ok(Ok(())) => Event::new(EventKind::CloserStopped),
        Ok(Err(err)) => {
            tracing::error!(target: "runkit", runnable = %name, error = %err, "closer failed");
            Event::new(EventKind::CloserFailed).with_error(&err)
        }
        Err(panic) => {
            let reason = format!("closer panicked: {}", panic_message(&*panic));
            tracing::error!(target: "runkit", runnable = %name, error = %reason, "closer failed");
            Event::new(EventKind::CloserFailed)
                .with_reason(reason)
                .with_level(Level::Error)
        }
    };
    bus.publish(event.with_runnable(name.as_str()));
    name
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runnables::RunnableFn;
    use crate::taxonomy::{Error, Kind};
    use crate::test_util::Captured;
    use tokio_util::sync::CancellationToken;

    fn with_close<C, Fut>(name: &'static str, close: C) -> RunnableRef
    where
        C: Fn() -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<(), Error>> + Send + 'static,
    {
        RunnableFn::new(name, |_ctx: CancellationToken| async {
            Ok::<_, Error>(())
        })
        .with_close(close)
        .into_arc()
    }

    async fn explode() -> Result<(), Error> {
        panic!("boom")
    }

    fn drain_events(rx: &mut tokio::sync::broadcast::Receiver<Event>) -> Vec<Event> {
        let mut out = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            out.push(ev);
        }
        out
    }

    #[tokio::test]
    async fn test_runnables_without_closer_are_skipped() {
        let bus = Bus::new(16);
        let mut rx = bus.subscribe();
        let plain: RunnableRef = RunnableFn::new("plain", |_ctx: CancellationToken| async {
            Ok::<_, Error>(())
        })
        .into_arc();

        let stuck = drain(&[plain], &bus, Duration::from_secs(10)).await;
        assert!(stuck.is_empty());

        let kinds: Vec<EventKind> = drain_events(&mut rx).iter().map(|e| e.kind).collect();
        assert_eq!(kinds, [EventKind::DrainStarted, EventKind::DrainCompleted]);
    }

    #[tokio::test]
    async fn test_panicking_closer_is_reported_as_failure() {
        let bus = Bus::new(16);
        let mut rx = bus.subscribe();
        let bomb = with_close("bomb", explode);

        drain(&[bomb], &bus, Duration::from_secs(10)).await;

        let failed = drain_events(&mut rx)
            .into_iter()
            .find(|e| e.kind == EventKind::CloserFailed)
            .expect("failure event");
        assert_eq!(failed.runnable.as_deref(), Some("bomb"));
        assert_eq!(failed.reason.as_deref(), Some("closer panicked: boom"));
    }

    #[tokio::test]
    async fn test_failing_closer_is_logged_without_receivers() {
        let (captured, _guard) = Captured::install();
        let bus = Bus::new(16);
        let broken = with_close("broken", || async {
            Err(Error::builder().op("Pool::close").kind(Kind::Internal).build())
        });

        drain(&[broken], &bus, Duration::from_secs(10)).await;

        let failures: Vec<String> = captured
            .lines()
            .into_iter()
            .filter(|l| l.contains("closer failed"))
            .collect();
        assert_eq!(failures.len(), 1);
        assert!(failures[0].contains("ERROR"));
        assert!(failures[0].contains("runnable=broken"));
        assert!(failures[0].contains("Pool::close"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stuck_closers_are_named() {
        let (captured, _guard) = Captured::install();
        let bus = Bus::new(16);
        let mut rx = bus.subscribe();
        let fast = with_close("fast", || async { Ok(()) });
        let slow = with_close("slow", || async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(())
        });

        let started = tokio::time::Instant::now();
        let stuck = drain(&[fast, slow], &bus, Duration::from_secs(10)).await;
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(10));
        assert!(elapsed < Duration::from_secs(11));
        assert_eq!(stuck, ["slow"]);

        let timed_out = drain_events(&mut rx)
            .into_iter()
            .find(|e| e.kind == EventKind::DrainTimedOut)
            .expect("timeout event");
        assert_eq!(timed_out.timeout_ms, Some(10_000));
        assert_eq!(timed_out.stuck.as_deref(), Some(&["slow".to_string()][..]));

        let warning = captured
            .lines()
            .into_iter()
            .find(|l| l.contains("drain timed out"))
            .expect("timeout is logged");
        assert!(warning.contains("WARN"));
        assert!(warning.contains(r#"stuck=["slow"]"#));
    }
}
