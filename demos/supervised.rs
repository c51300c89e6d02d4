//! Supervises an HTTP-like listener and a flaky worker.
//!
//! ```text
//! cargo run --example supervised
//! RUST_LOG=debug cargo run --example supervised
//! ```
//!
//! The worker fails after two seconds; the listener observes cancellation and
//! its closers (an owned "pool" and "cache") are released during drain.
//! Press Ctrl-C earlier to see the signal path instead.

use std::sync::Arc;
use std::time::Duration;

use runkit::{
    CloserSet, Error, Kind, Level, LogWriter, RunnableFn, Subscribe, Supervisor,
    SupervisorConfig, report,
};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

fn listener_closers() -> CloserSet {
    let mut closers = CloserSet::new();
    closers.add_fn("pool", || async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        Ok(())
    });
    closers.add_fn("cache", || async {
        Err(Error::builder()
            .op("Cache::flush")
            .kind(Kind::Internal)
            .level(Level::Warn)
            .cause("write-back buffer not empty")
            .build())
    });
    closers
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cfg = SupervisorConfig::from_env()?;
    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
    let mut sup = Supervisor::builder(cfg).with_subscribers(subs).build();

    let listener = RunnableFn::new("listener", |ctx: CancellationToken| async move {
        ctx.cancelled().await;
        Ok::<_, Error>(())
    })
    .with_closer(Arc::new(listener_closers()))
    .into_arc();

    let worker = RunnableFn::new("worker", |_ctx: CancellationToken| async {
        tokio::time::sleep(Duration::from_secs(2)).await;
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "upstream reset");
        Err::<(), _>(
            Error::builder()
                .op("Worker::run")
                .kind(Kind::Internal)
                .field("upstream", "billing")
                .cause(
                    Error::builder()
                        .op("Upstream::fetch")
                        .field("attempt", 3)
                        .cause(io)
                        .build(),
                )
                .build(),
        )
    })
    .into_arc();

    sup.register(Some(listener));
    sup.register(Some(worker));
    sup.register(None);

    if let Err(err) = sup.run().await {
        report::log_error(&err);
    }
    Ok(())
}
