use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use super::{config::SupervisorConfig, supervisor::Supervisor};
use crate::{
    events::{Bus, EventKind},
    subscribers::{Subscribe, SubscriberSet},
};

/// Builder for a [`Supervisor`] with event subscribers.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use runkit::{LogWriter, Subscribe, Supervisor, SupervisorConfig};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
///     let sup = Supervisor::builder(SupervisorConfig::default())
///         .with_subscribers(subs)
///         .build();
///     assert!(sup.is_empty());
/// }
/// ```
pub struct SupervisorBuilder {
    cfg: SupervisorConfig,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl SupervisorBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: SupervisorConfig) -> Self {
        Self {
            cfg,
            subscribers: Vec::new(),
        }
    }

    /// Sets event subscribers (logging sinks).
    ///
    /// Subscribers receive runtime events (runnable lifecycle, closer outcomes,
    /// drain verdict) through dedicated workers with bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Builds the supervisor.
    ///
    /// Must be called from within a Tokio runtime when subscribers are set:
    /// their workers and the bus listener are spawned here.
    pub fn build(self) -> Supervisor {
        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let listener = if self.subscribers.is_empty() {
            None
        } else {
            let set = SubscriberSet::new(self.subscribers, bus.clone());
            Some(subscriber_listener(&bus, set))
        };
        Supervisor::new_internal(self.cfg, bus, listener)
    }
}

/// Forwards bus events to the subscriber set until the drain verdict.
///
/// Lagged receivers skip ahead; a closed bus ends the loop. Subscriber workers
/// are shut down (queues flushed) before the task returns.
fn subscriber_listener(bus: &Bus, set: SubscriberSet) -> JoinHandle<()> {
    let mut rx = bus.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(ev) => {
                    let verdict =
                        matches!(ev.kind, EventKind::DrainCompleted | EventKind::DrainTimedOut);
                    set.emit(ev);
                    if verdict {
                        break;
                    }
                }
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => break,
            }
        }
        set.shutdown().await;
    })
}
