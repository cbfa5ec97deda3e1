//! Per-hotkey listener tasks
//!
//! Each registered hotkey gets one task that waits on its event stream and
//! activates the target application for every key-down, in delivery order.
//! Tasks for different hotkeys run in parallel with no ordering between them.

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::activation::Activator;
use crate::events::ActivationOutcome;
use crate::hotkey::Subscription;

/// Owns the listener tasks of every registered hotkey
pub struct Dispatcher {
    runtime: Handle,
    activator: Arc<dyn Activator>,
    tasks: JoinSet<()>,
}

impl Dispatcher {
    /// Create a dispatcher that spawns its tasks on `runtime`
    pub fn new(runtime: Handle, activator: Arc<dyn Activator>) -> Self {
        Self {
            runtime,
            activator,
            tasks: JoinSet::new(),
        }
    }

    /// Start listening for key-downs on one subscription
    pub fn spawn(&mut self, subscription: Subscription) {
        let activator = Arc::clone(&self.activator);
        self.tasks
            .spawn_on(listen(subscription, activator), &self.runtime);
    }

    /// Number of tasks that have not been reaped yet
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Wait up to `grace` for tasks to observe their closed streams
    ///
    /// Whatever is still running afterwards is aborted. Returns how many
    /// tasks finished on their own.
    pub async fn shutdown(mut self, grace: Duration) -> usize {
        let mut finished = 0;

        let drained = tokio::time::timeout(grace, async {
            while let Some(result) = self.tasks.join_next().await {
                if let Err(e) = result {
                    warn!(?e, "dispatch task ended abnormally");
                }
                finished += 1;
            }
        })
        .await;

        if drained.is_err() {
            warn!(
                remaining = self.tasks.len(),
                "dispatch tasks still running after grace period, abandoning"
            );
            self.tasks.abort_all();
        }

        finished
    }
}

/// Activate the subscription's application for every key-down it receives
async fn listen(subscription: Subscription, activator: Arc<dyn Activator>) {
    let Subscription {
        id,
        combo,
        app,
        mut events,
    } = subscription;
    debug!(%combo, %app, id, "dispatch task started");

    while let Some(event) = events.recv().await {
        debug!(%combo, id = event.id, "key-down received");

        let activator = Arc::clone(&activator);
        let target = app.clone();
        match tokio::task::spawn_blocking(move || activator.activate(&target)).await {
            Ok(outcome @ ActivationOutcome::Activated) => info!(%combo, %app, %outcome, "activation finished"),
            Ok(outcome @ ActivationOutcome::NotRunning) => debug!(%combo, %app, %outcome, "activation skipped"),
            Ok(outcome @ ActivationOutcome::Refused) => warn!(%combo, %app, %outcome, "activation refused"),
            Err(e) => error!(?e, %combo, %app, "activation task failed"),
        }
    }

    debug!(%combo, "event stream closed, dispatch task exiting");
}
