//! Fixed-delay probe loop

use crate::prober::Prober;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info};
use vigil_core::{ComponentSpec, ComponentStatus};

/// Probes every component, sleeps for the interval, repeats forever
///
/// Cycles never overlap: a cycle that overruns the interval delays the next
/// one by its own overrun.
#[derive(Debug, Clone)]
pub struct Scheduler {
    components: Arc<[ComponentSpec]>,
    interval: Duration,
    prober: Prober,
}

impl Scheduler {
    /// Create a new scheduler
    pub fn new(components: Vec<ComponentSpec>, interval: Duration, prober: Prober) -> Self {
        Self {
            components: components.into(),
            interval,
            prober,
        }
    }

    /// Configured interval between cycles
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Probe every component once, sequentially, in configured order
    ///
    /// Returns the number of components that came back `ok`.
    pub async fn run_cycle(&self) -> usize {
        let started = Instant::now();
        let mut healthy = 0;

        for component in self.components.iter() {
            let record = self.prober.probe(component).await;
            if record.status == ComponentStatus::Ok {
                healthy += 1;
            }
        }

        debug!(
            components = self.components.len(),
            healthy,
            elapsed = ?started.elapsed(),
            "Probe cycle complete"
        );

        healthy
    }

    /// Run cycles forever
    pub async fn run(self) {
        info!(
            components = self.components.len(),
            interval_secs = self.interval.as_secs(),
            "Health scheduler started"
        );

        loop {
            self.run_cycle().await;
            tokio::time::sleep(self.interval).await;
        }
    }

    /// Run cycles forever on a background task
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }
}
