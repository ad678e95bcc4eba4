//! Test doubles for the probing pipeline

use crate::checker::{HealthCheck, ProbeOutcome};
use crate::event_log::{EventSink, ProbeEvent};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use vigil_core::{Error, Result};

/// Transport that returns canned outcomes per endpoint
#[derive(Debug, Clone, Default)]
pub struct StubHealthCheck {
    outcomes: HashMap<String, ProbeOutcome>,
    delay: Duration,
    calls: Arc<Mutex<Vec<(String, Instant)>>>,
}

impl StubHealthCheck {
    /// Create a stub with no outcomes; unknown endpoints fail as transport errors
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the outcome for an endpoint
    pub fn with_outcome(mut self, endpoint: impl Into<String>, outcome: ProbeOutcome) -> Self {
        self.outcomes.insert(endpoint.into(), outcome);
        self
    }

    /// Make every fetch take `delay` (tokio time, so it can be paused)
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Endpoints fetched so far, with the instant each fetch started
    pub fn calls(&self) -> Vec<(String, Instant)> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl HealthCheck for StubHealthCheck {
    async fn fetch(&self, endpoint: &str) -> ProbeOutcome {
        self.calls.lock().push((endpoint.to_string(), Instant::now()));

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        self.outcomes
            .get(endpoint)
            .cloned()
            .unwrap_or_else(|| ProbeOutcome::transport(format!("GET {endpoint}: connection refused")))
    }
}

/// Sink that keeps events in memory
#[derive(Debug, Default)]
pub struct MemoryEventLog {
    events: Mutex<Vec<ProbeEvent>>,
}

impl MemoryEventLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Events recorded so far
    pub fn events(&self) -> Vec<ProbeEvent> {
        self.events.lock().clone()
    }
}

impl EventSink for MemoryEventLog {
    fn record(&self, event: &ProbeEvent) -> Result<()> {
        self.events.lock().push(event.clone());
        Ok(())
    }
}

/// Sink whose every write fails
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingEventLog;

impl EventSink for FailingEventLog {
    fn record(&self, _event: &ProbeEvent) -> Result<()> {
        Err(Error::EventLog("disk full".to_string()))
    }
}
