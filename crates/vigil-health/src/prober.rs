//! Single-component probe: fetch, classify, store, record

use crate::checker::{HealthCheck, HttpHealthCheck};
use crate::classifier::classify;
use crate::event_log::{EventSink, ProbeEvent};
use crate::store::StatusStore;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, warn};
use vigil_core::{ComponentSpec, HealthRecord};

/// Probes components and publishes the results
#[derive(Debug, Clone)]
pub struct Prober {
    checker: Arc<dyn HealthCheck>,
    store: StatusStore,
    sink: Arc<dyn EventSink>,
}

impl Prober {
    /// Create a prober using the HTTP checker with the fixed probe timeout
    pub fn new(store: StatusStore, sink: Arc<dyn EventSink>) -> Self {
        Self::with_checker(Arc::new(HttpHealthCheck::default()), store, sink)
    }

    /// Create a prober with a custom transport
    pub fn with_checker(
        checker: Arc<dyn HealthCheck>,
        store: StatusStore,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            checker,
            store,
            sink,
        }
    }

    /// Store the prober writes into
    pub fn store(&self) -> &StatusStore {
        &self.store
    }

    /// Probe one component
    ///
    /// Never fails: transport and classification problems end up in the
    /// returned record. The store write happens before the event is recorded
    /// and does not depend on it.
    pub async fn probe(&self, component: &ComponentSpec) -> HealthRecord {
        let outcome = self.checker.fetch(&component.endpoint).await;
        let verdict = classify(&outcome);

        let record = HealthRecord {
            name: component.name.clone(),
            status: verdict.status,
            endpoint_status: verdict.endpoint_status,
            http_result: verdict.http_result,
            last_checked: Utc::now(),
            error: verdict.error,
        };

        self.store.update(record.clone());

        if let Err(e) = self.sink.record(&ProbeEvent::from(&record)) {
            warn!(component = %record.name, error = %e, "Failed to record probe event");
        }

        if record.status.is_ok() {
            debug!(
                component = %record.name,
                http_result = %record.http_result,
                "Component healthy"
            );
        } else {
            warn!(
                component = %record.name,
                status = %record.status,
                http_result = %record.http_result,
                error = record.error.as_deref().unwrap_or_default(),
                "Component unhealthy"
            );
        }

        record
    }
}
