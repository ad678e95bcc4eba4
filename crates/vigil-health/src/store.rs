//! Latest health record per component

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use vigil_core::HealthRecord;

/// Concurrently readable table of the latest record per component
///
/// Cloning is cheap and every clone shares the same table. Records are
/// replaced whole under the write lock, so a reader sees either the old or the
/// new record. Nothing is ever removed; a component that was never probed is
/// simply absent.
#[derive(Debug, Clone, Default)]
pub struct StatusStore {
    records: Arc<RwLock<HashMap<String, HealthRecord>>>,
}

impl StatusStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the record for `record.name`
    pub fn update(&self, record: HealthRecord) {
        self.records.write().insert(record.name.clone(), record);
    }

    /// Latest record for one component
    pub fn get(&self, name: &str) -> Option<HealthRecord> {
        self.records.read().get(name).cloned()
    }

    /// Point-in-time snapshot of every record, ordered by component name
    pub fn get_all(&self) -> Vec<HealthRecord> {
        let mut records: Vec<HealthRecord> = self.records.read().values().cloned().collect();
        records.sort_by(|a, b| a.name.cmp(&b.name));
        records
    }

    /// Number of components with a record
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Whether no component has been probed yet
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use vigil_core::{ComponentStatus, EndpointStatus};

    fn record(name: &str, status: ComponentStatus, http_result: &str) -> HealthRecord {
        HealthRecord {
            name: name.to_string(),
            status,
            endpoint_status: if status.is_ok() {
                EndpointStatus::Ok
            } else {
                EndpointStatus::NotOk
            },
            http_result: http_result.to_string(),
            last_checked: Utc::now(),
            error: None,
        }
    }

    #[test]
    fn test_update_and_get_all() {
        let store = StatusStore::new();
        store.update(record("db", ComponentStatus::Ok, "200 OK"));
        store.update(record(
            "cache",
            ComponentStatus::InvalidResponse,
            "503 Service Unavailable",
        ));

        let all = store.get_all();
        assert_eq!(all.len(), 2);
        assert!(all.iter().any(|r| r.name == "db"
            && r.status == ComponentStatus::Ok
            && r.endpoint_status == EndpointStatus::Ok
            && r.http_result == "200 OK"));
    }

    #[test]
    fn test_absent_before_first_probe() {
        let store = StatusStore::new();
        assert!(store.is_empty());
        assert!(store.get("db").is_none());
        assert!(store.get_all().is_empty());
    }

    #[test]
    fn test_update_replaces_whole_record() {
        let store = StatusStore::new();
        let mut first = record("db", ComponentStatus::Unreachable, "connection refused");
        first.error = Some("connection refused".to_string());
        store.update(first);
        store.update(record("db", ComponentStatus::Ok, "200 OK"));

        let current = store.get("db").unwrap();
        assert_eq!(current.status, ComponentStatus::Ok);
        assert_eq!(current.http_result, "200 OK");
        assert!(current.error.is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_get_all_is_idempotent() {
        let store = StatusStore::new();
        store.update(record("b", ComponentStatus::Ok, "200 OK"));
        store.update(record("a", ComponentStatus::Unreachable, "refused"));

        assert_eq!(store.get_all(), store.get_all());
    }

    #[test]
    fn test_clones_share_state() {
        let store = StatusStore::new();
        let writer = store.clone();
        writer.update(record("db", ComponentStatus::Ok, "200 OK"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_concurrent_updates_to_distinct_names() {
        let store = StatusStore::new();
        let threads: Vec<_> = (0..32)
            .map(|i| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for round in 0..50 {
                        let mut rec = record(&format!("comp-{i}"), ComponentStatus::Ok, "200 OK");
                        rec.http_result = format!("round {round}");
                        store.update(rec);
                        let _ = store.get_all();
                    }
                })
            })
            .collect();

        for handle in threads {
            handle.join().unwrap();
        }

        let all = store.get_all();
        assert_eq!(all.len(), 32);
        assert!(all.iter().all(|r| r.http_result == "round 49"));
    }
}
