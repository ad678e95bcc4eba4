//! Common types used throughout Vigil

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A monitored component: a name and its HTTP health endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentSpec {
    /// Unique, non-empty component name
    pub name: String,
    /// Health endpoint URL
    pub endpoint: String,
}

impl ComponentSpec {
    /// Create a new component spec
    pub fn new(name: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            endpoint: endpoint.into(),
        }
    }
}

/// Overall verdict for a single probe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentStatus {
    /// Endpoint answered and was classified healthy
    Ok,
    /// Transport failure (connection refused, timeout, DNS, ...)
    Unreachable,
    /// Endpoint answered with a non-200 status and no JSON `"ok"` body
    InvalidResponse,
    /// No verdict could be reached
    Unknown,
}

impl ComponentStatus {
    /// Whether this verdict counts as healthy in the aggregate
    pub fn is_ok(self) -> bool {
        self == ComponentStatus::Ok
    }
}

impl fmt::Display for ComponentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentStatus::Ok => write!(f, "ok"),
            ComponentStatus::Unreachable => write!(f, "unreachable"),
            ComponentStatus::InvalidResponse => write!(f, "invalid_response"),
            ComponentStatus::Unknown => write!(f, "unknown"),
        }
    }
}

/// Coarse binary view of the endpoint, reported alongside [`ComponentStatus`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointStatus {
    /// Endpoint is healthy
    Ok,
    /// Endpoint is not healthy
    NotOk,
}

impl fmt::Display for EndpointStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndpointStatus::Ok => write!(f, "ok"),
            EndpointStatus::NotOk => write!(f, "not_ok"),
        }
    }
}

/// Last known health of one component
///
/// Records are replaced whole; fields are never updated individually.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthRecord {
    /// Component name
    pub name: String,
    /// Overall verdict
    pub status: ComponentStatus,
    /// Binary endpoint view
    pub endpoint_status: EndpointStatus,
    /// HTTP status line (e.g. "200 OK") or transport error text
    pub http_result: String,
    /// Time of the probe that produced this record
    pub last_checked: DateTime<Utc>,
    /// Classification or transport error, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Top-level rollup over all known records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregateStatus {
    /// Every known component is `ok` (vacuously true with no records)
    Ok,
    /// At least one known component is not `ok`
    Degraded,
}

impl fmt::Display for AggregateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AggregateStatus::Ok => write!(f, "ok"),
            AggregateStatus::Degraded => write!(f, "degraded"),
        }
    }
}

/// Body of the `/health` response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateReport {
    /// Aggregate status
    pub status: AggregateStatus,
    /// Snapshot of every known component record
    pub components: Vec<HealthRecord>,
}

impl AggregateReport {
    /// Build a report from a snapshot of records
    ///
    /// Components that were never probed have no record and so cannot
    /// affect the aggregate.
    pub fn from_records(components: Vec<HealthRecord>) -> Self {
        let status = if components.iter().all(|c| c.status.is_ok()) {
            AggregateStatus::Ok
        } else {
            AggregateStatus::Degraded
        };

        Self { status, components }
    }
}
