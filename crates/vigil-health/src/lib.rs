//! # Vigil Health
//!
//! The probing pipeline behind `/health`:
//! - HTTP health checks with a bounded timeout
//! - Layered classification of arbitrary responses into verdicts
//! - A concurrently readable status store (latest record per component)
//! - A per-probe JSON event log
//! - A fixed-delay scheduler that probes every component forever
//!
//! ```text
//! Scheduler ──▶ Prober ──┬──▶ HealthCheck (HTTP GET, 5s timeout)
//!                        ├──▶ classify()
//!                        ├──▶ StatusStore ◀── reporting server
//!                        └──▶ EventSink (one JSON line per probe)
//! ```

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub mod checker;
pub mod classifier;
pub mod event_log;
pub mod prober;
pub mod scheduler;
pub mod store;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use checker::{HealthCheck, HttpHealthCheck, ProbeOutcome, PROBE_TIMEOUT};
pub use classifier::{classify, status_line, Verdict};
pub use event_log::{cleanup_logs, EventSink, FileEventLog, NullEventLog, ProbeEvent};
pub use prober::Prober;
pub use scheduler::Scheduler;
pub use store::StatusStore;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::checker::{HealthCheck, HttpHealthCheck, ProbeOutcome, PROBE_TIMEOUT};
    pub use crate::classifier::{classify, Verdict};
    pub use crate::event_log::{EventSink, FileEventLog, NullEventLog, ProbeEvent};
    pub use crate::prober::Prober;
    pub use crate::scheduler::Scheduler;
    pub use crate::store::StatusStore;
}
