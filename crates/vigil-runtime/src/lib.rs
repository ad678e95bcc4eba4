//! # Vigil Runtime
//!
//! Process lifecycle for the health monitor:
//! - The `/health` report server (axum)
//! - The background probe scheduler
//! - Graceful shutdown with signal handling
//!
//! The scheduler and the server never talk to each other directly; they share
//! only the [`StatusStore`](vigil_health::StatusStore).

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub mod runtime;
pub mod server;
pub mod shutdown;

pub use runtime::Runtime;
pub use server::{build_router, health_report, ReportServer};
pub use shutdown::{ShutdownSignal, SignalHandler};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::runtime::Runtime;
    pub use crate::server::ReportServer;
    pub use crate::shutdown::{ShutdownSignal, SignalHandler};
}
