//! # Vigil Core
//!
//! Core types and error handling for the Vigil health monitor.
//!
//! This crate provides the data model shared by every other crate:
//! - Component specifications and per-component health records
//! - Verdict vocabularies (`ComponentStatus`, `EndpointStatus`)
//! - The aggregate report served on `/health`
//! - The workspace error type

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::*;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::types::*;
}
