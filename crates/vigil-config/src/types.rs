//! Configuration types

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use vigil_core::ComponentSpec;

/// Component entry as it appears in the configuration file
pub type ComponentConfig = ComponentSpec;

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    /// Components to probe, in probe order
    #[serde(default)]
    pub components: Vec<ComponentConfig>,

    /// Delay between the end of one probe cycle and the start of the next
    #[serde(default = "default_check_interval")]
    pub check_interval_seconds: u64,

    /// Directory for the daily probe event log (events are discarded if unset)
    #[serde(default)]
    pub log_directory: Option<PathBuf>,

    /// Age in days after which old event log files are removed at startup (0 = keep)
    #[serde(default = "default_log_retention_days")]
    pub log_retention_days: u32,

    /// Address of the `/health` server; `":port"` means all interfaces
    #[serde(default = "default_listen_address")]
    pub listen_address: String,
}

fn default_check_interval() -> u64 {
    30
}

fn default_log_retention_days() -> u32 {
    7
}

fn default_listen_address() -> String {
    ":8080".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            components: Vec::new(),
            check_interval_seconds: default_check_interval(),
            log_directory: None,
            log_retention_days: default_log_retention_days(),
            listen_address: default_listen_address(),
        }
    }
}

impl AppConfig {
    /// Interval between probe cycles
    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval_seconds)
    }

    /// Listen address in `host:port` form, ready to hand to a listener
    ///
    /// Expands the `":port"` shorthand; host names are left for the
    /// listener to resolve.
    pub fn bind_address(&self) -> String {
        let address = self.listen_address.trim();
        if address.starts_with(':') {
            format!("0.0.0.0{address}")
        } else {
            address.to_string()
        }
    }
}
