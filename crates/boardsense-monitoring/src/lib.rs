//! Logging setup shared by the Boardsense binaries and test suites.

use serde::{Deserialize, Serialize};

mod logging;

pub use logging::{init_logging, init_test_tracing, BoardLogExt};

/// Configuration for initializing logging
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitoringConfig {
    /// Service name recorded on the startup event
    #[serde(default = "default_service_name")]
    pub service_name: String,
    /// Filter used when `RUST_LOG` is unset (e.g. "info,boardsense_analysis=debug")
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    /// JSON lines on stderr instead of the pretty format
    #[serde(default)]
    pub enable_json_logging: bool,
    /// Additional daily-rotated JSON log file
    #[serde(default)]
    pub log_file: Option<String>,
}

fn default_service_name() -> String {
    "boardsense".to_string()
}

fn default_log_filter() -> String {
    "warn".to_string()
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            log_filter: default_log_filter(),
            enable_json_logging: false,
            log_file: None,
        }
    }
}
