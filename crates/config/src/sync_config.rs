//! Sync schedule configuration section

use crate::validation::{ConfigSection, ValidationError, Validator};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How often the local collection is reconciled with the remote store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SyncSettings {
    /// Run periodic sync cycles
    pub auto_sync: bool,

    /// Seconds between periodic cycles
    pub interval_secs: u64,

    /// Delay before the first cycle after startup, in milliseconds
    pub initial_delay_ms: u64,

    /// Deadline for each remote fetch or push, in milliseconds
    pub gateway_timeout_ms: u64,
}

impl SyncSettings {
    /// Interval between periodic cycles
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// Delay before the first cycle
    pub fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms)
    }

    /// Deadline for a single remote call
    pub fn gateway_timeout(&self) -> Duration {
        Duration::from_millis(self.gateway_timeout_ms)
    }
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            auto_sync: true,
            interval_secs: 30,
            initial_delay_ms: 1_000,
            gateway_timeout_ms: 5_000,
        }
    }
}

impl ConfigSection for SyncSettings {
    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        Validator::collect_errors(vec![
            Validator::in_range(self.interval_secs, 1, 86_400, "sync.interval_secs"),
            Validator::in_range(self.initial_delay_ms, 0, 600_000, "sync.initial_delay_ms"),
            Validator::in_range(
                self.gateway_timeout_ms,
                100,
                120_000,
                "sync.gateway_timeout_ms",
            ),
        ])
    }

    fn section_name(&self) -> &'static str {
        "sync"
    }
}
