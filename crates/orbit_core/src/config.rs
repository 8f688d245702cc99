//! Tunables for use-case services.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Window settings for dashboard and analytics services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    /// First day considered by the lifetime panel view.
    pub history_start: NaiveDate,
    /// Length of the "recent days" analytics window, today included.
    pub recent_days: u32,
    /// Length of the "recent months" analytics window.
    pub recent_months: u32,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            history_start: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or(NaiveDate::MIN),
            recent_days: 30,
            recent_months: 3,
        }
    }
}
