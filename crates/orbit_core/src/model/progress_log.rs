//! Progress log record.
//!
//! # Invariants
//! - At most one log exists per `(pulse_id, completion_date)`; repeated
//!   completions on the same day accumulate into `progress_value`.
//! - `completion_date` is a calendar day, never a timestamp.

use crate::model::pulse::PulseId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type ProgressLogId = Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressLog {
    pub id: ProgressLogId,
    #[serde(alias = "habit_task_id")]
    pub pulse_id: PulseId,
    pub completion_date: NaiveDate,
    /// Accumulated amount for the day. Binary completions store 1.
    #[serde(default)]
    pub progress_value: Option<f64>,
    /// Derived convenience ratio in `0..=1` (may exceed 1 on overshoot).
    #[serde(default)]
    pub completion_percentage: Option<f64>,
}

impl ProgressLog {
    /// Creates a fully-completed binary log for `pulse_id` on `date`.
    pub fn completed(pulse_id: PulseId, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            pulse_id,
            completion_date: date,
            progress_value: Some(1.0),
            completion_percentage: Some(1.0),
        }
    }

    /// Creates a quantitative log carrying `value` toward `target`.
    pub fn with_value(pulse_id: PulseId, date: NaiveDate, value: f64, target: f64) -> Self {
        let completion_percentage = if target > 0.0 { value / target } else { 1.0 };
        Self {
            id: Uuid::new_v4(),
            pulse_id,
            completion_date: date,
            progress_value: Some(value),
            completion_percentage: Some(completion_percentage),
        }
    }

    /// Logged amount, treating a missing value as zero.
    pub fn value_or_zero(&self) -> f64 {
        self.progress_value.unwrap_or(0.0)
    }

    /// Amount counted toward a commitment; a log without a value counts once.
    pub fn commitment_amount(&self) -> f64 {
        self.progress_value.unwrap_or(1.0)
    }

    pub fn percentage_or_zero(&self) -> f64 {
        self.completion_percentage.unwrap_or(0.0)
    }
}
