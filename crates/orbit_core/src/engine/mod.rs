//! Recurrence evaluation and progress aggregation engine.
//!
//! # Responsibility
//! - Decide deterministically whether a pulse has an occurrence on a day.
//! - Resolve occurrences against progress logs and fold them into
//!   Phase/Orbit and range percentages.
//!
//! # Invariants
//! - Every function is pure: inputs are read-only snapshots, nothing is
//!   mutated and no clock is read. "Today" is always an explicit argument.
//! - Percentages never become NaN or infinite; missing targets or weights
//!   contribute zero or `None` instead.
//! - `None` progress means "not applicable" and is never coerced to 0 while
//!   aggregating.

use chrono::NaiveDate;
use std::error::Error;
use std::fmt::{Display, Formatter};

use crate::model::pulse::PulseId;

pub mod activity;
pub mod analytics;
pub mod cascade;
pub mod commitment;
pub mod completion;
pub mod period;
pub mod recurrence;

pub type EngineResult<T> = Result<T, EngineError>;

/// Programmer/upstream errors surfaced by the engine.
///
/// Malformed recurrence configuration is not an error: it evaluates as
/// inactive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Range end precedes range start.
    InvalidRange { start: NaiveDate, end: NaiveDate },
    /// More than one log exists for the same pulse and day.
    DuplicateLog { pulse_id: PulseId, date: NaiveDate },
}

impl Display for EngineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRange { start, end } => {
                write!(f, "invalid range: end ({end}) precedes start ({start})")
            }
            Self::DuplicateLog { pulse_id, date } => {
                write!(f, "duplicate progress log for pulse {pulse_id} on {date}")
            }
        }
    }
}

impl Error for EngineError {}

pub(crate) fn ensure_range(start: NaiveDate, end: NaiveDate) -> EngineResult<()> {
    if end < start {
        return Err(EngineError::InvalidRange { start, end });
    }
    Ok(())
}

/// Running `Σ(fraction × weight) / Σ(weight)` accumulator.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct WeightedAverage {
    weighted_total: f64,
    total_weight: f64,
}

impl WeightedAverage {
    pub(crate) fn add(&mut self, fraction: f64, weight: f64) {
        self.weighted_total += fraction * weight;
        self.total_weight += weight;
    }

    /// Weighted mean as a percentage, or 0 when nothing contributed.
    pub(crate) fn percentage(&self) -> f64 {
        if self.total_weight > 0.0 {
            self.weighted_total / self.total_weight * 100.0
        } else {
            0.0
        }
    }

    pub(crate) fn has_weight(&self) -> bool {
        self.total_weight > 0.0
    }
}
