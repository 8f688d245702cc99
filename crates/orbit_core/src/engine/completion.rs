//! Completion resolver.
//!
//! # Responsibility
//! - Merge a day's active pulses with that day's logs into per-occurrence
//!   completion state.
//!
//! # Invariants
//! - Resolution only reads the log matching the pulse; other pulses' logs
//!   never influence the result.
//! - The stored `Pulse` is copied into the view, never mutated.

use crate::engine::activity::LogIndex;
use crate::engine::recurrence::is_active;
use crate::model::progress_log::ProgressLog;
use crate::model::pulse::Pulse;
use chrono::NaiveDate;
use serde::Serialize;

/// Completion state of one occurrence on one day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResolvedOccurrence {
    pub completed_today: bool,
    pub current_progress_value: Option<f64>,
    pub effective_completion_date: Option<NaiveDate>,
}

/// Pulse paired with its resolved occurrence for a given day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedPulse {
    #[serde(flatten)]
    pub pulse: Pulse,
    #[serde(flatten)]
    pub occurrence: ResolvedOccurrence,
}

impl ResolvedPulse {
    /// Fraction of the day's goal achieved, used by every weighted sum.
    ///
    /// Quantitative pulses with a positive target report `value / target`
    /// (unclamped); everything else reports 1 when completed, else 0.
    /// A quantitative pulse without a positive target (rejected by
    /// validation) therefore scores 1|0 rather than its raw value.
    pub fn achieved_fraction(&self) -> f64 {
        achieved_fraction(&self.pulse, &self.occurrence)
    }
}

pub(crate) fn achieved_fraction(pulse: &Pulse, occurrence: &ResolvedOccurrence) -> f64 {
    if pulse.is_quantitative() {
        if let Some(target) = pulse.positive_target() {
            return occurrence.current_progress_value.unwrap_or(0.0) / target;
        }
    }
    if occurrence.completed_today {
        1.0
    } else {
        0.0
    }
}

/// Resolves `pulse` on `day` against the logs recorded for that day.
pub fn resolve(pulse: &Pulse, day: NaiveDate, logs_for_day: &[&ProgressLog]) -> ResolvedOccurrence {
    let log = logs_for_day
        .iter()
        .copied()
        .find(|log| log.pulse_id == pulse.id);

    let completed_today = match log {
        None => false,
        Some(log) => match (pulse.is_quantitative(), pulse.positive_target()) {
            (true, Some(target)) => log.value_or_zero() >= target,
            _ => log.percentage_or_zero() >= 1.0,
        },
    };

    let effective_completion_date = if log.is_some() {
        Some(day)
    } else if pulse.is_one_off_task() {
        pulse.completion_date
    } else {
        None
    };

    ResolvedOccurrence {
        completed_today,
        current_progress_value: log.and_then(|log| log.progress_value),
        effective_completion_date,
    }
}

/// Resolves each of `pulses` on `day` using a prebuilt log index.
pub fn resolve_day(pulses: &[&Pulse], day: NaiveDate, logs: &LogIndex<'_>) -> Vec<ResolvedPulse> {
    let logs_for_day = logs.logs_on(day);
    pulses
        .iter()
        .map(|pulse| ResolvedPulse {
            pulse: (*pulse).clone(),
            occurrence: resolve(pulse, day, logs_for_day),
        })
        .collect()
}

/// Filters `pulses` to those active on `date` and resolves them.
///
/// Expects at most one log per pulse on `date`; only the first is read.
pub fn pulses_for_date(pulses: &[Pulse], logs: &[ProgressLog], date: NaiveDate) -> Vec<ResolvedPulse> {
    let logs_for_day: Vec<&ProgressLog> = logs
        .iter()
        .filter(|log| log.completion_date == date)
        .collect();
    pulses
        .iter()
        .filter(|pulse| is_active(pulse, date))
        .map(|pulse| ResolvedPulse {
            pulse: pulse.clone(),
            occurrence: resolve(pulse, date, &logs_for_day),
        })
        .collect()
}
