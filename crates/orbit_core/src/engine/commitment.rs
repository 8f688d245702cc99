//! Commitment evaluator for period-accumulative pulses.
//!
//! # Responsibility
//! - Decide which accumulative pulses are in scope for the week, month or
//!   quarter containing a reference day.
//! - Sum the period's logs into a running total and completion flag.
//!
//! # Invariants
//! - Only accumulative pulses ever produce a commitment.
//! - Yearly accumulative pulses are never in scope.
//! - Recurrent variants require a positive interval; without one they are
//!   out of scope.

use crate::calendar::{
    end_of_month, end_of_quarter, end_of_week, end_of_year, month_offset, ranges_overlap,
    start_of_month, start_of_quarter, start_of_week, start_of_year, week_offset,
};
use crate::model::progress_log::ProgressLog;
use crate::model::pulse::Pulse;
use crate::model::recurrence::CommitmentPeriod;
use chrono::NaiveDate;
use serde::Serialize;

/// Closed calendar window of one commitment period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PeriodWindow {
    pub period: CommitmentPeriod,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl PeriodWindow {
    /// Window of `period` granularity containing `date`.
    pub fn containing(period: CommitmentPeriod, date: NaiveDate) -> Self {
        let (start, end) = match period {
            CommitmentPeriod::Week => (start_of_week(date), end_of_week(date)),
            CommitmentPeriod::Month => (start_of_month(date), end_of_month(date)),
            CommitmentPeriod::Quarter => (start_of_quarter(date), end_of_quarter(date)),
            CommitmentPeriod::Year => (start_of_year(date), end_of_year(date)),
        };
        Self { period, start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Derived view of an accumulative pulse for one period.
///
/// Kept separate from `Pulse` so the stored entity never grows derived fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Commitment {
    #[serde(flatten)]
    pub pulse: Pulse,
    pub window: PeriodWindow,
    pub logs: Vec<ProgressLog>,
    pub current_progress_value: f64,
    /// Completed for the whole period, not just for the reference day.
    pub completed_for_period: bool,
}

impl Commitment {
    /// `current_progress_value / target`, or 0 when the target is not positive.
    pub fn achieved_fraction(&self) -> f64 {
        let target = self.pulse.target_or_default();
        if target > 0.0 {
            self.current_progress_value / target
        } else {
            0.0
        }
    }
}

/// Returns the period window in which `pulse` is an active commitment on
/// `reference`, or `None` when it is not in scope.
pub fn commitment_window(pulse: &Pulse, reference: NaiveDate) -> Option<PeriodWindow> {
    let period = pulse.commitment_period()?;
    let start_date = pulse.start_date?;
    if pulse.is_archived_on(reference) {
        return None;
    }
    if period == CommitmentPeriod::Year {
        return None;
    }

    let window = PeriodWindow::containing(period, reference);
    if pulse.due_date.is_some_and(|due| due < window.start) {
        return None;
    }
    let active_end = pulse.due_date.unwrap_or(NaiveDate::MAX);
    if !ranges_overlap(window.start, window.end, start_date, active_end) {
        return None;
    }

    let recurrent = pulse
        .recurrence
        .as_ref()
        .is_some_and(|kind| kind.is_recurrent_commitment());
    if !recurrent {
        return Some(window);
    }

    let interval = i64::from(pulse.recurrence_interval.filter(|interval| *interval > 0)?);
    let offset = match period {
        CommitmentPeriod::Week => week_offset(start_date, window.start),
        CommitmentPeriod::Month => month_offset(start_date, window.start),
        CommitmentPeriod::Quarter | CommitmentPeriod::Year => return Some(window),
    };
    (offset >= 0 && offset % interval == 0).then_some(window)
}

/// Accumulative pulses in scope on `reference`, with their period totals.
///
/// `logs` must already satisfy the one-log-per-pulse-per-day invariant; callers
/// holding unchecked input run [`ensure_unique_logs`] first.
///
/// [`ensure_unique_logs`]: crate::engine::activity::ensure_unique_logs
pub fn active_commitments(
    pulses: &[Pulse],
    logs: &[ProgressLog],
    reference: NaiveDate,
) -> Vec<Commitment> {
    pulses
        .iter()
        .filter_map(|pulse| {
            let window = commitment_window(pulse, reference)?;
            Some(evaluate(pulse, window, logs))
        })
        .collect()
}

/// Folds the logs of `pulse` that fall inside `window`.
pub fn evaluate(pulse: &Pulse, window: PeriodWindow, logs: &[ProgressLog]) -> Commitment {
    let period_logs: Vec<ProgressLog> = logs
        .iter()
        .filter(|log| log.pulse_id == pulse.id && window.contains(log.completion_date))
        .cloned()
        .collect();

    let current_progress_value: f64 = period_logs.iter().map(ProgressLog::commitment_amount).sum();
    let target = pulse.target_or_default();
    let completed_for_period = if target > 0.0 {
        current_progress_value >= target
    } else {
        current_progress_value > 0.0
    };

    Commitment {
        pulse: pulse.clone(),
        window,
        logs: period_logs,
        current_progress_value,
        completed_for_period,
    }
}
