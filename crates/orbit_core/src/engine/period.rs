//! Range progress: opportunity-normalized weighted percentages.
//!
//! # Responsibility
//! - Fold scheduled (per-day) and accumulative (per-period) opportunities of
//!   a pulse set into one percentage over an arbitrary closed range.
//! - Provide the week/month specializations used by dashboard views.
//!
//! # Invariants
//! - A pulse with zero opportunities contributes neither weight nor progress.
//! - Only periods that started strictly before `today` count as
//!   accumulative opportunities.
//! - Quarterly and yearly accumulative pulses contribute nothing to range
//!   aggregation.
//! - The result is 0 when no pulse contributed; it may exceed 100 when
//!   quantitative logs overshoot their targets.

use crate::calendar::{
    end_of_month, end_of_week, months_in_range, ranges_overlap, start_of_month, start_of_week,
    weeks_in_range, DayRange,
};
use crate::engine::activity::{ensure_unique_logs, ActivityIndex, LogIndex};
use crate::engine::commitment::{active_commitments, commitment_window};
use crate::engine::completion::{achieved_fraction, resolve};
use crate::engine::recurrence::is_active;
use crate::engine::{ensure_range, EngineResult, WeightedAverage};
use crate::model::progress_log::ProgressLog;
use crate::model::pulse::Pulse;
use crate::model::recurrence::CommitmentPeriod;
use chrono::NaiveDate;
use log::debug;
use std::time::Instant;

/// Weighted progress of `pulses` over `[start, end]`, as a percentage.
///
/// # Errors
/// - `EngineError::InvalidRange` when `end` precedes `start`.
/// - `EngineError::DuplicateLog` when a pulse has more than one log on a day.
pub fn period_progress(
    pulses: &[Pulse],
    logs: &[ProgressLog],
    start: NaiveDate,
    end: NaiveDate,
    today: NaiveDate,
) -> EngineResult<f64> {
    period_progress_of(pulses.iter(), logs, start, end, today)
}

/// Same as [`period_progress`] over any borrowed pulse sequence.
pub fn period_progress_of<'p>(
    pulses: impl IntoIterator<Item = &'p Pulse>,
    logs: &[ProgressLog],
    start: NaiveDate,
    end: NaiveDate,
    today: NaiveDate,
) -> EngineResult<f64> {
    ensure_range(start, end)?;
    ensure_unique_logs(logs)?;
    let started_at = Instant::now();

    let mut average = WeightedAverage::default();
    let mut considered = 0usize;
    for pulse in pulses {
        let Some(start_date) = pulse.start_date else {
            continue;
        };
        if !overlaps_range(pulse, start_date, start, end) {
            continue;
        }
        considered += 1;

        let window_start = start_date.max(start);
        let achieved = if pulse.is_accumulative() {
            accumulative_achievement(pulse, logs, window_start, end, today)
        } else {
            scheduled_achievement(pulse, logs, window_start, end)
        };
        if let Some(fraction) = achieved {
            average.add(fraction, pulse.effective_weight());
        }
    }

    debug!(
        "event=period_progress module=engine status=ok start={} end={} pulses={} contributed={} duration_ms={}",
        start,
        end,
        considered,
        average.has_weight(),
        started_at.elapsed().as_millis()
    );
    Ok(average.percentage())
}

/// Active interval `[start_date, due_date]` overlaps `[start, end]` and
/// archival did not happen before the range.
fn overlaps_range(pulse: &Pulse, start_date: NaiveDate, start: NaiveDate, end: NaiveDate) -> bool {
    if pulse.archived && pulse.archived_at.is_some_and(|archived_at| archived_at < start) {
        return false;
    }
    let active_end = pulse.due_date.unwrap_or(NaiveDate::MAX);
    ranges_overlap(start, end, start_date, active_end)
}

/// Achieved fraction over per-day opportunities, or `None` when there are none.
fn scheduled_achievement(
    pulse: &Pulse,
    logs: &[ProgressLog],
    window_start: NaiveDate,
    end: NaiveDate,
) -> Option<f64> {
    let opportunities = DayRange::new(window_start, end)
        .filter(|day| is_active(pulse, *day))
        .count();
    if opportunities == 0 {
        return None;
    }

    let window_logs = logs.iter().filter(|log| {
        log.pulse_id == pulse.id
            && window_start <= log.completion_date
            && log.completion_date <= end
    });

    if pulse.is_quantitative() {
        let total: f64 = window_logs.map(ProgressLog::value_or_zero).sum();
        let total_target = pulse.target_or_default() * opportunities as f64;
        Some(if total_target > 0.0 {
            total / total_target
        } else {
            0.0
        })
    } else {
        let satisfied = window_logs
            .filter(|log| is_active(pulse, log.completion_date))
            .count();
        Some(satisfied as f64 / opportunities as f64)
    }
}

/// Mean per-period achievement over started weeks or months.
fn accumulative_achievement(
    pulse: &Pulse,
    logs: &[ProgressLog],
    window_start: NaiveDate,
    end: NaiveDate,
    today: NaiveDate,
) -> Option<f64> {
    let periods: Vec<(NaiveDate, NaiveDate)> = match pulse.commitment_period()? {
        CommitmentPeriod::Week => weeks_in_range(window_start, end)
            .into_iter()
            .map(|week| (week, end_of_week(week)))
            .collect(),
        CommitmentPeriod::Month => months_in_range(window_start, end)
            .into_iter()
            .map(|month| (month, end_of_month(month)))
            .collect(),
        // TODO: decide normalization for quarterly/yearly commitments before counting them.
        CommitmentPeriod::Quarter | CommitmentPeriod::Year => return None,
    };

    let target = pulse.target_or_default();
    let mut opportunities = 0usize;
    let mut total = 0.0;
    for (period_start, period_end) in periods {
        if period_start >= today || commitment_window(pulse, period_start).is_none() {
            continue;
        }
        opportunities += 1;
        let period_logs = logs.iter().filter(|log| {
            log.pulse_id == pulse.id
                && period_start <= log.completion_date
                && log.completion_date <= period_end
        });
        let achieved = if pulse.is_quantitative() {
            period_logs.map(ProgressLog::value_or_zero).sum::<f64>()
        } else {
            period_logs.count() as f64
        };
        if target > 0.0 {
            total += achieved / target;
        }
    }

    (opportunities > 0).then(|| total / opportunities as f64)
}

/// Progress of the Monday-aligned week containing `reference`.
///
/// Scheduled occurrences come from the prebuilt `activity` and `logs_by_day`
/// indexes; weekly commitments are folded in with the same weighting.
pub fn weekly_progress(
    reference: NaiveDate,
    pulses: &[Pulse],
    logs: &[ProgressLog],
    activity: &ActivityIndex<'_>,
    logs_by_day: &LogIndex<'_>,
) -> f64 {
    let week_start = start_of_week(reference);
    let week_end = end_of_week(reference);

    let mut average = WeightedAverage::default();
    fold_scheduled_days(&mut average, week_start, week_end, activity, logs_by_day);

    for commitment in active_commitments(pulses, logs, week_start)
        .iter()
        .filter(|commitment| commitment.window.period == CommitmentPeriod::Week)
    {
        average.add(
            commitment.achieved_fraction(),
            commitment.pulse.effective_weight(),
        );
    }

    average.percentage()
}

/// Progress of the calendar month containing `reference`, up to `today`.
///
/// Months entirely after `today` report 0. The current month is evaluated
/// from its first day through `today`.
pub fn monthly_progress(
    reference: NaiveDate,
    today: NaiveDate,
    pulses: &[Pulse],
    logs: &[ProgressLog],
    activity: &ActivityIndex<'_>,
    logs_by_day: &LogIndex<'_>,
) -> f64 {
    let month_start = start_of_month(reference);
    if month_start > today {
        return 0.0;
    }
    let month_end = end_of_month(reference);
    let calculation_end = month_end.min(today);

    let mut average = WeightedAverage::default();
    fold_scheduled_days(&mut average, month_start, calculation_end, activity, logs_by_day);

    for commitment in active_commitments(pulses, logs, month_start) {
        let pulse = &commitment.pulse;
        let target = pulse.target_or_default();
        let fraction = match commitment.window.period {
            CommitmentPeriod::Week => {
                let mut weeks = 0usize;
                let mut total = 0.0;
                for week_start in weeks_in_range(month_start, calculation_end) {
                    if commitment_window(pulse, week_start).is_none() {
                        continue;
                    }
                    weeks += 1;
                    let week_end = end_of_week(week_start).min(calculation_end);
                    let value = sum_values(logs, pulse, week_start, week_end);
                    if target > 0.0 {
                        total += value / target;
                    }
                }
                if weeks > 0 {
                    total / weeks as f64
                } else {
                    0.0
                }
            }
            _ => {
                let value = sum_values(logs, pulse, month_start, calculation_end);
                if target > 0.0 {
                    value / target
                } else {
                    0.0
                }
            }
        };
        average.add(fraction, pulse.effective_weight());
    }

    average.percentage()
}

fn fold_scheduled_days(
    average: &mut WeightedAverage,
    start: NaiveDate,
    end: NaiveDate,
    activity: &ActivityIndex<'_>,
    logs_by_day: &LogIndex<'_>,
) {
    for day in DayRange::new(start, end) {
        let logs_for_day = logs_by_day.logs_on(day);
        for pulse in activity.active_on(day) {
            let occurrence = resolve(pulse, day, logs_for_day);
            average.add(achieved_fraction(pulse, &occurrence), pulse.effective_weight());
        }
    }
}

fn sum_values(logs: &[ProgressLog], pulse: &Pulse, start: NaiveDate, end: NaiveDate) -> f64 {
    logs.iter()
        .filter(|log| log.pulse_id == pulse.id && start <= log.completion_date && log.completion_date <= end)
        .map(ProgressLog::value_or_zero)
        .sum()
}
