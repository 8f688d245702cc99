//! Recurrence rule evaluator.
//!
//! # Responsibility
//! - Answer "does this pulse have an occurrence on this day?".
//!
//! # Invariants
//! - Total and deterministic over any pulse and day; never panics.
//! - Incomplete rule configuration (missing interval, day set or
//!   day-of-month) evaluates as inactive.
//! - Accumulative kinds are never active on a single day.

use crate::calendar::{add_days, days_between, last_day_of_month, week_offset, whole_months_between};
use crate::model::pulse::Pulse;
use crate::model::recurrence::RecurrenceKind;
use chrono::{Datelike, NaiveDate};

/// Active window length for a one-off pulse with neither due date nor completion.
pub const ONE_OFF_HORIZON_DAYS: u64 = 3650;

/// Returns whether `pulse` has an occurrence on `date`.
pub fn is_active(pulse: &Pulse, date: NaiveDate) -> bool {
    let Some(start_date) = pulse.start_date else {
        return false;
    };
    if pulse.is_archived_on(date) {
        return false;
    }
    if pulse.is_one_off() {
        return is_one_off_active(pulse, start_date, date);
    }
    let Some(kind) = pulse.recurrence.as_ref() else {
        return false;
    };

    if date < start_date || pulse.due_date.is_some_and(|due| date > due) {
        return false;
    }

    match kind {
        RecurrenceKind::Daily => true,
        RecurrenceKind::WeeklyFixedDays => pulse
            .recurrence_days
            .is_some_and(|days| days.contains(date.weekday())),
        RecurrenceKind::DayInterval => interval(pulse).is_some_and(|interval| {
            let offset = days_between(start_date, date);
            offset >= 0 && offset % interval == 0
        }),
        RecurrenceKind::WeeklyIntervalFixedDays => {
            let (Some(interval), Some(days)) = (interval(pulse), pulse.recurrence_days) else {
                return false;
            };
            let offset = week_offset(start_date, date);
            offset >= 0 && offset % interval == 0 && days.contains(date.weekday())
        }
        RecurrenceKind::MonthlyFixedDay => pulse
            .recurrence_day_of_month
            .is_some_and(|day| is_clamped_day_of_month(date, day)),
        RecurrenceKind::MonthlyIntervalFixedDay => {
            let (Some(interval), Some(day)) = (interval(pulse), pulse.recurrence_day_of_month)
            else {
                return false;
            };
            let offset = whole_months_between(start_date, date);
            offset >= 0 && offset % interval == 0 && is_clamped_day_of_month(date, day)
        }
        RecurrenceKind::YearlyFixedDate => is_anniversary(start_date, date),
        RecurrenceKind::Once
        | RecurrenceKind::WeeklyAccumulative
        | RecurrenceKind::WeeklyAccumulativeRecurrent
        | RecurrenceKind::MonthlyAccumulative
        | RecurrenceKind::MonthlyAccumulativeRecurrent
        | RecurrenceKind::QuarterlyAccumulative
        | RecurrenceKind::YearlyAccumulative
        | RecurrenceKind::Unknown(_) => false,
    }
}

/// One-off pulses move to their completion day once completed.
fn is_one_off_active(pulse: &Pulse, start_date: NaiveDate, date: NaiveDate) -> bool {
    if let Some(completed_on) = pulse.completion_date {
        return date == completed_on;
    }
    if date < start_date {
        return false;
    }
    match pulse.due_date {
        Some(due) => date <= due,
        // Overdue but still active, capped to keep ranges finite.
        None => date <= add_days(start_date, ONE_OFF_HORIZON_DAYS),
    }
}

fn interval(pulse: &Pulse) -> Option<i64> {
    pulse
        .recurrence_interval
        .filter(|interval| *interval > 0)
        .map(i64::from)
}

/// Day `configured` of the month, clamped onto shorter months.
fn is_clamped_day_of_month(date: NaiveDate, configured: u32) -> bool {
    configured >= 1 && date.day() == configured.min(last_day_of_month(date))
}

/// Same month and day as `anchor`; Feb 29 anchors fire on Feb 28 in common years.
fn is_anniversary(anchor: NaiveDate, date: NaiveDate) -> bool {
    if anchor.month() == date.month() && anchor.day() == date.day() {
        return true;
    }
    let anchored_on_leap_day = anchor.month() == 2 && anchor.day() == 29;
    anchored_on_leap_day
        && date.month() == 2
        && date.day() == 28
        && NaiveDate::from_ymd_opt(date.year(), 2, 29).is_none()
}
