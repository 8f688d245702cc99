//! Civil-calendar helpers shared by the recurrence engine.
//!
//! # Responsibility
//! - Compute week/month/quarter/year boundaries for calendar days.
//! - Iterate inclusive day, week and month sequences.
//!
//! # Invariants
//! - Weeks are Monday-aligned.
//! - No time-of-day component participates in any computation.

use chrono::{Datelike, Days, Months, NaiveDate};

/// Monday of the week containing `date`.
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    let offset = u64::from(date.weekday().num_days_from_monday());
    date.checked_sub_days(Days::new(offset)).unwrap_or(date)
}

/// Sunday of the week containing `date`.
pub fn end_of_week(date: NaiveDate) -> NaiveDate {
    let offset = u64::from(6 - date.weekday().num_days_from_monday());
    date.checked_add_days(Days::new(offset)).unwrap_or(date)
}

pub fn start_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn end_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(last_day_of_month(date)).unwrap_or(date)
}

/// Number of the last day (28..=31) of the month containing `date`.
pub fn last_day_of_month(date: NaiveDate) -> u32 {
    let first = start_of_month(date);
    first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .map_or(31, |last| last.day())
}

pub fn start_of_quarter(date: NaiveDate) -> NaiveDate {
    let month = (date.month0() / 3) * 3 + 1;
    NaiveDate::from_ymd_opt(date.year(), month, 1).unwrap_or(date)
}

pub fn end_of_quarter(date: NaiveDate) -> NaiveDate {
    let start = start_of_quarter(date);
    start
        .checked_add_months(Months::new(3))
        .and_then(|next| next.pred_opt())
        .unwrap_or(date)
}

pub fn start_of_year(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date)
}

pub fn end_of_year(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), 12, 31).unwrap_or(date)
}

/// Whole days from `from` to `to` (negative when `to` precedes `from`).
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// Zero-based offset between the Monday-aligned weeks of `from` and `to`.
pub fn week_offset(from: NaiveDate, to: NaiveDate) -> i64 {
    days_between(start_of_week(from), start_of_week(to)).div_euclid(7)
}

/// Calendar-month offset between the months of `from` and `to`.
pub fn month_offset(from: NaiveDate, to: NaiveDate) -> i64 {
    let from_index = i64::from(from.year()) * 12 + i64::from(from.month0());
    let to_index = i64::from(to.year()) * 12 + i64::from(to.month0());
    to_index - from_index
}

/// Whole elapsed months from `from` to `to`; a partial month does not count.
///
/// Landing on the last day of a shorter month completes the month.
pub fn whole_months_between(from: NaiveDate, to: NaiveDate) -> i64 {
    let offset = month_offset(from, to);
    if offset > 0 && to.day() < from.day() && to.day() != last_day_of_month(to) {
        offset - 1
    } else if offset < 0 && to.day() > from.day() {
        offset + 1
    } else {
        offset
    }
}

/// Inclusive overlap test between `[a_start, a_end]` and `[b_start, b_end]`.
pub fn ranges_overlap(
    a_start: NaiveDate,
    a_end: NaiveDate,
    b_start: NaiveDate,
    b_end: NaiveDate,
) -> bool {
    a_start <= b_end && b_start <= a_end
}

pub fn add_days(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_add_days(Days::new(days)).unwrap_or(NaiveDate::MAX)
}

pub fn sub_days(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_sub_days(Days::new(days)).unwrap_or(NaiveDate::MIN)
}

pub fn sub_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_sub_months(Months::new(months))
        .unwrap_or(NaiveDate::MIN)
}

/// Inclusive iterator over every calendar day in `[start, end]`.
///
/// Yields nothing when `end` precedes `start`.
#[derive(Debug, Clone)]
pub struct DayRange {
    next: Option<NaiveDate>,
    end: NaiveDate,
}

impl DayRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        let next = (start <= end).then_some(start);
        Self { next, end }
    }
}

impl Iterator for DayRange {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.succ_opt().filter(|next| *next <= self.end);
        Some(current)
    }
}

/// Mondays of every week touching `[start, end]`, starting with the week of `start`.
pub fn weeks_in_range(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut weeks = Vec::new();
    let mut current = start_of_week(start);
    while current <= end {
        weeks.push(current);
        match current.checked_add_days(Days::new(7)) {
            Some(next) => current = next,
            None => break,
        }
    }
    weeks
}

/// First days of every month touching `[start, end]`, starting with the month of `start`.
pub fn months_in_range(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut months = Vec::new();
    let mut current = start_of_month(start);
    while current <= end {
        months.push(current);
        match current.checked_add_months(Months::new(1)) {
            Some(next) => current = next,
            None => break,
        }
    }
    months
}
