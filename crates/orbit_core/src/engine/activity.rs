//! Per-day indexes over a fixed window.
//!
//! # Responsibility
//! - Precompute which pulses are active on each day of a range.
//! - Group progress logs by calendar day.
//!
//! # Invariants
//! - Every day of the indexed range has an entry, possibly empty.
//! - A `LogIndex` never holds two logs for the same pulse and day.

use crate::calendar::DayRange;
use crate::engine::recurrence::is_active;
use crate::engine::{ensure_range, EngineError, EngineResult};
use crate::model::progress_log::ProgressLog;
use crate::model::pulse::{Pulse, PulseId};
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Day → active pulses over a closed range.
#[derive(Debug, Clone)]
pub struct ActivityIndex<'a> {
    start: NaiveDate,
    end: NaiveDate,
    days: BTreeMap<NaiveDate, Vec<&'a Pulse>>,
}

/// Builds the day → active pulses index for `[start, end]`.
///
/// Costs O(days × pulses) rule evaluations; callers sharing a window should
/// build it once.
pub fn active_by_day<'a>(
    pulses: &'a [Pulse],
    start: NaiveDate,
    end: NaiveDate,
) -> EngineResult<ActivityIndex<'a>> {
    ensure_range(start, end)?;

    let mut days: BTreeMap<NaiveDate, Vec<&'a Pulse>> =
        DayRange::new(start, end).map(|day| (day, Vec::new())).collect();

    for pulse in pulses {
        for (day, active) in days.iter_mut() {
            if is_active(pulse, *day) {
                active.push(pulse);
            }
        }
    }

    Ok(ActivityIndex { start, end, days })
}

impl<'a> ActivityIndex<'a> {
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Pulses active on `day`; empty when `day` is outside the range.
    pub fn active_on(&self, day: NaiveDate) -> &[&'a Pulse] {
        self.days.get(&day).map_or(&[], Vec::as_slice)
    }

    /// Days in ascending order with their active pulses.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, &[&'a Pulse])> + '_ {
        self.days.iter().map(|(day, pulses)| (*day, pulses.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

/// Day → logs lookup.
#[derive(Debug, Clone, Default)]
pub struct LogIndex<'a> {
    by_day: HashMap<NaiveDate, Vec<&'a ProgressLog>>,
}

impl<'a> LogIndex<'a> {
    /// Groups `logs` by completion day.
    ///
    /// # Errors
    /// - `EngineError::DuplicateLog` when two logs share a pulse and day.
    pub fn build(logs: &'a [ProgressLog]) -> EngineResult<Self> {
        ensure_unique_logs(logs)?;
        let mut by_day: HashMap<NaiveDate, Vec<&'a ProgressLog>> = HashMap::new();
        for log in logs {
            by_day.entry(log.completion_date).or_default().push(log);
        }
        Ok(Self { by_day })
    }

    pub fn logs_on(&self, day: NaiveDate) -> &[&'a ProgressLog] {
        self.by_day.get(&day).map_or(&[], Vec::as_slice)
    }

    pub fn find(&self, pulse_id: PulseId, day: NaiveDate) -> Option<&'a ProgressLog> {
        self.logs_on(day)
            .iter()
            .copied()
            .find(|log| log.pulse_id == pulse_id)
    }
}

/// Checks the one-log-per-pulse-per-day invariant.
pub fn ensure_unique_logs(logs: &[ProgressLog]) -> EngineResult<()> {
    let mut seen = HashSet::with_capacity(logs.len());
    for log in logs {
        if !seen.insert((log.pulse_id, log.completion_date)) {
            return Err(EngineError::DuplicateLog {
                pulse_id: log.pulse_id,
                date: log.completion_date,
            });
        }
    }
    Ok(())
}
