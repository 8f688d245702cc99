//! Dashboard, calendar and panel views.
//!
//! # Responsibility
//! - Load one scope snapshot and evaluate the day, month and lifetime views
//!   the front end renders.
//!
//! # Invariants
//! - Per-day overall progress is the mean of non-null Orbit progress, or 0.
//! - Calendar views always span whole Monday-aligned weeks.
//! - Archived Pulses are excluded from the lifetime panel.

use crate::calendar::{end_of_month, end_of_week, start_of_month, start_of_week, weeks_in_range};
use crate::config::TrackingConfig;
use crate::engine::activity::{active_by_day, LogIndex};
use crate::engine::cascade::{cascade, OrbitProgress, PhaseProgress};
use crate::engine::commitment::{active_commitments, Commitment};
use crate::engine::completion::{resolve_day, ResolvedPulse};
use crate::engine::period::{monthly_progress, period_progress_of, weekly_progress};
use crate::engine::EngineResult;
use crate::model::hierarchy::{Orbit, Phase};
use crate::model::pulse::{OwnerScope, Pulse};
use crate::model::snapshot::TrackingSnapshot;
use crate::repo::tracking_repo::TrackingRepository;
use crate::service::{ServiceError, ServiceResult};
use chrono::NaiveDate;
use log::{error, info};
use serde::Serialize;
use std::collections::BTreeMap;
use std::iter;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DailyProgressSnapshot {
    pub snapshot_date: NaiveDate,
    pub progress: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeeklyProgressSnapshot {
    pub week_start: NaiveDate,
    pub progress: f64,
}

/// Everything the day view renders for one selected date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub date: NaiveDate,
    pub orbits: Vec<OrbitProgress>,
    pub phases: Vec<PhaseProgress>,
    pub pulses: Vec<ResolvedPulse>,
    pub commitments: Vec<Commitment>,
    pub weekly_progress: f64,
    pub monthly_progress: f64,
    pub daily_progress_for_week: Vec<DailyProgressSnapshot>,
}

/// Month grid padded to whole weeks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarView {
    pub month_start: NaiveDate,
    pub calendar_start: NaiveDate,
    pub calendar_end: NaiveDate,
    pub daily_progress: Vec<DailyProgressSnapshot>,
    pub pulses_by_day: BTreeMap<NaiveDate, Vec<ResolvedPulse>>,
    pub weekly_progress: Vec<WeeklyProgressSnapshot>,
    pub monthly_progress: f64,
    pub orbits: Vec<Orbit>,
    pub phases: Vec<Phase>,
    pub commitments: Vec<Commitment>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelPulse {
    #[serde(flatten)]
    pub pulse: Pulse,
    pub progress: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelPhase {
    #[serde(flatten)]
    pub phase: Phase,
    pub progress: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelOrbit {
    #[serde(flatten)]
    pub orbit: Orbit,
    pub progress: f64,
}

/// Lifetime progress from the configured history start through today.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelView {
    pub orbits: Vec<PanelOrbit>,
    pub phases: Vec<PanelPhase>,
    pub pulses: Vec<PanelPulse>,
}

/// Use-case service for the dashboard family of views.
pub struct DashboardService<R: TrackingRepository> {
    repo: R,
    config: TrackingConfig,
}

impl<R: TrackingRepository> DashboardService<R> {
    /// Creates a service with default tracking configuration.
    pub fn new(repo: R) -> Self {
        Self::with_config(repo, TrackingConfig::default())
    }

    pub fn with_config(repo: R, config: TrackingConfig) -> Self {
        Self { repo, config }
    }

    /// Day view for `date`; `today` bounds the monthly figure.
    pub fn dashboard(
        &self,
        scope: &OwnerScope,
        date: NaiveDate,
        today: NaiveDate,
    ) -> ServiceResult<DashboardView> {
        let started_at = Instant::now();
        let result = self
            .repo
            .load_snapshot(scope)
            .map_err(ServiceError::from)
            .and_then(|snapshot| Ok(build_dashboard(&snapshot, date, today)?));
        log_outcome("dashboard_view", started_at, &result);
        result
    }

    /// Month grid for the month containing `month`.
    pub fn calendar(
        &self,
        scope: &OwnerScope,
        month: NaiveDate,
        today: NaiveDate,
    ) -> ServiceResult<CalendarView> {
        let started_at = Instant::now();
        let result = self
            .repo
            .load_snapshot(scope)
            .map_err(ServiceError::from)
            .and_then(|snapshot| Ok(build_calendar(&snapshot, month, today)?));
        log_outcome("calendar_view", started_at, &result);
        result
    }

    /// Lifetime panel through `today`.
    ///
    /// # Errors
    /// - `ServiceError::Engine` when `today` precedes the configured history start.
    pub fn panel(&self, scope: &OwnerScope, today: NaiveDate) -> ServiceResult<PanelView> {
        let started_at = Instant::now();
        let result = self
            .repo
            .load_snapshot(scope)
            .map_err(ServiceError::from)
            .and_then(|snapshot| Ok(build_panel(&snapshot, self.config.history_start, today)?));
        log_outcome("panel_view", started_at, &result);
        result
    }
}

/// Evaluates the day view over an already loaded snapshot.
pub fn build_dashboard(
    snapshot: &TrackingSnapshot,
    date: NaiveDate,
    today: NaiveDate,
) -> EngineResult<DashboardView> {
    let logs = LogIndex::build(&snapshot.logs)?;
    let week = active_by_day(&snapshot.pulses, start_of_week(date), end_of_week(date))?;

    let mut daily_progress_for_week = Vec::with_capacity(week.len());
    let mut pulses = Vec::new();
    for (day, active) in week.iter() {
        let resolved = resolve_day(active, day, &logs);
        let progress = cascade(day, &snapshot.orbits, &snapshot.phases, &resolved).overall_progress();
        daily_progress_for_week.push(DailyProgressSnapshot {
            snapshot_date: day,
            progress,
        });
        if day == date {
            pulses = resolved;
        }
    }

    let day_cascade = cascade(date, &snapshot.orbits, &snapshot.phases, &pulses);
    let weekly = weekly_progress(date, &snapshot.pulses, &snapshot.logs, &week, &logs);
    let month = active_by_day(&snapshot.pulses, start_of_month(date), end_of_month(date))?;
    let monthly = monthly_progress(date, today, &snapshot.pulses, &snapshot.logs, &month, &logs);

    Ok(DashboardView {
        date,
        orbits: day_cascade.orbits,
        phases: day_cascade.phases,
        pulses,
        commitments: active_commitments(&snapshot.pulses, &snapshot.logs, date),
        weekly_progress: weekly,
        monthly_progress: monthly,
        daily_progress_for_week,
    })
}

/// Evaluates the month grid over an already loaded snapshot.
pub fn build_calendar(
    snapshot: &TrackingSnapshot,
    month: NaiveDate,
    today: NaiveDate,
) -> EngineResult<CalendarView> {
    let month_start = start_of_month(month);
    let calendar_start = start_of_week(month_start);
    let calendar_end = end_of_week(end_of_month(month));

    let logs = LogIndex::build(&snapshot.logs)?;
    let activity = active_by_day(&snapshot.pulses, calendar_start, calendar_end)?;

    let mut daily_progress = Vec::with_capacity(activity.len());
    let mut pulses_by_day = BTreeMap::new();
    for (day, active) in activity.iter() {
        let resolved = resolve_day(active, day, &logs);
        let progress = if resolved.is_empty() {
            0.0
        } else {
            cascade(day, &snapshot.orbits, &snapshot.phases, &resolved).overall_progress()
        };
        daily_progress.push(DailyProgressSnapshot {
            snapshot_date: day,
            progress,
        });
        pulses_by_day.insert(day, resolved);
    }

    let weekly = weeks_in_range(calendar_start, calendar_end)
        .into_iter()
        .map(|week_start| WeeklyProgressSnapshot {
            week_start,
            progress: weekly_progress(week_start, &snapshot.pulses, &snapshot.logs, &activity, &logs),
        })
        .collect();
    let monthly = monthly_progress(month, today, &snapshot.pulses, &snapshot.logs, &activity, &logs);

    Ok(CalendarView {
        month_start,
        calendar_start,
        calendar_end,
        daily_progress,
        pulses_by_day,
        weekly_progress: weekly,
        monthly_progress: monthly,
        orbits: snapshot.orbits.clone(),
        phases: snapshot.phases.clone(),
        commitments: active_commitments(&snapshot.pulses, &snapshot.logs, month),
    })
}

/// Evaluates lifetime progress over `[history_start, today]`.
///
/// Phase progress is the weight-averaged progress of its pulses and Orbit
/// progress the mean of its Phases; either is 0 when it has no children.
pub fn build_panel(
    snapshot: &TrackingSnapshot,
    history_start: NaiveDate,
    today: NaiveDate,
) -> EngineResult<PanelView> {
    let mut pulses = Vec::new();
    for pulse in snapshot.pulses.iter().filter(|pulse| !pulse.archived) {
        let progress = period_progress_of(iter::once(pulse), &snapshot.logs, history_start, today, today)?;
        pulses.push(PanelPulse {
            pulse: pulse.clone(),
            progress,
        });
    }

    let phases: Vec<PanelPhase> = snapshot
        .phases
        .iter()
        .map(|phase| {
            let (total, weight) = pulses
                .iter()
                .filter(|entry| entry.pulse.belongs_to_phase(phase.id))
                .fold((0.0, 0.0), |(total, weight), entry| {
                    let pulse_weight = entry.pulse.effective_weight();
                    (total + entry.progress * pulse_weight, weight + pulse_weight)
                });
            PanelPhase {
                phase: phase.clone(),
                progress: if weight > 0.0 { total / weight } else { 0.0 },
            }
        })
        .collect();

    let orbits = snapshot
        .orbits
        .iter()
        .map(|orbit| {
            let children: Vec<f64> = phases
                .iter()
                .filter(|entry| entry.phase.orbit_id == orbit.id)
                .map(|entry| entry.progress)
                .collect();
            let progress = if children.is_empty() {
                0.0
            } else {
                children.iter().sum::<f64>() / children.len() as f64
            };
            PanelOrbit {
                orbit: orbit.clone(),
                progress,
            }
        })
        .collect();

    Ok(PanelView {
        orbits,
        phases,
        pulses,
    })
}

fn log_outcome<T>(event: &str, started_at: Instant, result: &ServiceResult<T>) {
    match result {
        Ok(_) => info!(
            "event={} module=service status=ok duration_ms={}",
            event,
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event={} module=service status=error duration_ms={} error={}",
            event,
            started_at.elapsed().as_millis(),
            err
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::hierarchy::{Orbit, Phase};
    use crate::model::progress_log::ProgressLog;
    use crate::model::pulse::PulseKind;
    use crate::model::recurrence::RecurrenceKind;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn owner() -> OwnerScope {
        OwnerScope::User("u1".to_string())
    }

    fn daily_snapshot() -> TrackingSnapshot {
        let orbit = Orbit::new(owner(), "Health");
        let phase = Phase::new(orbit.id, "Fitness");
        let mut pulse = Pulse::new(owner(), PulseKind::Habit, "Walk", day(2025, 1, 1));
        pulse.recurrence = Some(RecurrenceKind::Daily);
        pulse.phase_ids = vec![phase.id];
        let logs = vec![
            ProgressLog::completed(pulse.id, day(2025, 1, 6)),
            ProgressLog::completed(pulse.id, day(2025, 1, 8)),
        ];
        TrackingSnapshot {
            orbits: vec![orbit],
            phases: vec![phase],
            pulses: vec![pulse],
            logs,
        }
    }

    #[test]
    fn calendar_pads_month_to_whole_weeks() {
        let view = build_calendar(&daily_snapshot(), day(2025, 1, 15), day(2025, 1, 31)).unwrap();
        assert_eq!(view.calendar_start, day(2024, 12, 30));
        assert_eq!(view.calendar_end, day(2025, 2, 2));
        assert_eq!(view.daily_progress.len(), 35);
        assert_eq!(view.weekly_progress.len(), 5);
        assert_eq!(view.daily_progress[0].progress, 0.0);
    }

    #[test]
    fn panel_defaults_childless_levels_to_zero() {
        let mut snapshot = daily_snapshot();
        let empty_orbit = Orbit::new(owner(), "Empty");
        snapshot.orbits.push(empty_orbit.clone());
        let view = build_panel(&snapshot, day(2025, 1, 6), day(2025, 1, 9)).unwrap();

        let empty = view
            .orbits
            .iter()
            .find(|entry| entry.orbit.id == empty_orbit.id)
            .unwrap();
        assert_eq!(empty.progress, 0.0);
        assert_eq!(view.pulses.len(), 1);
        assert_eq!(view.pulses[0].progress, 50.0);
        assert_eq!(view.phases[0].progress, 50.0);
    }
}
