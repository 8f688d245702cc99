//! Analytics use-case service.
//!
//! # Responsibility
//! - Resolve filter input into a date range, a target pulse set and the
//!   entities charted next to the overall series.
//! - Delegate series and KPI evaluation to the analytics engine.
//!
//! # Invariants
//! - Only logs inside the resolved range are considered.
//! - Group membership follows Phase links: an Orbit group holds every pulse
//!   linked to any of its Phases.

use crate::calendar::{start_of_year, sub_days, sub_months};
use crate::config::TrackingConfig;
use crate::engine::analytics::{analytics_report, AnalyticsReport, SeriesGroup, TimeScale};
use crate::engine::EngineResult;
use crate::model::hierarchy::{OrbitId, PhaseId};
use crate::model::progress_log::ProgressLog;
use crate::model::pulse::{OwnerScope, Pulse, PulseId};
use crate::model::snapshot::TrackingSnapshot;
use crate::repo::tracking_repo::TrackingRepository;
use crate::service::{ServiceError, ServiceResult};
use chrono::NaiveDate;
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Entity level the breakdown is grouped by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalyticsLevel {
    #[default]
    Orbits,
    Phases,
    Pulses,
}

/// Requested time window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimePeriod {
    /// From the first logged day, or the start of the current year.
    All,
    #[default]
    #[serde(rename = "last30d")]
    RecentDays,
    #[serde(rename = "last3m")]
    RecentMonths,
    Custom { from: NaiveDate, to: NaiveDate },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsFilters {
    pub level: AnalyticsLevel,
    pub time_period: TimePeriod,
    pub scale: Option<TimeScale>,
    pub orbit_id: Option<OrbitId>,
    pub phase_id: Option<PhaseId>,
    pub pulse_id: Option<PulseId>,
}

/// Use-case service for analytics charts.
pub struct AnalyticsService<R: TrackingRepository> {
    repo: R,
    config: TrackingConfig,
}

impl<R: TrackingRepository> AnalyticsService<R> {
    pub fn new(repo: R) -> Self {
        Self::with_config(repo, TrackingConfig::default())
    }

    pub fn with_config(repo: R, config: TrackingConfig) -> Self {
        Self { repo, config }
    }

    /// Builds the chart series and KPIs for `filters` as of `today`.
    pub fn analytics(
        &self,
        scope: &OwnerScope,
        filters: &AnalyticsFilters,
        today: NaiveDate,
    ) -> ServiceResult<AnalyticsReport> {
        let started_at = Instant::now();
        let result = self
            .repo
            .load_snapshot(scope)
            .map_err(ServiceError::from)
            .and_then(|snapshot| Ok(build_analytics(&snapshot, filters, &self.config, today)?));

        match &result {
            Ok(report) => info!(
                "event=analytics_view module=service status=ok level={:?} points={} duration_ms={}",
                filters.level,
                report.series.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=analytics_view module=service status=error level={:?} duration_ms={} error={}",
                filters.level,
                started_at.elapsed().as_millis(),
                err
            ),
        }
        result
    }
}

/// Evaluates analytics over an already loaded snapshot.
pub fn build_analytics(
    snapshot: &TrackingSnapshot,
    filters: &AnalyticsFilters,
    config: &TrackingConfig,
    today: NaiveDate,
) -> EngineResult<AnalyticsReport> {
    let (start, end) = resolve_range(filters.time_period, &snapshot.logs, config, today);
    let logs: Vec<ProgressLog> = snapshot
        .logs
        .iter()
        .filter(|log| start <= log.completion_date && log.completion_date <= end)
        .cloned()
        .collect();

    let (target, groups) = select_entities(snapshot, filters);
    analytics_report(
        &target,
        &groups,
        &logs,
        start,
        end,
        filters.scale.unwrap_or(TimeScale::Daily),
        today,
    )
}

/// Closed date range for `period`; custom ranges are taken as given.
pub fn resolve_range(
    period: TimePeriod,
    logs: &[ProgressLog],
    config: &TrackingConfig,
    today: NaiveDate,
) -> (NaiveDate, NaiveDate) {
    match period {
        TimePeriod::All => {
            let first_log = logs.iter().map(|log| log.completion_date).min();
            (first_log.unwrap_or_else(|| start_of_year(today)), today)
        }
        TimePeriod::RecentDays => (
            sub_days(today, u64::from(config.recent_days.saturating_sub(1))),
            today,
        ),
        TimePeriod::RecentMonths => (sub_months(today, config.recent_months), today),
        TimePeriod::Custom { from, to } => (from, to),
    }
}

/// Target pulse set and charted groups for the requested level and ids.
fn select_entities<'a>(
    snapshot: &'a TrackingSnapshot,
    filters: &AnalyticsFilters,
) -> (Vec<&'a Pulse>, Vec<SeriesGroup<'a>>) {
    let all: Vec<&Pulse> = snapshot.pulses.iter().collect();
    let in_phase = move |phase_id: PhaseId| -> Vec<&'a Pulse> {
        snapshot
            .pulses
            .iter()
            .filter(|pulse| pulse.belongs_to_phase(phase_id))
            .collect()
    };
    let orbit_phases = move |orbit_id: OrbitId| -> Vec<PhaseId> {
        snapshot
            .phases
            .iter()
            .filter(|phase| phase.orbit_id == orbit_id)
            .map(|phase| phase.id)
            .collect()
    };
    let in_any_phase = move |phase_ids: &[PhaseId]| -> Vec<&'a Pulse> {
        snapshot
            .pulses
            .iter()
            .filter(|pulse| pulse.phase_ids.iter().any(|id| phase_ids.contains(id)))
            .collect()
    };
    let pulse_groups = move |pulses: &[&'a Pulse]| -> Vec<SeriesGroup<'a>> {
        pulses
            .iter()
            .map(|pulse| SeriesGroup {
                title: pulse.title.clone(),
                pulses: vec![*pulse],
            })
            .collect()
    };
    let phase_groups = move |phase_filter: &dyn Fn(PhaseId, OrbitId) -> bool| -> Vec<SeriesGroup<'a>> {
        snapshot
            .phases
            .iter()
            .filter(|phase| phase_filter(phase.id, phase.orbit_id))
            .map(|phase| SeriesGroup {
                title: phase.title.clone(),
                pulses: in_phase(phase.id),
            })
            .collect()
    };
    let orbit_groups = move |orbit_filter: &dyn Fn(OrbitId) -> bool| -> Vec<SeriesGroup<'a>> {
        snapshot
            .orbits
            .iter()
            .filter(|orbit| orbit_filter(orbit.id))
            .map(|orbit| SeriesGroup {
                title: orbit.title.clone(),
                pulses: in_any_phase(&orbit_phases(orbit.id)),
            })
            .collect()
    };

    match filters.level {
        AnalyticsLevel::Pulses => {
            let target = if let Some(pulse_id) = filters.pulse_id {
                all.into_iter().filter(|pulse| pulse.id == pulse_id).collect()
            } else if let Some(phase_id) = filters.phase_id {
                in_phase(phase_id)
            } else if let Some(orbit_id) = filters.orbit_id {
                in_any_phase(&orbit_phases(orbit_id))
            } else {
                all
            };
            let groups = pulse_groups(&target);
            (target, groups)
        }
        AnalyticsLevel::Phases => {
            if let Some(phase_id) = filters.phase_id {
                (in_phase(phase_id), phase_groups(&|id, _| id == phase_id))
            } else if let Some(orbit_id) = filters.orbit_id {
                (
                    in_any_phase(&orbit_phases(orbit_id)),
                    phase_groups(&|_, parent| parent == orbit_id),
                )
            } else {
                (all, phase_groups(&|_, _| true))
            }
        }
        AnalyticsLevel::Orbits => {
            if let Some(orbit_id) = filters.orbit_id {
                (
                    in_any_phase(&orbit_phases(orbit_id)),
                    orbit_groups(&|id| id == orbit_id),
                )
            } else {
                (all, orbit_groups(&|_| true))
            }
        }
    }
}
