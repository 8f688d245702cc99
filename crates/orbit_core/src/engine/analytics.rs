//! Analytics time-series driver.
//!
//! # Responsibility
//! - Split an overall range into day/week/month sub-intervals and evaluate
//!   range progress once per sub-interval and per grouped entity.
//! - Derive summary KPIs from the resulting series.
//!
//! # Invariants
//! - Sub-interval ends are clamped to the overall range end.
//! - Series and KPI percentages are rounded to whole numbers.

use crate::calendar::{end_of_month, end_of_week, months_in_range, weeks_in_range, DayRange};
use crate::engine::period::period_progress_of;
use crate::engine::{ensure_range, EngineResult};
use crate::model::progress_log::ProgressLog;
use crate::model::pulse::Pulse;
use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;

/// Granularity of analytics sub-intervals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeScale {
    Daily,
    Weekly,
    Monthly,
}

/// Named pulse subset charted alongside the overall series.
#[derive(Debug, Clone)]
pub struct SeriesGroup<'a> {
    pub title: String,
    pub pulses: Vec<&'a Pulse>,
}

/// One chart point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub period_label: String,
    #[serde(skip)]
    pub period_start: NaiveDate,
    pub overall_percentage: f64,
    /// Per-group percentages keyed by group title.
    #[serde(flatten)]
    pub breakdown: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodScore {
    /// `None` when no sub-interval qualified.
    pub label: Option<String>,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsKpis {
    pub overall_progress: f64,
    pub consistency: f64,
    pub average_progress: f64,
    pub best_period: PeriodScore,
    pub worst_period: PeriodScore,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsReport {
    pub series: Vec<SeriesPoint>,
    pub kpis: AnalyticsKpis,
}

/// Sub-intervals of `[start, end]` at `scale`, each clamped to `end`.
///
/// Weekly and monthly intervals begin at the aligned boundary containing
/// `start`, so the first interval may open before `start`.
pub fn sub_intervals(
    start: NaiveDate,
    end: NaiveDate,
    scale: TimeScale,
) -> EngineResult<Vec<(NaiveDate, NaiveDate)>> {
    ensure_range(start, end)?;
    let intervals = match scale {
        TimeScale::Daily => DayRange::new(start, end).map(|day| (day, day)).collect(),
        TimeScale::Weekly => weeks_in_range(start, end)
            .into_iter()
            .map(|week| (week, end_of_week(week).min(end)))
            .collect(),
        TimeScale::Monthly => months_in_range(start, end)
            .into_iter()
            .map(|month| (month, end_of_month(month).min(end)))
            .collect(),
    };
    Ok(intervals)
}

/// Builds the chart series and KPI bundle for `target` pulses.
///
/// # Errors
/// - `EngineError::InvalidRange` when `end` precedes `start`.
pub fn analytics_report(
    target: &[&Pulse],
    groups: &[SeriesGroup<'_>],
    logs: &[ProgressLog],
    start: NaiveDate,
    end: NaiveDate,
    scale: TimeScale,
    today: NaiveDate,
) -> EngineResult<AnalyticsReport> {
    let started_at = Instant::now();
    let intervals = sub_intervals(start, end, scale)?;

    let mut series = Vec::with_capacity(intervals.len());
    for (interval_start, interval_end) in intervals {
        let overall = period_progress_of(
            target.iter().copied(),
            logs,
            interval_start,
            interval_end,
            today,
        )?;

        let mut breakdown = BTreeMap::new();
        for group in groups {
            let progress = period_progress_of(
                group.pulses.iter().copied(),
                logs,
                interval_start,
                interval_end,
                today,
            )?;
            breakdown.insert(group.title.clone(), progress.round());
        }

        series.push(SeriesPoint {
            period_label: interval_start.format("%Y-%m-%d").to_string(),
            period_start: interval_start,
            overall_percentage: overall.round(),
            breakdown,
        });
    }

    let overall = period_progress_of(target.iter().copied(), logs, start, end, today)?;
    let kpis = summarize(&series, overall);

    debug!(
        "event=analytics_report module=engine status=ok scale={:?} intervals={} groups={} duration_ms={}",
        scale,
        series.len(),
        groups.len(),
        started_at.elapsed().as_millis()
    );

    Ok(AnalyticsReport { series, kpis })
}

/// Derives KPIs from a rounded series and the overall range percentage.
///
/// - Best: highest percentage, later intervals win ties.
/// - Worst: lowest nonzero percentage, later intervals win ties; 0 when the
///   series never shows activity.
/// - Average: mean over intervals with nonzero activity.
/// - Consistency: share of intervals with nonzero activity.
pub fn summarize(series: &[SeriesPoint], overall: f64) -> AnalyticsKpis {
    let mut best = PeriodScore {
        label: None,
        value: 0.0,
    };
    let mut worst = PeriodScore {
        label: None,
        value: 100.0,
    };
    let mut active_total = 0.0;
    let mut active_count = 0usize;

    for point in series {
        let value = point.overall_percentage;
        if value > 0.0 {
            active_total += value;
            active_count += 1;
        }
        if value >= best.value {
            best = PeriodScore {
                label: Some(point.period_label.clone()),
                value,
            };
        }
        if value > 0.0 && value <= worst.value {
            worst = PeriodScore {
                label: Some(point.period_label.clone()),
                value,
            };
        }
    }

    if active_count == 0 {
        worst.value = 0.0;
    }

    let average_progress = if active_count > 0 {
        active_total / active_count as f64
    } else {
        0.0
    };
    let consistency = if series.is_empty() {
        0.0
    } else {
        active_count as f64 / series.len() as f64 * 100.0
    };

    AnalyticsKpis {
        overall_progress: overall.round(),
        consistency: consistency.round(),
        average_progress: average_progress.round(),
        best_period: best,
        worst_period: worst,
    }
}
