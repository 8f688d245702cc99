//! Point-in-time progress cascade: Pulses → Phases → Orbits.
//!
//! # Invariants
//! - A Phase with no linked resolved pulses has `None` progress.
//! - A critical pulse left incomplete forces its Phase to exactly 0.
//! - Orbit progress is the unweighted mean of its Phases' non-null progress;
//!   `None` Phases are excluded, never counted as 0.

use crate::engine::completion::ResolvedPulse;
use crate::engine::WeightedAverage;
use crate::model::hierarchy::{Orbit, OrbitId, Phase, PhaseId};
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhaseProgress {
    #[serde(flatten)]
    pub phase: Phase,
    pub progress: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrbitProgress {
    #[serde(flatten)]
    pub orbit: Orbit,
    pub progress: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CascadeResult {
    pub date: NaiveDate,
    pub orbits: Vec<OrbitProgress>,
    pub phases: Vec<PhaseProgress>,
}

impl CascadeResult {
    /// Mean of non-null Orbit progress, or 0 when no Orbit applies.
    pub fn overall_progress(&self) -> f64 {
        mean(self.orbits.iter().filter_map(|orbit| orbit.progress)).unwrap_or(0.0)
    }

    pub fn phase(&self, id: PhaseId) -> Option<&PhaseProgress> {
        self.phases.iter().find(|entry| entry.phase.id == id)
    }

    pub fn orbit(&self, id: OrbitId) -> Option<&OrbitProgress> {
        self.orbits.iter().find(|entry| entry.orbit.id == id)
    }
}

/// Aggregates `resolved` pulses for `date` into Phase and Orbit progress.
pub fn cascade(
    date: NaiveDate,
    orbits: &[Orbit],
    phases: &[Phase],
    resolved: &[ResolvedPulse],
) -> CascadeResult {
    let phases: Vec<PhaseProgress> = phases
        .iter()
        .map(|phase| PhaseProgress {
            phase: phase.clone(),
            progress: phase_progress(phase.id, resolved),
        })
        .collect();

    let orbits = orbits
        .iter()
        .map(|orbit| OrbitProgress {
            orbit: orbit.clone(),
            progress: orbit_progress(orbit.id, &phases),
        })
        .collect();

    CascadeResult {
        date,
        orbits,
        phases,
    }
}

/// Weighted completion percentage of the pulses linked to `phase_id`.
pub fn phase_progress(phase_id: PhaseId, resolved: &[ResolvedPulse]) -> Option<f64> {
    let relevant: Vec<&ResolvedPulse> = resolved
        .iter()
        .filter(|entry| entry.pulse.belongs_to_phase(phase_id))
        .collect();

    if relevant.is_empty() {
        return None;
    }

    let failed_critical = relevant
        .iter()
        .any(|entry| entry.pulse.is_critical && !entry.occurrence.completed_today);
    if failed_critical {
        return Some(0.0);
    }

    let mut average = WeightedAverage::default();
    for entry in relevant {
        average.add(entry.achieved_fraction(), entry.pulse.effective_weight());
    }
    Some(average.percentage())
}

/// Mean progress of the Phases under `orbit_id` that have progress.
pub fn orbit_progress(orbit_id: OrbitId, phases: &[PhaseProgress]) -> Option<f64> {
    mean(
        phases
            .iter()
            .filter(|entry| entry.phase.orbit_id == orbit_id)
            .filter_map(|entry| entry.progress),
    )
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));
    (count > 0).then(|| sum / count as f64)
}
