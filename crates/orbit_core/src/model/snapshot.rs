//! Read snapshot consumed by the engine.

use crate::model::hierarchy::{Orbit, Phase};
use crate::model::progress_log::ProgressLog;
use crate::model::pulse::Pulse;
use serde::{Deserialize, Serialize};

/// Entities of one scope captured from a single read.
///
/// Active pulses and logs must come from the same snapshot so "what is
/// scheduled" and "what is logged" never skew.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackingSnapshot {
    pub orbits: Vec<Orbit>,
    pub phases: Vec<Phase>,
    pub pulses: Vec<Pulse>,
    pub logs: Vec<ProgressLog>,
}
