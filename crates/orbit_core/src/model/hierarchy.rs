//! Orbit and Phase records.
//!
//! Progress for both levels is derived per evaluation and never stored.

use crate::model::pulse::OwnerScope;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type OrbitId = Uuid;
pub type PhaseId = Uuid;

/// Top-level life pillar aggregating Phases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Orbit {
    pub id: OrbitId,
    pub owner: OwnerScope,
    pub title: String,
    #[serde(default)]
    pub archived: bool,
}

impl Orbit {
    pub fn new(owner: OwnerScope, title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner,
            title: title.into(),
            archived: false,
        }
    }
}

/// Measurable project under one Orbit, aggregating linked Pulses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phase {
    pub id: PhaseId,
    pub orbit_id: OrbitId,
    pub title: String,
    #[serde(default)]
    pub archived: bool,
}

impl Phase {
    pub fn new(orbit_id: OrbitId, title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            orbit_id,
            title: title.into(),
            archived: false,
        }
    }
}
