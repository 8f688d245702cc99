//! Pulse domain model.
//!
//! # Responsibility
//! - Define the occurrence template tracked by the engine.
//! - Provide write-path validation for stores.
//!
//! # Invariants
//! - A pulse without `start_date` is never active.
//! - `archived_at` is a soft, date-stamped deactivation; pulses are never
//!   removed while logs reference them.
//! - `completion_date` is only meaningful for one-off tasks.

use crate::model::hierarchy::PhaseId;
use crate::model::recurrence::{CommitmentPeriod, RecurrenceKind, WeekdaySet};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type PulseId = Uuid;

/// Owner of a tracked entity: a single user or a shared group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum OwnerScope {
    User(String),
    Group(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PulseKind {
    Habit,
    Task,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementType {
    Binary,
    Quantitative,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MeasurementGoal {
    /// Required when the pulse is quantitative.
    pub target_count: Option<f64>,
}

fn default_weight() -> f64 {
    1.0
}

/// Habit or task template that generates dated occurrences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pulse {
    pub id: PulseId,
    pub owner: OwnerScope,
    pub title: String,
    /// Serialized as `type` to match external schema naming.
    #[serde(rename = "type")]
    pub kind: PulseKind,
    pub measurement_type: MeasurementType,
    #[serde(default)]
    pub measurement_goal: MeasurementGoal,
    #[serde(default = "default_weight")]
    pub weight: f64,
    #[serde(default)]
    pub is_critical: bool,
    /// `None` behaves exactly like `Some(RecurrenceKind::Once)`.
    #[serde(default)]
    pub recurrence: Option<RecurrenceKind>,
    #[serde(default)]
    pub recurrence_days: Option<WeekdaySet>,
    #[serde(default)]
    pub recurrence_interval: Option<u32>,
    #[serde(default)]
    pub recurrence_day_of_month: Option<u32>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper bound of the active interval.
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub archived_at: Option<NaiveDate>,
    #[serde(default)]
    pub completion_date: Option<NaiveDate>,
    #[serde(default)]
    pub phase_ids: Vec<PhaseId>,
}

impl Pulse {
    /// Creates a binary, weight-1, one-off pulse with a generated ID.
    pub fn new(
        owner: OwnerScope,
        kind: PulseKind,
        title: impl Into<String>,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner,
            title: title.into(),
            kind,
            measurement_type: MeasurementType::Binary,
            measurement_goal: MeasurementGoal::default(),
            weight: 1.0,
            is_critical: false,
            recurrence: None,
            recurrence_days: None,
            recurrence_interval: None,
            recurrence_day_of_month: None,
            start_date: Some(start_date),
            due_date: None,
            archived: false,
            archived_at: None,
            completion_date: None,
            phase_ids: Vec::new(),
        }
    }

    /// Single-occurrence pulse (`None` or `ONCE`).
    pub fn is_one_off(&self) -> bool {
        matches!(self.recurrence, None | Some(RecurrenceKind::Once))
    }

    pub fn is_one_off_task(&self) -> bool {
        self.kind == PulseKind::Task && self.is_one_off()
    }

    pub fn is_accumulative(&self) -> bool {
        self.recurrence
            .as_ref()
            .is_some_and(RecurrenceKind::is_accumulative)
    }

    pub fn commitment_period(&self) -> Option<CommitmentPeriod> {
        self.recurrence
            .as_ref()
            .and_then(RecurrenceKind::commitment_period)
    }

    pub fn is_quantitative(&self) -> bool {
        self.measurement_type == MeasurementType::Quantitative
    }

    /// Target count when one is configured and strictly positive.
    pub fn positive_target(&self) -> Option<f64> {
        self.measurement_goal
            .target_count
            .filter(|target| *target > 0.0)
    }

    /// Target count with the engine's default of 1 when none is configured.
    pub fn target_or_default(&self) -> f64 {
        self.measurement_goal.target_count.unwrap_or(1.0)
    }

    /// Weight used in weighted sums; non-positive or NaN weights count as 1.
    pub fn effective_weight(&self) -> f64 {
        if self.weight > 0.0 && self.weight.is_finite() {
            self.weight
        } else {
            1.0
        }
    }

    /// Whether archival has deactivated this pulse on `date`.
    pub fn is_archived_on(&self, date: NaiveDate) -> bool {
        self.archived && self.archived_at.is_some_and(|archived_at| date > archived_at)
    }

    pub fn belongs_to_phase(&self, phase_id: PhaseId) -> bool {
        self.phase_ids.contains(&phase_id)
    }

    /// Validates write-path invariants.
    ///
    /// The engine itself never calls this: evaluation stays fail-safe on
    /// incomplete configuration.
    pub fn validate(&self) -> Result<(), PulseValidationError> {
        if self.id.is_nil() {
            return Err(PulseValidationError::NilId);
        }
        if !(self.weight > 0.0) {
            return Err(PulseValidationError::NonPositiveWeight(self.weight));
        }
        let Some(start_date) = self.start_date else {
            return Err(PulseValidationError::MissingStartDate);
        };
        if let Some(due_date) = self.due_date {
            if due_date < start_date {
                return Err(PulseValidationError::DueBeforeStart {
                    start: start_date,
                    due: due_date,
                });
            }
        }
        if self.is_quantitative() && self.positive_target().is_none() {
            return Err(PulseValidationError::MissingTarget);
        }
        if self.recurrence_interval == Some(0) {
            return Err(PulseValidationError::ZeroInterval);
        }
        if let Some(day) = self.recurrence_day_of_month {
            if !(1..=31).contains(&day) {
                return Err(PulseValidationError::DayOfMonthOutOfRange(day));
            }
        }
        Ok(())
    }
}

/// Write-path validation failures for `Pulse`.
#[derive(Debug, Clone, PartialEq)]
pub enum PulseValidationError {
    NilId,
    NonPositiveWeight(f64),
    MissingStartDate,
    DueBeforeStart { start: NaiveDate, due: NaiveDate },
    MissingTarget,
    ZeroInterval,
    DayOfMonthOutOfRange(u32),
}

impl Display for PulseValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "pulse id must not be nil"),
            Self::NonPositiveWeight(weight) => {
                write!(f, "pulse weight must be positive, got {weight}")
            }
            Self::MissingStartDate => write!(f, "pulse start_date is required"),
            Self::DueBeforeStart { start, due } => {
                write!(f, "due_date ({due}) must be >= start_date ({start})")
            }
            Self::MissingTarget => {
                write!(f, "quantitative pulse requires a positive target_count")
            }
            Self::ZeroInterval => write!(f, "recurrence_interval must be >= 1"),
            Self::DayOfMonthOutOfRange(day) => {
                write!(f, "recurrence_day_of_month must be in 1..=31, got {day}")
            }
        }
    }
}

impl Error for PulseValidationError {}
