//! Core recurrence and progress engine for Orbit/Phase/Pulse tracking.
//! This crate is the single source of truth for scheduling and progress
//! invariants.

pub mod calendar;
pub mod config;
pub mod db;
pub mod engine;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::TrackingConfig;
pub use engine::activity::{active_by_day, ActivityIndex, LogIndex};
pub use engine::analytics::{analytics_report, AnalyticsKpis, AnalyticsReport, TimeScale};
pub use engine::cascade::{cascade, CascadeResult};
pub use engine::commitment::{active_commitments, Commitment};
pub use engine::completion::{pulses_for_date, ResolvedPulse};
pub use engine::period::{monthly_progress, period_progress, weekly_progress};
pub use engine::recurrence::is_active;
pub use engine::{EngineError, EngineResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::hierarchy::{Orbit, OrbitId, Phase, PhaseId};
pub use model::progress_log::ProgressLog;
pub use model::pulse::{
    MeasurementGoal, MeasurementType, OwnerScope, Pulse, PulseId, PulseKind, PulseValidationError,
};
pub use model::recurrence::{CommitmentPeriod, RecurrenceKind, WeekdaySet};
pub use model::snapshot::TrackingSnapshot;
pub use repo::tracking_repo::{RepoError, RepoResult, SqliteTrackingRepository, TrackingRepository};
pub use service::analytics_service::{AnalyticsFilters, AnalyticsLevel, AnalyticsService, TimePeriod};
pub use service::dashboard_service::DashboardService;
pub use service::{ServiceError, ServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
