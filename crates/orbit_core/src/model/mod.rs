//! Domain model for Orbits, Phases, Pulses and their progress logs.
//!
//! # Responsibility
//! - Define the plain records supplied to the engine by storage.
//! - Keep recurrence configuration on the pulse record, evaluated lazily.
//!
//! # Invariants
//! - Every entity is identified by a stable UUID.
//! - Archival is a soft flag, never a physical delete.

pub mod hierarchy;
pub mod progress_log;
pub mod pulse;
pub mod recurrence;
pub mod snapshot;
