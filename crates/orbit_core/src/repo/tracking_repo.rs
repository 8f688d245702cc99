//! Tracking repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Load one owner scope as a consistent `TrackingSnapshot`.
//! - Persist Orbits, Phases and Pulses, and record day completions.
//!
//! # Invariants
//! - Write paths call `Pulse::validate()` before SQL mutations.
//! - At most one progress log exists per `(pulse_id, completion_date)`;
//!   repeated completions on one day accumulate into that row.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::DbError;
use crate::model::hierarchy::{Orbit, Phase, PhaseId};
use crate::model::progress_log::ProgressLog;
use crate::model::pulse::{
    MeasurementGoal, MeasurementType, OwnerScope, Pulse, PulseId, PulseKind, PulseValidationError,
};
use crate::model::recurrence::{RecurrenceKind, WeekdaySet};
use crate::model::snapshot::TrackingSnapshot;
use chrono::NaiveDate;
use log::info;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;
use uuid::Uuid;

const DATE_FORMAT: &str = "%Y-%m-%d";

const PULSE_SELECT_SQL: &str = "SELECT
    id,
    owner_kind,
    owner_id,
    title,
    kind,
    measurement_type,
    target_count,
    weight,
    is_critical,
    recurrence,
    recurrence_days,
    recurrence_interval,
    recurrence_day_of_month,
    start_date,
    due_date,
    archived,
    archived_at,
    completion_date
FROM pulses";

const LOG_SELECT_SQL: &str = "SELECT
    l.id,
    l.pulse_id,
    l.completion_date,
    l.progress_value,
    l.completion_percentage
FROM progress_logs l";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for tracking persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(PulseValidationError),
    Db(DbError),
    NotFound(Uuid),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "entity not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted tracking data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<PulseValidationError> for RepoError {
    fn from(value: PulseValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for tracking reads and writes.
pub trait TrackingRepository {
    /// Reads active Orbits and Phases plus every Pulse and log owned by `scope`.
    ///
    /// Archived Pulses stay in the snapshot; archival is evaluated per day.
    fn load_snapshot(&self, scope: &OwnerScope) -> RepoResult<TrackingSnapshot>;
    /// Inserts or replaces an Orbit.
    fn save_orbit(&self, orbit: &Orbit) -> RepoResult<()>;
    /// Inserts or replaces a Phase; its Orbit must exist.
    fn save_phase(&self, phase: &Phase) -> RepoResult<()>;
    /// Inserts or replaces a Pulse together with its Phase links.
    fn save_pulse(&self, pulse: &Pulse) -> RepoResult<()>;
    /// Records a completion, accumulating into an existing same-day log.
    ///
    /// `value = None` counts as one unit.
    fn log_completion(
        &self,
        pulse_id: PulseId,
        date: NaiveDate,
        value: Option<f64>,
    ) -> RepoResult<ProgressLog>;
    /// Deletes the log for `(pulse_id, date)`; returns whether one existed.
    fn remove_completion(&self, pulse_id: PulseId, date: NaiveDate) -> RepoResult<bool>;
    /// Soft-archives a Pulse as of `archived_at`.
    fn archive_pulse(&self, pulse_id: PulseId, archived_at: NaiveDate) -> RepoResult<()>;
}

/// SQLite-backed tracking repository.
pub struct SqliteTrackingRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTrackingRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn get_pulse(&self, id: PulseId) -> RepoResult<Option<Pulse>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PULSE_SELECT_SQL} WHERE id = ?1"))?;
        let mut rows = stmt.query(params![id.to_string()])?;
        let Some(row) = rows.next()? else {
            return Ok(None);
        };
        let mut pulse = parse_pulse_row(row)?;
        pulse.phase_ids = self.load_phase_links(id)?;
        Ok(Some(pulse))
    }

    fn load_phase_links(&self, pulse_id: PulseId) -> RepoResult<Vec<PhaseId>> {
        let mut stmt = self.conn.prepare(
            "SELECT phase_id FROM pulse_phase_links WHERE pulse_id = ?1 ORDER BY rowid ASC",
        )?;
        let mut rows = stmt.query(params![pulse_id.to_string()])?;
        let mut links = Vec::new();
        while let Some(row) = rows.next()? {
            let raw: String = row.get(0)?;
            links.push(parse_uuid(&raw, "phase_id")?);
        }
        Ok(links)
    }

    fn load_orbits(&self, owner_kind: &str, owner_id: &str) -> RepoResult<Vec<Orbit>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, owner_kind, owner_id, title, archived
            FROM orbits
            WHERE owner_kind = ?1 AND owner_id = ?2 AND archived = 0
            ORDER BY rowid ASC",
        )?;
        let mut rows = stmt.query(params![owner_kind, owner_id])?;
        let mut orbits = Vec::new();
        while let Some(row) = rows.next()? {
            orbits.push(parse_orbit_row(row)?);
        }
        Ok(orbits)
    }

    fn load_phases(&self, owner_kind: &str, owner_id: &str) -> RepoResult<Vec<Phase>> {
        let mut stmt = self.conn.prepare(
            "SELECT p.id, p.orbit_id, p.title, p.archived
            FROM phases p
            JOIN orbits o ON o.id = p.orbit_id
            WHERE o.owner_kind = ?1 AND o.owner_id = ?2 AND o.archived = 0 AND p.archived = 0
            ORDER BY p.rowid ASC",
        )?;
        let mut rows = stmt.query(params![owner_kind, owner_id])?;
        let mut phases = Vec::new();
        while let Some(row) = rows.next()? {
            phases.push(parse_phase_row(row)?);
        }
        Ok(phases)
    }

    fn load_pulses(&self, owner_kind: &str, owner_id: &str) -> RepoResult<Vec<Pulse>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PULSE_SELECT_SQL} WHERE owner_kind = ?1 AND owner_id = ?2 ORDER BY rowid ASC"
        ))?;
        let mut rows = stmt.query(params![owner_kind, owner_id])?;
        let mut pulses = Vec::new();
        while let Some(row) = rows.next()? {
            pulses.push(parse_pulse_row(row)?);
        }

        let mut links: HashMap<PulseId, Vec<PhaseId>> = HashMap::new();
        let mut stmt = self.conn.prepare(
            "SELECT k.pulse_id, k.phase_id
            FROM pulse_phase_links k
            JOIN pulses p ON p.id = k.pulse_id
            WHERE p.owner_kind = ?1 AND p.owner_id = ?2
            ORDER BY k.rowid ASC",
        )?;
        let mut rows = stmt.query(params![owner_kind, owner_id])?;
        while let Some(row) = rows.next()? {
            let pulse_raw: String = row.get(0)?;
            let phase_raw: String = row.get(1)?;
            links
                .entry(parse_uuid(&pulse_raw, "pulse_id")?)
                .or_default()
                .push(parse_uuid(&phase_raw, "phase_id")?);
        }

        for pulse in &mut pulses {
            if let Some(phase_ids) = links.remove(&pulse.id) {
                pulse.phase_ids = phase_ids;
            }
        }
        Ok(pulses)
    }

    fn load_logs(&self, owner_kind: &str, owner_id: &str) -> RepoResult<Vec<ProgressLog>> {
        let mut stmt = self.conn.prepare(&format!(
            "{LOG_SELECT_SQL}
            JOIN pulses p ON p.id = l.pulse_id
            WHERE p.owner_kind = ?1 AND p.owner_id = ?2
            ORDER BY l.completion_date ASC, l.rowid ASC"
        ))?;
        let mut rows = stmt.query(params![owner_kind, owner_id])?;
        let mut logs = Vec::new();
        while let Some(row) = rows.next()? {
            logs.push(parse_log_row(row)?);
        }
        Ok(logs)
    }

    fn find_log(&self, pulse_id: PulseId, date: NaiveDate) -> RepoResult<Option<ProgressLog>> {
        let mut stmt = self.conn.prepare(&format!(
            "{LOG_SELECT_SQL} WHERE l.pulse_id = ?1 AND l.completion_date = ?2"
        ))?;
        let mut rows = stmt.query(params![pulse_id.to_string(), date_to_db(date)])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_log_row(row)?)),
            None => Ok(None),
        }
    }

    fn set_completion_date(&self, pulse_id: PulseId, date: Option<NaiveDate>) -> RepoResult<()> {
        self.conn.execute(
            "UPDATE pulses SET completion_date = ?2 WHERE id = ?1",
            params![pulse_id.to_string(), date.map(date_to_db)],
        )?;
        Ok(())
    }
}

impl TrackingRepository for SqliteTrackingRepository<'_> {
    fn load_snapshot(&self, scope: &OwnerScope) -> RepoResult<TrackingSnapshot> {
        let started_at = Instant::now();
        let (owner_kind, owner_id) = owner_to_db(scope);

        // One read transaction keeps pulses and logs from skewing.
        let tx = self.conn.unchecked_transaction()?;
        let snapshot = TrackingSnapshot {
            orbits: self.load_orbits(owner_kind, owner_id)?,
            phases: self.load_phases(owner_kind, owner_id)?,
            pulses: self.load_pulses(owner_kind, owner_id)?,
            logs: self.load_logs(owner_kind, owner_id)?,
        };
        tx.commit()?;

        info!(
            "event=snapshot_load module=repo status=ok owner_kind={} orbits={} phases={} pulses={} logs={} duration_ms={}",
            owner_kind,
            snapshot.orbits.len(),
            snapshot.phases.len(),
            snapshot.pulses.len(),
            snapshot.logs.len(),
            started_at.elapsed().as_millis()
        );
        Ok(snapshot)
    }

    fn save_orbit(&self, orbit: &Orbit) -> RepoResult<()> {
        let (owner_kind, owner_id) = owner_to_db(&orbit.owner);
        self.conn.execute(
            "INSERT INTO orbits (id, owner_kind, owner_id, title, archived)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(id) DO UPDATE SET
                owner_kind = excluded.owner_kind,
                owner_id = excluded.owner_id,
                title = excluded.title,
                archived = excluded.archived",
            params![
                orbit.id.to_string(),
                owner_kind,
                owner_id,
                orbit.title.as_str(),
                bool_to_int(orbit.archived),
            ],
        )?;
        Ok(())
    }

    fn save_phase(&self, phase: &Phase) -> RepoResult<()> {
        let orbit_exists: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM orbits WHERE id = ?1",
                params![phase.orbit_id.to_string()],
                |row| row.get(0),
            )
            .optional()?;
        if orbit_exists.is_none() {
            return Err(RepoError::NotFound(phase.orbit_id));
        }

        self.conn.execute(
            "INSERT INTO phases (id, orbit_id, title, archived)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(id) DO UPDATE SET
                orbit_id = excluded.orbit_id,
                title = excluded.title,
                archived = excluded.archived",
            params![
                phase.id.to_string(),
                phase.orbit_id.to_string(),
                phase.title.as_str(),
                bool_to_int(phase.archived),
            ],
        )?;
        Ok(())
    }

    fn save_pulse(&self, pulse: &Pulse) -> RepoResult<()> {
        pulse.validate()?;
        let (owner_kind, owner_id) = owner_to_db(&pulse.owner);
        let recurrence_days = pulse
            .recurrence_days
            .as_ref()
            .map(|days| days.codes().join(","));

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO pulses (
                id,
                owner_kind,
                owner_id,
                title,
                kind,
                measurement_type,
                target_count,
                weight,
                is_critical,
                recurrence,
                recurrence_days,
                recurrence_interval,
                recurrence_day_of_month,
                start_date,
                due_date,
                archived,
                archived_at,
                completion_date
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)
            ON CONFLICT(id) DO UPDATE SET
                owner_kind = excluded.owner_kind,
                owner_id = excluded.owner_id,
                title = excluded.title,
                kind = excluded.kind,
                measurement_type = excluded.measurement_type,
                target_count = excluded.target_count,
                weight = excluded.weight,
                is_critical = excluded.is_critical,
                recurrence = excluded.recurrence,
                recurrence_days = excluded.recurrence_days,
                recurrence_interval = excluded.recurrence_interval,
                recurrence_day_of_month = excluded.recurrence_day_of_month,
                start_date = excluded.start_date,
                due_date = excluded.due_date,
                archived = excluded.archived,
                archived_at = excluded.archived_at,
                completion_date = excluded.completion_date",
            params![
                pulse.id.to_string(),
                owner_kind,
                owner_id,
                pulse.title.as_str(),
                pulse_kind_to_db(pulse.kind),
                measurement_type_to_db(pulse.measurement_type),
                pulse.measurement_goal.target_count,
                pulse.weight,
                bool_to_int(pulse.is_critical),
                pulse.recurrence.as_ref().map(RecurrenceKind::as_str),
                recurrence_days,
                pulse.recurrence_interval,
                pulse.recurrence_day_of_month,
                pulse.start_date.map(date_to_db),
                pulse.due_date.map(date_to_db),
                bool_to_int(pulse.archived),
                pulse.archived_at.map(date_to_db),
                pulse.completion_date.map(date_to_db),
            ],
        )?;

        tx.execute(
            "DELETE FROM pulse_phase_links WHERE pulse_id = ?1",
            params![pulse.id.to_string()],
        )?;
        for phase_id in &pulse.phase_ids {
            tx.execute(
                "INSERT OR IGNORE INTO pulse_phase_links (pulse_id, phase_id) VALUES (?1, ?2)",
                params![pulse.id.to_string(), phase_id.to_string()],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    fn log_completion(
        &self,
        pulse_id: PulseId,
        date: NaiveDate,
        value: Option<f64>,
    ) -> RepoResult<ProgressLog> {
        let started_at = Instant::now();
        let pulse = self.get_pulse(pulse_id)?.ok_or(RepoError::NotFound(pulse_id))?;

        let tx = self.conn.unchecked_transaction()?;
        if pulse.is_one_off_task() && value.is_none() {
            self.set_completion_date(pulse_id, Some(date))?;
        }

        let existing = self.find_log(pulse_id, date)?;
        let previous = existing
            .as_ref()
            .and_then(|log| log.progress_value)
            .unwrap_or(0.0);
        let new_value = previous + value.unwrap_or(1.0);
        let completion_percentage = completion_ratio(&pulse, new_value);
        let log = ProgressLog {
            id: existing.map_or_else(Uuid::new_v4, |log| log.id),
            pulse_id,
            completion_date: date,
            progress_value: Some(new_value),
            completion_percentage: Some(completion_percentage),
        };

        self.conn.execute(
            "INSERT INTO progress_logs (
                id,
                pulse_id,
                completion_date,
                progress_value,
                completion_percentage
            ) VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(pulse_id, completion_date) DO UPDATE SET
                progress_value = excluded.progress_value,
                completion_percentage = excluded.completion_percentage",
            params![
                log.id.to_string(),
                pulse_id.to_string(),
                date_to_db(date),
                log.progress_value,
                log.completion_percentage,
            ],
        )?;
        tx.commit()?;

        info!(
            "event=log_completion module=repo status=ok date={} value={} duration_ms={}",
            date,
            new_value,
            started_at.elapsed().as_millis()
        );
        Ok(log)
    }

    fn remove_completion(&self, pulse_id: PulseId, date: NaiveDate) -> RepoResult<bool> {
        let pulse = self.get_pulse(pulse_id)?.ok_or(RepoError::NotFound(pulse_id))?;

        let tx = self.conn.unchecked_transaction()?;
        if pulse.is_one_off_task() {
            self.set_completion_date(pulse_id, None)?;
        }
        let changed = self.conn.execute(
            "DELETE FROM progress_logs WHERE pulse_id = ?1 AND completion_date = ?2",
            params![pulse_id.to_string(), date_to_db(date)],
        )?;
        tx.commit()?;

        info!(
            "event=remove_completion module=repo status=ok date={} removed={}",
            date,
            changed > 0
        );
        Ok(changed > 0)
    }

    fn archive_pulse(&self, pulse_id: PulseId, archived_at: NaiveDate) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE pulses SET archived = 1, archived_at = ?2 WHERE id = ?1",
            params![pulse_id.to_string(), date_to_db(archived_at)],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(pulse_id));
        }
        Ok(())
    }
}

/// Stored day ratio for an accumulated `value`.
///
/// Quantitative and accumulative pulses report `value / target` when a
/// positive target exists; everything else is fully complete once logged.
fn completion_ratio(pulse: &Pulse, value: f64) -> f64 {
    if !(pulse.is_quantitative() || pulse.is_accumulative()) {
        return 1.0;
    }
    match pulse.positive_target() {
        Some(target) => value / target,
        None if value > 0.0 => 1.0,
        None => 0.0,
    }
}

fn parse_orbit_row(row: &Row<'_>) -> RepoResult<Orbit> {
    let id_raw: String = row.get(0)?;
    let owner_kind: String = row.get(1)?;
    let owner_id: String = row.get(2)?;
    let archived: i64 = row.get(4)?;
    Ok(Orbit {
        id: parse_uuid(&id_raw, "orbit id")?,
        owner: parse_owner(&owner_kind, owner_id)?,
        title: row.get(3)?,
        archived: parse_bool(archived, "orbits.archived")?,
    })
}

fn parse_phase_row(row: &Row<'_>) -> RepoResult<Phase> {
    let id_raw: String = row.get(0)?;
    let orbit_raw: String = row.get(1)?;
    let archived: i64 = row.get(3)?;
    Ok(Phase {
        id: parse_uuid(&id_raw, "phase id")?,
        orbit_id: parse_uuid(&orbit_raw, "orbit_id")?,
        title: row.get(2)?,
        archived: parse_bool(archived, "phases.archived")?,
    })
}

fn parse_pulse_row(row: &Row<'_>) -> RepoResult<Pulse> {
    let id_raw: String = row.get(0)?;
    let owner_kind: String = row.get(1)?;
    let owner_id: String = row.get(2)?;
    let kind_raw: String = row.get(4)?;
    let measurement_raw: String = row.get(5)?;
    let is_critical: i64 = row.get(8)?;
    let recurrence_raw: Option<String> = row.get(9)?;
    let days_raw: Option<String> = row.get(10)?;
    let interval_raw: Option<i64> = row.get(11)?;
    let day_of_month_raw: Option<i64> = row.get(12)?;
    let archived: i64 = row.get(15)?;

    Ok(Pulse {
        id: parse_uuid(&id_raw, "pulse id")?,
        owner: parse_owner(&owner_kind, owner_id)?,
        title: row.get(3)?,
        kind: parse_pulse_kind(&kind_raw)?,
        measurement_type: parse_measurement_type(&measurement_raw)?,
        measurement_goal: MeasurementGoal {
            target_count: row.get(6)?,
        },
        weight: row.get(7)?,
        is_critical: parse_bool(is_critical, "pulses.is_critical")?,
        recurrence: recurrence_raw.as_deref().map(RecurrenceKind::parse),
        recurrence_days: days_raw.map(|raw| WeekdaySet::from_codes(raw.split(','))),
        recurrence_interval: parse_optional_u32(interval_raw, "recurrence_interval")?,
        recurrence_day_of_month: parse_optional_u32(day_of_month_raw, "recurrence_day_of_month")?,
        start_date: parse_optional_date(row.get(13)?, "start_date")?,
        due_date: parse_optional_date(row.get(14)?, "due_date")?,
        archived: parse_bool(archived, "pulses.archived")?,
        archived_at: parse_optional_date(row.get(16)?, "archived_at")?,
        completion_date: parse_optional_date(row.get(17)?, "completion_date")?,
        phase_ids: Vec::new(),
    })
}

fn parse_log_row(row: &Row<'_>) -> RepoResult<ProgressLog> {
    let id_raw: String = row.get(0)?;
    let pulse_raw: String = row.get(1)?;
    let date_raw: String = row.get(2)?;
    Ok(ProgressLog {
        id: parse_uuid(&id_raw, "log id")?,
        pulse_id: parse_uuid(&pulse_raw, "pulse_id")?,
        completion_date: parse_date(&date_raw, "completion_date")?,
        progress_value: row.get(3)?,
        completion_percentage: row.get(4)?,
    })
}

fn parse_uuid(raw: &str, field: &str) -> RepoResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| RepoError::InvalidData(format!("invalid {field} uuid: {raw}")))
}

fn parse_date(raw: &str, field: &str) -> RepoResult<NaiveDate> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|_| RepoError::InvalidData(format!("invalid {field} date: {raw}")))
}

fn parse_optional_date(raw: Option<String>, field: &str) -> RepoResult<Option<NaiveDate>> {
    raw.map(|value| parse_date(&value, field)).transpose()
}

fn parse_optional_u32(raw: Option<i64>, field: &str) -> RepoResult<Option<u32>> {
    raw.map(|value| {
        u32::try_from(value).map_err(|_| RepoError::InvalidData(format!("invalid {field}: {value}")))
    })
    .transpose()
}

fn parse_bool(value: i64, field: &str) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid {field} value: {other}"
        ))),
    }
}

fn parse_owner(kind: &str, id: String) -> RepoResult<OwnerScope> {
    match kind {
        "user" => Ok(OwnerScope::User(id)),
        "group" => Ok(OwnerScope::Group(id)),
        other => Err(RepoError::InvalidData(format!("invalid owner_kind: {other}"))),
    }
}

fn owner_to_db(owner: &OwnerScope) -> (&'static str, &str) {
    match owner {
        OwnerScope::User(id) => ("user", id.as_str()),
        OwnerScope::Group(id) => ("group", id.as_str()),
    }
}

fn parse_pulse_kind(value: &str) -> RepoResult<PulseKind> {
    match value {
        "habit" => Ok(PulseKind::Habit),
        "task" => Ok(PulseKind::Task),
        other => Err(RepoError::InvalidData(format!("invalid pulse kind: {other}"))),
    }
}

fn pulse_kind_to_db(kind: PulseKind) -> &'static str {
    match kind {
        PulseKind::Habit => "habit",
        PulseKind::Task => "task",
    }
}

fn parse_measurement_type(value: &str) -> RepoResult<MeasurementType> {
    match value {
        "binary" => Ok(MeasurementType::Binary),
        "quantitative" => Ok(MeasurementType::Quantitative),
        other => Err(RepoError::InvalidData(format!(
            "invalid measurement_type: {other}"
        ))),
    }
}

fn measurement_type_to_db(value: MeasurementType) -> &'static str {
    match value {
        MeasurementType::Binary => "binary",
        MeasurementType::Quantitative => "quantitative",
    }
}

fn date_to_db(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
