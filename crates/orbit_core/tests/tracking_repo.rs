use chrono::NaiveDate;
use orbit_core::db::open_db_in_memory;
use orbit_core::{
    MeasurementType, Orbit, OwnerScope, Phase, Pulse, PulseKind, PulseValidationError,
    RecurrenceKind, RepoError, SqliteTrackingRepository, TrackingRepository, WeekdaySet,
};
use rusqlite::params;
use uuid::Uuid;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn owner() -> OwnerScope {
    OwnerScope::User("u1".to_string())
}

fn seed_hierarchy(repo: &SqliteTrackingRepository<'_>) -> (Orbit, Phase) {
    let orbit = Orbit::new(owner(), "Health");
    let phase = Phase::new(orbit.id, "Fitness");
    repo.save_orbit(&orbit).unwrap();
    repo.save_phase(&phase).unwrap();
    (orbit, phase)
}

#[test]
fn saved_entities_roundtrip_through_snapshot() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTrackingRepository::new(&conn);
    let (orbit, phase) = seed_hierarchy(&repo);

    let mut pulse = Pulse::new(owner(), PulseKind::Habit, "Gym", day(2025, 1, 1));
    pulse.recurrence = Some(RecurrenceKind::WeeklyFixedDays);
    pulse.recurrence_days = Some(WeekdaySet::from_codes(["L", "X", "V"]));
    pulse.weight = 2.5;
    pulse.is_critical = true;
    pulse.phase_ids = vec![phase.id];
    repo.save_pulse(&pulse).unwrap();

    let snapshot = repo.load_snapshot(&owner()).unwrap();
    assert_eq!(snapshot.orbits, vec![orbit]);
    assert_eq!(snapshot.phases, vec![phase]);
    assert_eq!(snapshot.pulses, vec![pulse]);
    assert!(snapshot.logs.is_empty());
}

#[test]
fn snapshot_is_scoped_to_owner() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTrackingRepository::new(&conn);
    seed_hierarchy(&repo);

    let group = OwnerScope::Group("family".to_string());
    repo.save_orbit(&Orbit::new(group.clone(), "Home")).unwrap();

    assert_eq!(repo.load_snapshot(&owner()).unwrap().orbits.len(), 1);
    let shared = repo.load_snapshot(&group).unwrap();
    assert_eq!(shared.orbits.len(), 1);
    assert_eq!(shared.orbits[0].title, "Home");
    assert!(shared.phases.is_empty());
}

#[test]
fn archived_orbits_and_phases_are_left_out_of_snapshot() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTrackingRepository::new(&conn);
    let (mut orbit, _) = seed_hierarchy(&repo);

    orbit.archived = true;
    repo.save_orbit(&orbit).unwrap();

    let snapshot = repo.load_snapshot(&owner()).unwrap();
    assert!(snapshot.orbits.is_empty());
    assert!(snapshot.phases.is_empty());
}

#[test]
fn save_pulse_validates_before_writing() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTrackingRepository::new(&conn);

    let mut pulse = Pulse::new(owner(), PulseKind::Habit, "Read", day(2025, 1, 1));
    pulse.measurement_type = MeasurementType::Quantitative;

    let err = repo.save_pulse(&pulse).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(PulseValidationError::MissingTarget)
    ));
    assert!(repo.load_snapshot(&owner()).unwrap().pulses.is_empty());
}

#[test]
fn save_phase_requires_existing_orbit() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTrackingRepository::new(&conn);
    let orphan = Phase::new(Uuid::new_v4(), "Orphan");

    let err = repo.save_phase(&orphan).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == orphan.orbit_id));
}

#[test]
fn repeated_completions_accumulate_into_one_log() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTrackingRepository::new(&conn);
    let mut pages = Pulse::new(owner(), PulseKind::Habit, "Pages", day(2025, 1, 1));
    pages.recurrence = Some(RecurrenceKind::Daily);
    pages.measurement_type = MeasurementType::Quantitative;
    pages.measurement_goal.target_count = Some(20.0);
    repo.save_pulse(&pages).unwrap();

    let first = repo.log_completion(pages.id, day(2025, 1, 2), Some(5.0)).unwrap();
    let second = repo.log_completion(pages.id, day(2025, 1, 2), Some(10.0)).unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.progress_value, Some(15.0));
    assert_eq!(second.completion_percentage, Some(0.75));

    let snapshot = repo.load_snapshot(&owner()).unwrap();
    assert_eq!(snapshot.logs.len(), 1);
    assert_eq!(snapshot.logs[0].progress_value, Some(15.0));
}

#[test]
fn binary_completion_without_value_counts_one_and_is_complete() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTrackingRepository::new(&conn);
    let mut walk = Pulse::new(owner(), PulseKind::Habit, "Walk", day(2025, 1, 1));
    walk.recurrence = Some(RecurrenceKind::Daily);
    repo.save_pulse(&walk).unwrap();

    let log = repo.log_completion(walk.id, day(2025, 1, 2), None).unwrap();
    assert_eq!(log.progress_value, Some(1.0));
    assert_eq!(log.completion_percentage, Some(1.0));
}

#[test]
fn schema_rejects_duplicate_logs_for_one_day() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTrackingRepository::new(&conn);
    let walk = Pulse::new(owner(), PulseKind::Habit, "Walk", day(2025, 1, 1));
    repo.save_pulse(&walk).unwrap();
    repo.log_completion(walk.id, day(2025, 1, 2), None).unwrap();

    let duplicate = conn.execute(
        "INSERT INTO progress_logs (id, pulse_id, completion_date, progress_value, completion_percentage)
        VALUES (?1, ?2, '2025-01-02', 1, 1)",
        params![Uuid::new_v4().to_string(), walk.id.to_string()],
    );
    assert!(duplicate.is_err());
}

#[test]
fn one_off_task_completion_sets_and_clears_completion_date() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTrackingRepository::new(&conn);
    let task = Pulse::new(owner(), PulseKind::Task, "Call bank", day(2025, 1, 1));
    repo.save_pulse(&task).unwrap();

    repo.log_completion(task.id, day(2025, 1, 3), None).unwrap();
    let stored = repo.load_snapshot(&owner()).unwrap().pulses.remove(0);
    assert_eq!(stored.completion_date, Some(day(2025, 1, 3)));

    assert!(repo.remove_completion(task.id, day(2025, 1, 3)).unwrap());
    let snapshot = repo.load_snapshot(&owner()).unwrap();
    assert_eq!(snapshot.pulses[0].completion_date, None);
    assert!(snapshot.logs.is_empty());

    assert!(!repo.remove_completion(task.id, day(2025, 1, 3)).unwrap());
}

#[test]
fn logging_unknown_pulse_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTrackingRepository::new(&conn);
    let missing = Uuid::new_v4();

    let err = repo.log_completion(missing, day(2025, 1, 2), None).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == missing));
}

#[test]
fn archive_pulse_keeps_it_in_snapshot_with_archival_day() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTrackingRepository::new(&conn);
    let walk = Pulse::new(owner(), PulseKind::Habit, "Walk", day(2025, 1, 1));
    repo.save_pulse(&walk).unwrap();

    repo.archive_pulse(walk.id, day(2025, 2, 1)).unwrap();
    let snapshot = repo.load_snapshot(&owner()).unwrap();
    assert!(snapshot.pulses[0].archived);
    assert_eq!(snapshot.pulses[0].archived_at, Some(day(2025, 2, 1)));

    let err = repo.archive_pulse(Uuid::new_v4(), day(2025, 2, 1)).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(_)));
}

#[test]
fn corrupt_persisted_rows_are_rejected() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTrackingRepository::new(&conn);
    let walk = Pulse::new(owner(), PulseKind::Habit, "Walk", day(2025, 1, 1));
    repo.save_pulse(&walk).unwrap();

    conn.execute(
        "UPDATE pulses SET start_date = 'yesterday' WHERE id = ?1",
        params![walk.id.to_string()],
    )
    .unwrap();

    let err = repo.load_snapshot(&owner()).unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}
