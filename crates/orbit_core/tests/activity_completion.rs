use chrono::NaiveDate;
use orbit_core::engine::completion::resolve;
use orbit_core::{
    active_by_day, pulses_for_date, EngineError, LogIndex, MeasurementType, OwnerScope,
    ProgressLog, Pulse, PulseKind, RecurrenceKind,
};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn daily(title: &str) -> Pulse {
    let mut pulse = Pulse::new(
        OwnerScope::User("u1".to_string()),
        PulseKind::Habit,
        title,
        day(2025, 1, 1),
    );
    pulse.recurrence = Some(RecurrenceKind::Daily);
    pulse
}

fn quantitative(title: &str, target: f64) -> Pulse {
    let mut pulse = daily(title);
    pulse.measurement_type = MeasurementType::Quantitative;
    pulse.measurement_goal.target_count = Some(target);
    pulse
}

#[test]
fn activity_index_has_an_entry_for_every_day() {
    let mut late = daily("late");
    late.start_date = Some(day(2025, 1, 3));
    let pulses = vec![daily("early"), late];

    let index = active_by_day(&pulses, day(2025, 1, 1), day(2025, 1, 4)).unwrap();

    assert_eq!(index.len(), 4);
    assert_eq!(index.active_on(day(2025, 1, 1)).len(), 1);
    assert_eq!(index.active_on(day(2025, 1, 3)).len(), 2);
    assert!(index.active_on(day(2025, 2, 1)).is_empty());
    let days: Vec<NaiveDate> = index.iter().map(|(date, _)| date).collect();
    assert_eq!(days.first(), Some(&day(2025, 1, 1)));
    assert_eq!(days.last(), Some(&day(2025, 1, 4)));
}

#[test]
fn activity_index_rejects_inverted_range() {
    let pulses = vec![daily("walk")];
    let err = active_by_day(&pulses, day(2025, 1, 5), day(2025, 1, 1)).unwrap_err();
    assert_eq!(
        err,
        EngineError::InvalidRange {
            start: day(2025, 1, 5),
            end: day(2025, 1, 1),
        }
    );
}

#[test]
fn log_index_rejects_two_logs_for_one_pulse_and_day() {
    let pulse = daily("walk");
    let logs = vec![
        ProgressLog::completed(pulse.id, day(2025, 1, 2)),
        ProgressLog::completed(pulse.id, day(2025, 1, 2)),
    ];
    let err = LogIndex::build(&logs).unwrap_err();
    assert!(matches!(err, EngineError::DuplicateLog { pulse_id, .. } if pulse_id == pulse.id));
}

#[test]
fn log_index_groups_logs_by_day() {
    let walk = daily("walk");
    let read = daily("read");
    let logs = vec![
        ProgressLog::completed(walk.id, day(2025, 1, 2)),
        ProgressLog::completed(read.id, day(2025, 1, 2)),
        ProgressLog::completed(walk.id, day(2025, 1, 3)),
    ];
    let index = LogIndex::build(&logs).unwrap();

    assert_eq!(index.logs_on(day(2025, 1, 2)).len(), 2);
    assert!(index.find(read.id, day(2025, 1, 3)).is_none());
    assert!(index.find(walk.id, day(2025, 1, 3)).is_some());
}

#[test]
fn quantitative_completion_requires_reaching_the_target() {
    let pulse = quantitative("pages", 10.0);
    let partial = ProgressLog::with_value(pulse.id, day(2025, 1, 2), 7.0, 10.0);
    let full = ProgressLog::with_value(pulse.id, day(2025, 1, 3), 10.0, 10.0);

    let occurrence = resolve(&pulse, day(2025, 1, 2), &[&partial]);
    assert!(!occurrence.completed_today);
    assert_eq!(occurrence.current_progress_value, Some(7.0));
    assert_eq!(occurrence.effective_completion_date, Some(day(2025, 1, 2)));

    let occurrence = resolve(&pulse, day(2025, 1, 3), &[&full]);
    assert!(occurrence.completed_today);
}

#[test]
fn binary_completion_follows_stored_percentage() {
    let pulse = daily("meditate");
    let mut half = ProgressLog::completed(pulse.id, day(2025, 1, 2));
    half.completion_percentage = Some(0.5);

    assert!(!resolve(&pulse, day(2025, 1, 2), &[&half]).completed_today);

    let done = ProgressLog::completed(pulse.id, day(2025, 1, 2));
    assert!(resolve(&pulse, day(2025, 1, 2), &[&done]).completed_today);
}

#[test]
fn resolution_ignores_logs_of_other_pulses() {
    let walk = daily("walk");
    let read = daily("read");
    let other = ProgressLog::completed(read.id, day(2025, 1, 2));

    let occurrence = resolve(&walk, day(2025, 1, 2), &[&other]);
    assert!(!occurrence.completed_today);
    assert_eq!(occurrence.current_progress_value, None);
    assert_eq!(occurrence.effective_completion_date, None);
}

#[test]
fn one_off_task_keeps_stored_completion_date_without_a_log() {
    let mut task = Pulse::new(
        OwnerScope::User("u1".to_string()),
        PulseKind::Task,
        "book flights",
        day(2025, 1, 1),
    );
    task.completion_date = Some(day(2025, 1, 4));

    let occurrence = resolve(&task, day(2025, 1, 4), &[]);
    assert!(!occurrence.completed_today);
    assert_eq!(occurrence.effective_completion_date, Some(day(2025, 1, 4)));
}

#[test]
fn pulses_for_date_returns_only_active_pulses() {
    let mut weekly = daily("weekly");
    weekly.recurrence = Some(RecurrenceKind::WeeklyAccumulative);
    let walk = daily("walk");
    let logs = vec![ProgressLog::completed(walk.id, day(2025, 1, 2))];

    let resolved = pulses_for_date(&[walk.clone(), weekly], &logs, day(2025, 1, 2));

    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0].pulse.id, walk.id);
    assert!(resolved[0].occurrence.completed_today);
    assert_eq!(resolved[0].achieved_fraction(), 1.0);
}

#[test]
fn quantitative_pulse_without_target_scores_completion_not_raw_value() {
    let mut glasses = daily("glasses");
    glasses.measurement_type = MeasurementType::Quantitative;
    let logs = vec![ProgressLog::with_value(glasses.id, day(2025, 1, 2), 5.0, 0.0)];

    let resolved = pulses_for_date(&[glasses], &logs, day(2025, 1, 2));

    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0].occurrence.current_progress_value, Some(5.0));
    assert_eq!(resolved[0].achieved_fraction(), 1.0);
}
