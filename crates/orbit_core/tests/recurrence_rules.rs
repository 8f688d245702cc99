use chrono::{NaiveDate, Weekday};
use orbit_core::engine::recurrence::ONE_OFF_HORIZON_DAYS;
use orbit_core::{is_active, OwnerScope, Pulse, PulseKind, RecurrenceKind, WeekdaySet};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn habit(recurrence: RecurrenceKind, start: NaiveDate) -> Pulse {
    let mut pulse = Pulse::new(
        OwnerScope::User("u1".to_string()),
        PulseKind::Habit,
        "habit",
        start,
    );
    pulse.recurrence = Some(recurrence);
    pulse
}

#[test]
fn weekly_fixed_days_fire_only_on_listed_weekdays() {
    let mut pulse = habit(RecurrenceKind::parse("WEEKLY_DIAS_FIJOS"), day(2025, 1, 1));
    pulse.recurrence_days = Some(WeekdaySet::from_codes(["L", "X", "V"]));

    assert!(is_active(&pulse, day(2025, 1, 1)));
    assert!(!is_active(&pulse, day(2025, 1, 2)));
    assert!(is_active(&pulse, day(2025, 1, 3)));
    assert!(!is_active(&pulse, day(2025, 1, 4)));
    assert!(!is_active(&pulse, day(2025, 1, 5)));
    assert!(is_active(&pulse, day(2025, 1, 6)));
    assert!(!is_active(&pulse, day(2024, 12, 30)), "before start");
}

#[test]
fn weekly_fixed_days_without_day_set_is_never_active() {
    let pulse = habit(RecurrenceKind::WeeklyFixedDays, day(2025, 1, 1));
    assert!(!is_active(&pulse, day(2025, 1, 1)));
}

#[test]
fn daily_respects_start_and_due_bounds() {
    let mut pulse = habit(RecurrenceKind::Daily, day(2025, 1, 10));
    pulse.due_date = Some(day(2025, 1, 12));

    assert!(!is_active(&pulse, day(2025, 1, 9)));
    assert!(is_active(&pulse, day(2025, 1, 10)));
    assert!(is_active(&pulse, day(2025, 1, 12)));
    assert!(!is_active(&pulse, day(2025, 1, 13)));
}

#[test]
fn day_interval_counts_from_start_date() {
    let mut pulse = habit(RecurrenceKind::DayInterval, day(2025, 1, 1));
    pulse.recurrence_interval = Some(3);

    assert!(is_active(&pulse, day(2025, 1, 1)));
    assert!(!is_active(&pulse, day(2025, 1, 3)));
    assert!(is_active(&pulse, day(2025, 1, 4)));
    assert!(is_active(&pulse, day(2025, 1, 7)));

    pulse.recurrence_interval = None;
    assert!(!is_active(&pulse, day(2025, 1, 4)), "missing interval");
}

#[test]
fn weekly_interval_fixed_days_skip_off_weeks() {
    let mut pulse = habit(RecurrenceKind::WeeklyIntervalFixedDays, day(2025, 1, 6));
    pulse.recurrence_interval = Some(2);
    pulse.recurrence_days = Some(WeekdaySet::new([Weekday::Mon]));

    assert!(is_active(&pulse, day(2025, 1, 6)));
    assert!(!is_active(&pulse, day(2025, 1, 13)));
    assert!(is_active(&pulse, day(2025, 1, 20)));
    assert!(!is_active(&pulse, day(2025, 1, 21)));
}

#[test]
fn monthly_fixed_day_clamps_to_short_months() {
    let mut pulse = habit(RecurrenceKind::MonthlyFixedDay, day(2025, 1, 1));
    pulse.recurrence_day_of_month = Some(31);

    assert!(is_active(&pulse, day(2025, 1, 31)));
    assert!(is_active(&pulse, day(2025, 2, 28)));
    assert!(is_active(&pulse, day(2025, 4, 30)));
    assert!(!is_active(&pulse, day(2025, 4, 29)));
}

#[test]
fn monthly_interval_fixed_day_counts_whole_elapsed_months() {
    let mut pulse = habit(RecurrenceKind::MonthlyIntervalFixedDay, day(2025, 1, 15));
    pulse.recurrence_interval = Some(2);
    pulse.recurrence_day_of_month = Some(15);

    assert!(is_active(&pulse, day(2025, 1, 15)));
    assert!(!is_active(&pulse, day(2025, 2, 15)));
    assert!(is_active(&pulse, day(2025, 3, 15)));
    assert!(!is_active(&pulse, day(2025, 3, 16)));
}

#[test]
fn monthly_interval_fixed_day_before_start_day_fires_in_following_month() {
    let mut pulse = habit(RecurrenceKind::MonthlyIntervalFixedDay, day(2025, 1, 15));
    pulse.recurrence_interval = Some(2);
    pulse.recurrence_day_of_month = Some(10);

    // Feb 10 is zero whole months after Jan 15.
    assert!(is_active(&pulse, day(2025, 2, 10)));
    assert!(!is_active(&pulse, day(2025, 3, 10)));
    assert!(is_active(&pulse, day(2025, 4, 10)));
    assert!(!is_active(&pulse, day(2025, 1, 10)), "before start");
}

#[test]
fn yearly_fixed_date_fires_on_feb_28_for_leap_day_anchor() {
    let pulse = habit(RecurrenceKind::YearlyFixedDate, day(2024, 2, 29));

    assert!(is_active(&pulse, day(2024, 2, 29)));
    assert!(is_active(&pulse, day(2025, 2, 28)));
    assert!(!is_active(&pulse, day(2025, 3, 1)));
    assert!(is_active(&pulse, day(2028, 2, 29)));
    assert!(!is_active(&pulse, day(2028, 2, 28)));
}

#[test]
fn one_off_is_active_over_start_to_due_range() {
    let mut pulse = Pulse::new(
        OwnerScope::User("u1".to_string()),
        PulseKind::Task,
        "file taxes",
        day(2025, 1, 10),
    );
    pulse.due_date = Some(day(2025, 1, 12));

    let active: Vec<NaiveDate> = (5..=15)
        .map(|d| day(2025, 1, d))
        .filter(|date| is_active(&pulse, *date))
        .collect();
    assert_eq!(active, vec![day(2025, 1, 10), day(2025, 1, 11), day(2025, 1, 12)]);
}

#[test]
fn completed_one_off_is_active_exactly_on_completion_day() {
    let mut pulse = Pulse::new(
        OwnerScope::User("u1".to_string()),
        PulseKind::Task,
        "renew passport",
        day(2025, 1, 10),
    );
    pulse.due_date = Some(day(2025, 1, 20));
    pulse.completion_date = Some(day(2025, 1, 14));

    assert!(!is_active(&pulse, day(2025, 1, 10)));
    assert!(is_active(&pulse, day(2025, 1, 14)));
    assert!(!is_active(&pulse, day(2025, 1, 15)));
}

#[test]
fn undated_one_off_stays_active_up_to_the_horizon() {
    let start = day(2025, 1, 1);
    let pulse = Pulse::new(
        OwnerScope::User("u1".to_string()),
        PulseKind::Task,
        "someday",
        start,
    );
    let horizon = start + chrono::Days::new(ONE_OFF_HORIZON_DAYS);

    assert!(is_active(&pulse, horizon));
    assert!(!is_active(&pulse, horizon + chrono::Days::new(1)));
}

#[test]
fn archival_deactivates_days_after_archived_at() {
    let mut pulse = habit(RecurrenceKind::Daily, day(2025, 1, 1));
    pulse.archived = true;
    pulse.archived_at = Some(day(2025, 1, 5));

    assert!(is_active(&pulse, day(2025, 1, 5)));
    assert!(!is_active(&pulse, day(2025, 1, 6)));
}

#[test]
fn unknown_and_accumulative_kinds_are_never_active_on_a_day() {
    let unknown = habit(RecurrenceKind::parse("FORTNIGHTLY_SOMETIMES"), day(2025, 1, 1));
    assert_eq!(
        unknown.recurrence,
        Some(RecurrenceKind::Unknown("FORTNIGHTLY_SOMETIMES".to_string()))
    );
    assert!(!is_active(&unknown, day(2025, 1, 1)));

    let weekly = habit(RecurrenceKind::WeeklyAccumulative, day(2025, 1, 1));
    assert!(!is_active(&weekly, day(2025, 1, 1)));
}

#[test]
fn pulse_without_start_date_is_never_active() {
    let mut pulse = habit(RecurrenceKind::Daily, day(2025, 1, 1));
    pulse.start_date = None;
    assert!(!is_active(&pulse, day(2025, 1, 1)));
}

#[test]
fn legacy_wire_record_deserializes_into_canonical_kind() {
    let raw = r#"{
        "id": "5b0c7b8e-3f0e-4a52-9d7e-0c1a2b3c4d5e",
        "owner": {"kind": "user", "id": "u1"},
        "title": "Gym",
        "type": "habit",
        "measurement_type": "binary",
        "recurrence": "SEMANAL_DIAS_FIJOS",
        "recurrence_days": ["L", "X", "V"],
        "start_date": "2025-01-01"
    }"#;
    let pulse: Pulse = serde_json::from_str(raw).unwrap();

    assert_eq!(pulse.recurrence, Some(RecurrenceKind::WeeklyFixedDays));
    assert_eq!(pulse.weight, 1.0);
    assert!(is_active(&pulse, day(2025, 1, 3)));

    let encoded = serde_json::to_value(&pulse).unwrap();
    assert_eq!(encoded["recurrence"], "WEEKLY_FIXED_DAYS");
    assert_eq!(encoded["type"], "habit");
}
