use chrono::NaiveDate;
use orbit_core::engine::analytics::{sub_intervals, SeriesGroup};
use orbit_core::{
    analytics_report, EngineError, OwnerScope, ProgressLog, Pulse, PulseKind, RecurrenceKind,
    TimeScale,
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

#[test]
fn weekly_intervals_align_to_monday_and_clamp_to_range_end() {
    let intervals = sub_intervals(day(2025, 1, 8), day(2025, 1, 20), TimeScale::Weekly).unwrap();
    assert_eq!(
        intervals,
        vec![
            (day(2025, 1, 6), day(2025, 1, 12)),
            (day(2025, 1, 13), day(2025, 1, 19)),
            (day(2025, 1, 20), day(2025, 1, 20)),
        ]
    );
}

#[test]
fn monthly_intervals_clamp_the_last_month() {
    let intervals = sub_intervals(day(2025, 1, 15), day(2025, 3, 10), TimeScale::Monthly).unwrap();
    assert_eq!(
        intervals,
        vec![
            (day(2025, 1, 1), day(2025, 1, 31)),
            (day(2025, 2, 1), day(2025, 2, 28)),
            (day(2025, 3, 1), day(2025, 3, 10)),
        ]
    );
}

#[test]
fn daily_series_and_kpis_follow_logged_days() {
    let walk = daily("walk");
    let logs = vec![
        ProgressLog::completed(walk.id, day(2025, 1, 1)),
        ProgressLog::completed(walk.id, day(2025, 1, 3)),
    ];
    let target = vec![&walk];

    let report = analytics_report(
        &target,
        &[],
        &logs,
        day(2025, 1, 1),
        day(2025, 1, 4),
        TimeScale::Daily,
        day(2025, 1, 5),
    )
    .unwrap();

    let values: Vec<f64> = report.series.iter().map(|point| point.overall_percentage).collect();
    assert_eq!(values, vec![100.0, 0.0, 100.0, 0.0]);
    assert_eq!(report.series[0].period_label, "2025-01-01");

    let kpis = &report.kpis;
    assert_eq!(kpis.overall_progress, 50.0);
    assert_eq!(kpis.consistency, 50.0);
    assert_eq!(kpis.average_progress, 100.0);
    assert_eq!(kpis.best_period.label.as_deref(), Some("2025-01-03"));
    assert_eq!(kpis.worst_period.label.as_deref(), Some("2025-01-03"));
    assert_eq!(kpis.worst_period.value, 100.0);
}

#[test]
fn group_breakdown_is_keyed_by_group_title() {
    let walk = daily("walk");
    let read = daily("read");
    let logs = vec![ProgressLog::completed(walk.id, day(2025, 1, 1))];
    let target = vec![&walk, &read];
    let groups = vec![
        SeriesGroup {
            title: "Walking".to_string(),
            pulses: vec![&walk],
        },
        SeriesGroup {
            title: "Reading".to_string(),
            pulses: vec![&read],
        },
    ];

    let report = analytics_report(
        &target,
        &groups,
        &logs,
        day(2025, 1, 1),
        day(2025, 1, 1),
        TimeScale::Daily,
        day(2025, 1, 2),
    )
    .unwrap();

    let point = &report.series[0];
    assert_eq!(point.overall_percentage, 50.0);
    assert_eq!(point.breakdown["Walking"], 100.0);
    assert_eq!(point.breakdown["Reading"], 0.0);

    let encoded = serde_json::to_value(point).unwrap();
    assert_eq!(encoded["Walking"], 100.0);
    assert_eq!(encoded["period_label"], "2025-01-01");
}

#[test]
fn worst_period_is_not_applicable_without_activity() {
    let walk = daily("walk");
    let target = vec![&walk];

    let report = analytics_report(
        &target,
        &[],
        &[],
        day(2025, 1, 1),
        day(2025, 1, 3),
        TimeScale::Daily,
        day(2025, 1, 4),
    )
    .unwrap();

    assert_eq!(report.kpis.worst_period.label, None);
    assert_eq!(report.kpis.worst_period.value, 0.0);
    assert_eq!(report.kpis.consistency, 0.0);
    assert_eq!(report.kpis.average_progress, 0.0);
}

#[test]
fn inverted_range_is_rejected() {
    let err = analytics_report(
        &[],
        &[],
        &[],
        day(2025, 1, 3),
        day(2025, 1, 1),
        TimeScale::Weekly,
        day(2025, 1, 4),
    )
    .unwrap_err();
    assert!(matches!(err, EngineError::InvalidRange { .. }));
}
