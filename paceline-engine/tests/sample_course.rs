use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use paceline_engine::numbers::delta_to_hours;
use paceline_engine::{CLOSED_HOURS, Course, CourseDetail, compute_course_details};

fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 12, day)
        .and_then(|d| d.and_hms_opt(hour, minute, 0))
        .unwrap()
}

fn planned() -> CourseDetail {
    compute_course_details(&Course::sample().unwrap()).unwrap()
}

#[test]
fn sample_course_covers_both_days() {
    let course = Course::sample().unwrap();
    assert_eq!(course.segments.len(), 2);
    assert_eq!(course.split_count(), 4);

    let details = planned();
    assert!((details.distance - 550.0).abs() < 1e-9);
    assert_eq!(details.start_time, at(13, 8, 0));
    assert_eq!(details.total_sleep_time, TimeDelta::hours(11));

    let first = &details.segment_details[0];
    let second = &details.segment_details[1];
    assert_eq!(second.start_time, first.end_time + TimeDelta::hours(11));
    assert!((second.start_distance - 200.0).abs() < 1e-9);
}

#[test]
fn sample_course_speeds_follow_overrides_and_decay() {
    let speeds: Vec<f64> = planned()
        .split_details()
        .map(|s| s.leg.moving_speed)
        .collect();
    // Overrides on splits two and three leave the carried speed decaying.
    let expected = [17.0, 12.0, 18.0, 16.7];
    for (actual, expected) in speeds.iter().zip(expected) {
        assert!((actual - expected).abs() < 1e-9, "{actual} != {expected}");
    }
}

#[test]
fn sample_course_down_time_rules() {
    let details = planned();
    let splits: Vec<_> = details.split_details().collect();
    // Day one keeps its closing down-time.
    assert!((delta_to_hours(splits[1].leg.down_time) - 100.0 / 12.0 * 0.05).abs() < 1e-6);
    assert_eq!(splits[2].leg.down_time, TimeDelta::microseconds(300_000_000));
    assert_eq!(splits[3].leg.down_time, TimeDelta::zero());
    assert_eq!(splits[3].adjustment_time, TimeDelta::minutes(15));
    assert_eq!(splits[2].sub_splits.len(), 6);
    assert_eq!(splits[3].sub_splits.len(), 2);
}

#[test]
fn sample_course_rest_stop_hours_follow_arrival_day() {
    let lines = planned().rest_stop_lines();
    let hours: Vec<&str> = lines.iter().map(|l| l.hours.as_str()).collect();
    // Saturday, Saturday (24h), Monday, Monday (24h).
    assert_eq!(hours, vec![CLOSED_HOURS, "24hrs", "6:00a -  9:00p", "24hr"]);
    assert!(lines[3].optional);
    assert!((lines[2].distance_from_previous - 300.0).abs() < 1e-9);
    assert!(lines[2].eta > at(15, 0, 0));
}

#[test]
fn sample_course_summary_serializes_as_hours() {
    let details = planned();
    let summary = details.summary();
    assert!((summary.sleep_hours - 11.0).abs() < 1e-9);
    assert!(summary.moving_to_elapsed > 0.0 && summary.moving_to_elapsed < 1.0);

    let json = serde_json::to_value(&details).unwrap();
    let sleep = json["total_sleep_time"].as_f64().unwrap();
    assert!((sleep - 11.0).abs() < 1e-9);
    let first_split = &json["segment_details"][0]["split_details"][0];
    assert!(first_split["rest_stop"]["arrival_date"].is_string());
    assert!(first_split["sub_splits"].as_array().unwrap().len() == 2);
}
