use super::*;

#[test]
fn schedule_entry_reads_spreadsheet_export_shapes() {
    let raw = r#"[
        {"grade": "1年生", "date": "2024-04-08", "period": 3, "courses": "Algebra", "room": 101, "comment": ""},
        {"grade": "M1", "date": "2024-04-09", "period": 1, "courses": null},
        {"grade": "2年生", "date": "2024-04-10", "period": 0, "courses": "", "room": "", "comment": "健康診断"}
    ]"#;
    let entries: Vec<ScheduleEntry> = serde_json::from_str(raw).expect("decode");

    assert_eq!(entries[0].cohort, Cohort::new("1年生"));
    assert_eq!(entries[0].room, "101");
    assert!(entries[0].has_course());
    assert!(!entries[1].has_course());
    assert_eq!(entries[1].room, "");
    assert!(entries[2].is_note());
    assert!(!entries[0].is_note());
}

#[test]
fn catalog_orders_undergraduate_before_graduate() {
    let catalog = CohortCatalog::default();
    let labels: Vec<&str> = catalog.all().map(Cohort::as_str).collect();
    assert_eq!(
        labels,
        ["1年生", "2年生", "3年生", "4年生", "4年助産", "M1", "M2", "D1", "D2/3"]
    );
    assert_eq!(catalog.first(), Some(&Cohort::new("1年生")));
    assert_eq!(catalog.for_track(Track::Graduate).len(), 4);
    assert!(catalog.find("M3").is_none());
}

#[test]
fn mode_and_track_params_are_case_insensitive() {
    assert_eq!(Mode::from_param("Week"), Some(Mode::Week));
    assert_eq!(Mode::from_param("DAY"), Some(Mode::Day));
    assert_eq!(Mode::from_param("month"), None);
    assert_eq!(Track::from_param("UnderGrad"), Some(Track::Undergraduate));
    assert_eq!(Track::from_param("grad"), None);
    assert_eq!(Mode::Week.step_days(), 7);
}

#[test]
fn info_record_tolerates_missing_keys() {
    let info: InfoRecord = serde_json::from_str(r#"{"file_path": "x.xlsx"}"#).expect("decode");
    assert_eq!(info.last_modified, None);
}

#[test]
fn whole_float_rooms_drop_the_fraction() {
    let raw = r#"[
        {"grade": "1年生", "date": "2024-04-08", "period": 3, "courses": "Algebra", "room": 101.0},
        {"grade": "1年生", "date": "2024-04-08", "period": 4, "courses": 7.0, "room": 2.5}
    ]"#;
    let entries: Vec<ScheduleEntry> = serde_json::from_str(raw).expect("decode");
    assert_eq!(entries[0].room, "101");
    assert_eq!(entries[1].course, "7");
    assert_eq!(entries[1].room, "2.5");
}

#[test]
fn info_record_reads_numeric_values_and_odd_bodies() {
    let info: InfoRecord = serde_json::from_str(r#"{"last_modified": 20240401}"#).expect("decode");
    assert_eq!(info.last_modified.as_deref(), Some("20240401"));

    let bodies = [
        r#"[]"#,
        r#""2024/04/01""#,
        r#"{"last_modified": null}"#,
        r#"{"last_modified": ""}"#,
    ];
    for body in bodies {
        let info: InfoRecord = serde_json::from_str(body).expect("decode");
        assert_eq!(info.last_modified, None, "body {body}");
    }
}
