use super::*;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).expect("valid date")
}

fn fresh() -> TimetableState {
    TimetableState::new(d(2024, 4, 1), CohortCatalog::default())
}

#[test]
fn defaults_to_day_mode_for_undergraduates() {
    let state = fresh();
    assert_eq!(state.view().mode, Mode::Day);
    assert_eq!(state.view().track, Track::Undergraduate);
    assert_eq!(state.view().cohort, None);
    assert_eq!(state.view().anchor_date, d(2024, 4, 1));
    assert_eq!(state.info(), &InfoStatus::NotLoaded);
}

#[test]
fn load_from_query_applies_every_recognized_parameter() {
    let mut state = fresh();
    state.load_from_query("?day=20240410&type=Week&grade=M2&target=GRADUATE");

    assert_eq!(state.view().anchor_date, d(2024, 4, 10));
    assert_eq!(state.view().mode, Mode::Week);
    assert_eq!(state.view().cohort, Some(Cohort::new("M2")));
    assert_eq!(state.view().track, Track::Graduate);
}

#[test]
fn load_from_query_accepts_each_date_separator_variant() {
    for query in [
        "day=2024-04-08",
        "day=20240408",
        "day=2024-0408",
        "day=202404-08",
    ] {
        let mut state = fresh();
        state.load_from_query(query);
        assert_eq!(state.view().anchor_date, d(2024, 4, 8), "query {query}");
    }
}

#[test]
fn malformed_parameters_leave_state_untouched() {
    let mut state = fresh();
    state.load_from_query("type=week&grade=1%E5%B9%B4%E7%94%9F");
    let before = state.view().clone();

    state.load_from_query("day=2024-13-01&type=month&grade=M9&target=staff&extra=1");

    assert_eq!(state.view(), &before);
}

#[test]
fn invalid_calendar_day_keeps_anchor() {
    let mut state = fresh();
    state.load_from_query("day=2023-02-29");
    assert_eq!(state.view().anchor_date, d(2024, 4, 1));
}

#[test]
fn active_cohorts_follow_track() {
    let mut state = fresh();
    assert_eq!(state.active_cohorts()[0], Cohort::new("1年生"));
    assert_eq!(state.active_cohorts().len(), 5);

    state.load_from_query("target=graduate");
    let labels: Vec<&str> = state.active_cohorts().iter().map(Cohort::as_str).collect();
    assert_eq!(labels, ["M1", "M2", "D1", "D2/3"]);
}

#[test]
fn serialize_settings_picks_week_only_with_a_cohort() {
    let mut state = fresh();
    assert_eq!(
        state.serialize_settings(),
        SettingsQuery::Day {
            target: Track::Undergraduate
        }
    );

    state.load_from_query("type=week");
    assert_eq!(
        state.serialize_settings(),
        SettingsQuery::Day {
            target: Track::Undergraduate
        }
    );

    state.load_from_query("grade=D1&day=2025-01-01");
    let serialized = state.serialize_settings();
    assert_eq!(
        serialized,
        SettingsQuery::Week {
            grade: Cohort::new("D1")
        }
    );
    assert!(!serialized.to_query_string().contains("day="));
}

#[test]
fn serialized_settings_reload_into_a_fresh_state() {
    let mut week = fresh();
    week.load_from_query("type=week&grade=4%E5%B9%B4%E5%8A%A9%E7%94%A3&target=graduate");
    let mut day = fresh();
    day.load_from_query("type=day&target=graduate&grade=M1");

    for original in [week, day] {
        let mut reloaded = fresh();
        reloaded.load_from_query(&original.serialize_settings().href());
        assert_eq!(reloaded.view().mode, original.view().mode);
        match original.view().mode {
            Mode::Week => assert_eq!(reloaded.view().cohort, original.view().cohort),
            Mode::Day => assert_eq!(reloaded.view().track, original.view().track),
        }
    }
}

#[test]
fn ensure_week_cohort_defaults_to_first_catalog_entry() {
    let mut state = fresh();
    assert!(!state.ensure_week_cohort());

    state.load_from_query("type=week");
    assert!(state.ensure_week_cohort());
    assert_eq!(state.view().cohort, Some(Cohort::new("1年生")));
    assert!(!state.ensure_week_cohort());
}

#[test]
fn grade_outside_a_custom_catalog_is_ignored() {
    let mut state = TimetableState::new(d(2024, 4, 1), CohortCatalog::new(["A"], ["B"]));
    state.load_from_query("grade=1%E5%B9%B4%E7%94%9F");
    assert_eq!(state.view().cohort, None);
    state.load_from_query("grade=B");
    assert_eq!(state.valid_cohort(), Some(&Cohort::new("B")));
}
