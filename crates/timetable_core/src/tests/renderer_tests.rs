use super::*;
use crate::schedule::Schedule;
use shared::domain::{CohortCatalog, InfoRecord, ScheduleEntry};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).expect("valid date")
}

fn entry(date: NaiveDate, cohort: &str, period: u8, course: &str, room: &str) -> ScheduleEntry {
    ScheduleEntry {
        date,
        cohort: Cohort::new(cohort),
        period,
        course: course.to_string(),
        room: room.to_string(),
        comment: String::new(),
    }
}

fn algebra_state(query: &str) -> TimetableState {
    let mut state = TimetableState::new(d(2024, 4, 8), CohortCatalog::default()).with_schedule(
        Schedule::new(vec![entry(d(2024, 4, 8), "1年生", 3, "Algebra", "101")]),
    );
    state.load_from_query(query);
    state
}

fn table(model: &ViewModel) -> &TimetableTable {
    match &model.grid {
        Grid::Table(table) => table,
        Grid::Placeholder(message) => panic!("expected table, got placeholder {message}"),
    }
}

fn algebra() -> Cell {
    Cell::Class {
        course: "Algebra".to_string(),
        room: "101".to_string(),
    }
}

#[test]
fn sunday_maps_to_the_preceding_monday() {
    assert_eq!(week_monday(d(2024, 4, 14)), d(2024, 4, 8));
    assert_eq!(week_monday(d(2024, 4, 8)), d(2024, 4, 8));
    assert_eq!(week_monday(d(2024, 4, 13)), d(2024, 4, 8));
    assert_eq!(week_monday(d(2024, 1, 3)), d(2024, 1, 1));
}

#[test]
fn work_week_spans_monday_to_friday_across_month_ends() {
    assert_eq!(
        work_week(d(2024, 5, 1)),
        vec![
            d(2024, 4, 29),
            d(2024, 4, 30),
            d(2024, 5, 1),
            d(2024, 5, 2),
            d(2024, 5, 3)
        ]
    );
}

#[test]
fn day_view_places_entry_under_its_cohort_column() {
    let state = algebra_state("day=2024-04-08&target=undergrad");
    let model = render(&state);
    let table = table(&model);

    assert_eq!(model.date_header, "2024年4月8日（月）");
    let headers: Vec<&str> = table.columns.iter().map(|c| c.lines[0].as_str()).collect();
    assert_eq!(headers, ["1年生", "2年生", "3年生", "4年生", "4年助産"]);
    assert_eq!(table.rows.len(), 5);
    assert_eq!(table.rows[2].label, "3限");

    for row in &table.rows {
        for (column, cell) in row.cells.iter().enumerate() {
            if row.period == 3 && column == 0 {
                assert_eq!(cell, &algebra());
            } else {
                assert_eq!(cell, &Cell::Empty, "period {} column {column}", row.period);
            }
        }
    }
}

#[test]
fn day_view_headers_link_to_week_of_that_cohort() {
    let state = algebra_state("target=graduate");
    let model = render(&state);
    let table = table(&model);

    assert_eq!(table.columns.len(), 4);
    assert_eq!(
        table.columns[1].link,
        SettingsQuery::Week {
            grade: Cohort::new("M2")
        }
    );
}

#[test]
fn week_view_shows_monday_to_friday_for_a_midweek_anchor() {
    let state = algebra_state("day=2024-04-10&type=week&grade=1%E5%B9%B4%E7%94%9F");
    let model = render(&state);
    let table = table(&model);

    assert_eq!(model.date_header, "2024年4月8日～4月12日");
    let dates: Vec<NaiveDate> = table.columns.iter().map(|c| c.date).collect();
    assert_eq!(dates, work_week(d(2024, 4, 8)));
    assert_eq!(table.columns[0].lines, vec!["4月8日".to_string(), "月".to_string()]);
    assert_eq!(table.columns[4].lines[1], "金");
    assert_eq!(table.cell(3, 0), Some(&algebra()));
    assert_eq!(table.cell(3, 2), Some(&Cell::Empty));
    assert_eq!(
        table.columns[2].link,
        SettingsQuery::Day {
            target: Track::Undergraduate
        }
    );
}

#[test]
fn week_view_without_cohort_renders_placeholder_row() {
    let state = algebra_state("type=week");
    let model = render(&state);
    assert_eq!(model.grid, Grid::Placeholder(labels::SELECT_COHORT.to_string()));
    assert_eq!(model.cohort_selector.toggle_label, labels::COHORT_PROMPT);
    assert_eq!(model.cohort_selector.selected_index(), None);
}

#[test]
fn entries_without_course_label_render_empty() {
    let state = TimetableState::new(d(2024, 4, 8), CohortCatalog::default()).with_schedule(
        Schedule::new(vec![
            entry(d(2024, 4, 8), "2年生", 1, "", "201"),
            entry(d(2024, 4, 8), "2年生", 2, "Biology", ""),
        ]),
    );
    let model = render(&state);
    let table = table(&model);
    assert_eq!(table.cell(1, 1), Some(&Cell::Empty));
    assert_eq!(
        table.cell(2, 1),
        Some(&Cell::Class {
            course: "Biology".to_string(),
            room: String::new()
        })
    );
}

#[test]
fn duplicate_slots_resolve_to_first_record() {
    let state = TimetableState::new(d(2024, 4, 8), CohortCatalog::default()).with_schedule(
        Schedule::new(vec![
            entry(d(2024, 4, 8), "1年生", 1, "First", "A"),
            entry(d(2024, 4, 8), "1年生", 1, "Second", "B"),
        ]),
    );
    let model = render(&state);
    assert_eq!(
        table(&model).cell(1, 0),
        Some(&Cell::Class {
            course: "First".to_string(),
            room: "A".to_string()
        })
    );
}

#[test]
fn daily_notes_attach_to_columns_not_rows() {
    let mut note = entry(d(2024, 4, 9), "M1", 0, "", "");
    note.comment = "健康診断".to_string();
    let mut state = TimetableState::new(d(2024, 4, 9), CohortCatalog::default())
        .with_schedule(Schedule::new(vec![note]));
    state.load_from_query("type=week&grade=M1");

    let model = render(&state);
    let table = table(&model);
    assert_eq!(table.columns[1].notes, vec!["健康診断".to_string()]);
    assert!(table.columns[0].notes.is_empty());
    assert_eq!(table.rows.len(), 5);
}

#[test]
fn selectors_and_mode_options_reflect_state() {
    let model = render(&algebra_state("type=week&grade=M1&target=graduate"));

    let active: Vec<Mode> = model
        .mode_options
        .iter()
        .filter(|option| option.active)
        .map(|option| option.mode)
        .collect();
    assert_eq!(active, vec![Mode::Week]);

    assert!(model.cohort_selector.visible);
    assert!(!model.track_selector.visible);
    assert_eq!(model.cohort_selector.toggle_label, "M1");
    assert_eq!(model.cohort_selector.selected_index(), Some(5));
    assert_eq!(model.track_selector.toggle_label, "研究課程部");
    assert_eq!(model.track_selector.selected_index(), Some(1));
}

#[test]
fn last_updated_line_degrades_gracefully() {
    let base = algebra_state("");
    assert_eq!(render(&base).last_updated, None);

    let loaded = base.clone().with_info(InfoStatus::Loaded(InfoRecord {
        last_modified: Some("2024/04/01 12:00".to_string()),
    }));
    assert_eq!(
        render(&loaded).last_updated.as_deref(),
        Some("最終更新: 2024/04/01 12:00")
    );

    let unknown = base.clone().with_info(InfoStatus::Loaded(InfoRecord::default()));
    assert_eq!(render(&unknown).last_updated.as_deref(), Some("最終更新: 不明"));

    let failed = base.with_info(InfoStatus::Failed);
    assert_eq!(render(&failed).last_updated.as_deref(), Some("最終更新: 取得失敗"));
}

#[test]
fn load_failure_frame_shows_error_marker_and_message() {
    let model = render_load_failure(&algebra_state(""));
    assert_eq!(model.date_header, labels::ERROR_MARKER);
    assert_eq!(model.grid, Grid::Placeholder(labels::LOAD_FAILED.to_string()));
}

#[test]
fn latest_frame_merges_date_only_passes() {
    let mut frame = LatestFrame::default();
    let mut state = algebra_state("");
    frame.present(&render(&state), RenderScope::Full);

    state.load_from_query("day=2024-04-09&target=graduate");
    frame.present(&render(&state), RenderScope::DateOnly);

    let model = frame.model().expect("frame");
    assert_eq!(model.date_header, "2024年4月9日（火）");
    // Controls keep the previous full pass.
    assert_eq!(model.track_selector.toggle_label, "学部");
    assert_eq!(frame.passes(), 2);
    assert_eq!(frame.last_scope(), Some(RenderScope::DateOnly));
}
