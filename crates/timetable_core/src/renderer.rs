//! Pure derivation of what to draw from [`TimetableState`].
//!
//! Nothing here mutates state; front ends consume [`ViewModel`] through a
//! [`Presenter`] and never re-derive active flags themselves.

use chrono::{Datelike, Duration, NaiveDate};
use shared::{
    domain::{Cohort, Mode, Track, PERIODS},
    protocol::SettingsQuery,
};

use crate::{
    labels,
    state::{InfoStatus, TimetableState},
};

/// Which regions a render pass refreshed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderScope {
    /// Mode indicator, selectors, date header and grid.
    Full,
    /// Date header and grid only; paging never touches the controls.
    DateOnly,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewModel {
    pub mode_options: Vec<ModeOption>,
    pub track_selector: Selector<Track>,
    pub cohort_selector: Selector<Cohort>,
    pub date_header: String,
    pub grid: Grid,
    pub last_updated: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeOption {
    pub mode: Mode,
    pub label: &'static str,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector<T> {
    pub visible: bool,
    pub toggle_label: String,
    pub options: Vec<SelectorOption<T>>,
}

impl<T> Selector<T> {
    pub fn selected_index(&self) -> Option<usize> {
        self.options.iter().position(|option| option.active)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorOption<T> {
    pub value: T,
    pub label: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Grid {
    Table(TimetableTable),
    /// A single full-width message row in place of the table body.
    Placeholder(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimetableTable {
    pub corner: &'static str,
    pub columns: Vec<ColumnHeader>,
    pub rows: Vec<PeriodRow>,
}

impl TimetableTable {
    pub fn cell(&self, period: u8, column: usize) -> Option<&Cell> {
        self.rows
            .iter()
            .find(|row| row.period == period)
            .and_then(|row| row.cells.get(column))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnHeader {
    pub lines: Vec<String>,
    pub date: NaiveDate,
    pub cohort: Cohort,
    /// Alternate settings the header link navigates to.
    pub link: SettingsQuery,
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodRow {
    pub period: u8,
    pub label: String,
    pub cells: Vec<Cell>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Class { course: String, room: String },
    Empty,
}

/// Receives every render pass. Implemented by each front end.
pub trait Presenter {
    fn present(&mut self, model: &ViewModel, scope: RenderScope);
}

/// Keeps the most recent frame, merging date-only passes into it.
#[derive(Debug, Clone, Default)]
pub struct LatestFrame {
    model: Option<ViewModel>,
    passes: usize,
    last_scope: Option<RenderScope>,
}

impl LatestFrame {
    pub fn model(&self) -> Option<&ViewModel> {
        self.model.as_ref()
    }

    pub fn passes(&self) -> usize {
        self.passes
    }

    pub fn last_scope(&self) -> Option<RenderScope> {
        self.last_scope
    }
}

impl Presenter for LatestFrame {
    fn present(&mut self, model: &ViewModel, scope: RenderScope) {
        self.passes += 1;
        self.last_scope = Some(scope);
        match (&mut self.model, scope) {
            (Some(current), RenderScope::DateOnly) => {
                current.date_header = model.date_header.clone();
                current.grid = model.grid.clone();
            }
            (slot, _) => *slot = Some(model.clone()),
        }
    }
}

/// Monday of the week containing `date`. Sunday belongs to the week that started
/// six days earlier.
pub fn week_monday(date: NaiveDate) -> NaiveDate {
    let offset = i64::from(date.weekday().num_days_from_monday());
    date.checked_sub_signed(Duration::days(offset))
        .unwrap_or(date)
}

/// Monday through Friday of the week containing `date`.
pub fn work_week(date: NaiveDate) -> Vec<NaiveDate> {
    week_monday(date).iter_days().take(5).collect()
}

pub fn render(state: &TimetableState) -> ViewModel {
    let view = state.view();

    ViewModel {
        mode_options: Mode::ALL
            .into_iter()
            .map(|mode| ModeOption {
                mode,
                label: labels::mode_label(mode),
                active: mode == view.mode,
            })
            .collect(),
        track_selector: track_selector(state),
        cohort_selector: cohort_selector(state),
        date_header: date_header(state),
        grid: grid(state),
        last_updated: last_updated(state.info()),
    }
}

/// Frame shown when the schedule could not be loaded. No grid is built.
pub fn render_load_failure(state: &TimetableState) -> ViewModel {
    ViewModel {
        date_header: labels::ERROR_MARKER.to_string(),
        grid: Grid::Placeholder(labels::LOAD_FAILED.to_string()),
        ..render(state)
    }
}

fn track_selector(state: &TimetableState) -> Selector<Track> {
    let view = state.view();
    Selector {
        visible: view.mode == Mode::Day,
        toggle_label: labels::track_label(view.track).to_string(),
        options: Track::ALL
            .into_iter()
            .map(|track| SelectorOption {
                value: track,
                label: labels::track_label(track).to_string(),
                active: track == view.track,
            })
            .collect(),
    }
}

fn cohort_selector(state: &TimetableState) -> Selector<Cohort> {
    let view = state.view();
    let selected = state.valid_cohort();
    Selector {
        visible: view.mode == Mode::Week,
        toggle_label: selected
            .map(|cohort| cohort.to_string())
            .unwrap_or_else(|| labels::COHORT_PROMPT.to_string()),
        options: state
            .catalog()
            .all()
            .map(|cohort| SelectorOption {
                value: cohort.clone(),
                label: cohort.to_string(),
                active: Some(cohort) == selected,
            })
            .collect(),
    }
}

fn date_header(state: &TimetableState) -> String {
    let view = state.view();
    match view.mode {
        Mode::Day => labels::day_header(view.anchor_date),
        Mode::Week => {
            let days = work_week(view.anchor_date);
            match (days.first(), days.last()) {
                (Some(monday), Some(friday)) => labels::week_header(*monday, *friday),
                _ => labels::day_header(view.anchor_date),
            }
        }
    }
}

fn grid(state: &TimetableState) -> Grid {
    let view = state.view();
    let columns: Vec<ColumnHeader> = match view.mode {
        Mode::Day => state
            .active_cohorts()
            .iter()
            .map(|cohort| ColumnHeader {
                lines: vec![cohort.to_string()],
                date: view.anchor_date,
                cohort: cohort.clone(),
                link: SettingsQuery::Week {
                    grade: cohort.clone(),
                },
                notes: state.schedule().notes(view.anchor_date, cohort).to_vec(),
            })
            .collect(),
        Mode::Week => {
            let Some(cohort) = state.valid_cohort() else {
                return Grid::Placeholder(labels::SELECT_COHORT.to_string());
            };
            work_week(view.anchor_date)
                .into_iter()
                .map(|date| ColumnHeader {
                    lines: vec![
                        labels::month_day(date),
                        labels::weekday_label(date).to_string(),
                    ],
                    date,
                    cohort: cohort.clone(),
                    link: SettingsQuery::Day { target: view.track },
                    notes: state.schedule().notes(date, cohort).to_vec(),
                })
                .collect()
        }
    };

    let rows = PERIODS
        .map(|period| PeriodRow {
            period,
            label: labels::period_label(period),
            cells: columns
                .iter()
                .map(|column| {
                    match state.schedule().lookup(column.date, &column.cohort, period) {
                        Some(entry) if entry.has_course() => Cell::Class {
                            course: entry.course.clone(),
                            room: entry.room.clone(),
                        },
                        _ => Cell::Empty,
                    }
                })
                .collect(),
        })
        .collect();

    Grid::Table(TimetableTable {
        corner: labels::PERIOD_CORNER,
        columns,
        rows,
    })
}

fn last_updated(info: &InfoStatus) -> Option<String> {
    match info {
        InfoStatus::NotLoaded => None,
        InfoStatus::Loaded(record) => Some(labels::last_updated(
            record.last_modified.as_deref().filter(|value| !value.is_empty()),
        )),
        InfoStatus::Failed => Some(labels::last_updated_failed()),
    }
}

#[cfg(test)]
#[path = "tests/renderer_tests.rs"]
mod tests;
