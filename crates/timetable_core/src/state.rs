use chrono::NaiveDate;
use shared::{
    domain::{Cohort, CohortCatalog, InfoRecord, Mode, Track},
    protocol::{
        QueryParams, SettingsQuery, PARAM_DAY, PARAM_GRADE, PARAM_TARGET, PARAM_TYPE,
    },
};

use crate::schedule::Schedule;

/// What is on screen. Only the controller mutates it after startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub mode: Mode,
    pub anchor_date: NaiveDate,
    pub cohort: Option<Cohort>,
    pub track: Track,
}

impl ViewState {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            mode: Mode::Day,
            anchor_date: today,
            cohort: None,
            track: Track::Undergraduate,
        }
    }
}

/// Outcome of the best-effort `info.json` load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum InfoStatus {
    #[default]
    NotLoaded,
    Loaded(InfoRecord),
    Failed,
}

/// View parameters plus the session-immutable records they are resolved against.
#[derive(Debug, Clone)]
pub struct TimetableState {
    view: ViewState,
    catalog: CohortCatalog,
    schedule: Schedule,
    info: InfoStatus,
}

impl TimetableState {
    pub fn new(today: NaiveDate, catalog: CohortCatalog) -> Self {
        Self {
            view: ViewState::new(today),
            catalog,
            schedule: Schedule::default(),
            info: InfoStatus::NotLoaded,
        }
    }

    pub fn with_schedule(mut self, schedule: Schedule) -> Self {
        self.schedule = schedule;
        self
    }

    pub fn with_info(mut self, info: InfoStatus) -> Self {
        self.info = info;
        self
    }

    /// Applies the recognized, well-formed parameters of a startup query.
    ///
    /// Anything unrecognized or malformed is skipped and leaves the field as it was.
    /// `day` is only ever read here; nothing serializes it back.
    pub fn load_from_query(&mut self, query: &str) {
        let params = QueryParams::parse(query);

        if let Some(raw) = params.day.as_deref() {
            match params.date() {
                Some(date) => self.view.anchor_date = date,
                None => ignored(PARAM_DAY, raw),
            }
        }

        if let Some(raw) = params.mode.as_deref() {
            match params.mode() {
                Some(mode) => self.view.mode = mode,
                None => ignored(PARAM_TYPE, raw),
            }
        }

        if let Some(raw) = params.grade.as_deref() {
            match self.catalog.find(raw) {
                Some(cohort) => self.view.cohort = Some(cohort.clone()),
                None => ignored(PARAM_GRADE, raw),
            }
        }

        if let Some(raw) = params.target.as_deref() {
            match params.track() {
                Some(track) => self.view.track = track,
                None => ignored(PARAM_TARGET, raw),
            }
        }
    }

    pub fn active_cohorts(&self) -> &[Cohort] {
        self.catalog.for_track(self.view.track)
    }

    pub fn serialize_settings(&self) -> SettingsQuery {
        match (&self.view.mode, &self.view.cohort) {
            (Mode::Week, Some(cohort)) => SettingsQuery::Week {
                grade: cohort.clone(),
            },
            _ => SettingsQuery::Day {
                target: self.view.track,
            },
        }
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn catalog(&self) -> &CohortCatalog {
        &self.catalog
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn info(&self) -> &InfoStatus {
        &self.info
    }

    /// Selected cohort, only when it belongs to the catalog.
    pub fn valid_cohort(&self) -> Option<&Cohort> {
        self.view
            .cohort
            .as_ref()
            .filter(|cohort| self.catalog.contains(cohort))
    }

    pub(crate) fn view_mut(&mut self) -> &mut ViewState {
        &mut self.view
    }

    /// Week mode must always show some cohort; falls back to the first one.
    /// Returns whether the cohort changed.
    pub(crate) fn ensure_week_cohort(&mut self) -> bool {
        if self.view.mode != Mode::Week || self.valid_cohort().is_some() {
            return false;
        }
        let fallback = self.catalog.first().cloned();
        let changed = self.view.cohort != fallback;
        self.view.cohort = fallback;
        changed
    }
}

fn ignored(param: &str, value: &str) {
    tracing::debug!(param, value, "ignoring malformed query parameter");
}

#[cfg(test)]
#[path = "tests/state_tests.rs"]
mod tests;
