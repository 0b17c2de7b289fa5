//! The single write path into [`TimetableState`].
//!
//! Every action runs to completion in three ordered steps: mutate state, render,
//! then (for settings changes only) sync the address bar. Rendering only borrows
//! state immutably, so a render pass can never trigger a URL write of its own.

use chrono::Duration;
use shared::{
    domain::{Mode, Track},
    protocol::SettingsQuery,
};
use tracing::{debug, info, warn};

use crate::{
    location::LocationBar,
    renderer::{self, Presenter, RenderScope},
    state::TimetableState,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

impl Direction {
    fn sign(self) -> i64 {
        match self {
            Direction::Previous => -1,
            Direction::Next => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dropdown {
    Track,
    Cohort,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UrlSync {
    Skip,
    Push,
}

pub struct Controller<P, L> {
    state: TimetableState,
    presenter: P,
    location: L,
    open_dropdown: Option<Dropdown>,
}

impl<P: Presenter, L: LocationBar> Controller<P, L> {
    pub fn new(state: TimetableState, presenter: P, location: L) -> Self {
        Self {
            state,
            presenter,
            location,
            open_dropdown: None,
        }
    }

    /// First paint once data has loaded. Also writes the canonical settings to the
    /// address bar, replacing whatever partial query the page was opened with.
    pub fn start(&mut self) {
        self.state.ensure_week_cohort();
        self.update(UrlSync::Push);
    }

    /// Pages one day (Day mode) or one week (Week mode). Never touches the URL.
    pub fn navigate(&mut self, direction: Direction) {
        let view = self.state.view();
        let days = view.mode.step_days() * direction.sign();
        let Some(anchor) = view.anchor_date.checked_add_signed(Duration::days(days)) else {
            warn!(days, "anchor date out of range; ignoring navigation");
            return;
        };
        self.state.view_mut().anchor_date = anchor;
        debug!(%anchor, "navigated");
        self.update_with(RenderScope::DateOnly, UrlSync::Skip);
    }

    pub fn switch_mode(&mut self, mode: Mode) {
        if self.state.view().mode == mode {
            return;
        }
        self.state.view_mut().mode = mode;
        self.state.ensure_week_cohort();
        info!(mode = mode.as_param(), "switched display mode");
        self.update(UrlSync::Push);
    }

    /// Labels outside the catalog are ignored.
    pub fn select_cohort(&mut self, label: &str) {
        self.open_dropdown = None;
        let Some(cohort) = self.state.catalog().find(label).cloned() else {
            warn!(cohort = label, "unknown cohort selected");
            return;
        };
        if self.state.view().cohort.as_ref() == Some(&cohort) {
            return;
        }
        info!(%cohort, "selected cohort");
        self.state.view_mut().cohort = Some(cohort);
        self.update(UrlSync::Push);
    }

    pub fn select_track(&mut self, track: Track) {
        self.open_dropdown = None;
        if self.state.view().track == track {
            return;
        }
        info!(track = track.as_param(), "selected track");
        self.state.view_mut().track = track;
        self.update(UrlSync::Push);
    }

    /// Applies the settings a column header link points at as one action.
    pub fn follow_link(&mut self, link: &SettingsQuery) {
        self.open_dropdown = None;
        let before = self.state.view().clone();

        match link {
            SettingsQuery::Week { grade } => {
                if let Some(cohort) = self.state.catalog().find(grade.as_str()).cloned() {
                    self.state.view_mut().cohort = Some(cohort);
                }
                self.state.view_mut().mode = Mode::Week;
                self.state.ensure_week_cohort();
            }
            SettingsQuery::Day { target } => {
                let view = self.state.view_mut();
                view.track = *target;
                view.mode = Mode::Day;
            }
        }

        if *self.state.view() == before {
            return;
        }
        info!(link = %link.href(), "followed header link");
        self.update(UrlSync::Push);
    }

    /// Opens `dropdown`, closing the other one; toggles it shut when already open.
    pub fn toggle_dropdown(&mut self, dropdown: Dropdown) {
        self.open_dropdown = if self.open_dropdown == Some(dropdown) {
            None
        } else {
            Some(dropdown)
        };
    }

    pub fn click_outside(&mut self) {
        self.open_dropdown = None;
    }

    pub fn open_dropdown(&self) -> Option<Dropdown> {
        self.open_dropdown
    }

    pub fn state(&self) -> &TimetableState {
        &self.state
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn location(&self) -> &L {
        &self.location
    }

    fn update(&mut self, sync: UrlSync) {
        self.update_with(RenderScope::Full, sync);
    }

    fn update_with(&mut self, scope: RenderScope, sync: UrlSync) {
        self.render(scope);
        if sync == UrlSync::Push {
            self.sync_location();
        }
    }

    fn render(&mut self, scope: RenderScope) {
        let model = renderer::render(&self.state);
        self.presenter.present(&model, scope);
    }

    fn sync_location(&mut self) {
        let search = self.state.serialize_settings().href();
        if self.location.search() == search {
            return;
        }
        self.location.push_search(&search);
        debug!(%search, "pushed settings to address bar");
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
