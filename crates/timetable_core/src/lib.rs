//! Timetable view engine: state, rendering, controller and data loading.

pub mod bootstrap;
pub mod controller;
pub mod labels;
pub mod location;
pub mod renderer;
pub mod schedule;
pub mod settings;
pub mod source;
pub mod state;

pub use bootstrap::{bootstrap, Startup};
pub use controller::{Controller, Direction, Dropdown};
pub use location::{split_address, LocationBar, MemoryHistory};
pub use renderer::{
    render, render_load_failure, Cell, ColumnHeader, Grid, LatestFrame, ModeOption, PeriodRow, Presenter,
    RenderScope, Selector, SelectorOption, TimetableTable, ViewModel,
};
pub use schedule::Schedule;
pub use settings::{load_settings, Settings};
pub use source::{source_for, DataLocation, DataSource, FileSource, HttpSource, LoadError};
pub use state::{InfoStatus, TimetableState, ViewState};

/// Controller wired to the in-process frame and history used by the desktop apps.
pub type TimetableController = Controller<LatestFrame, MemoryHistory>;
