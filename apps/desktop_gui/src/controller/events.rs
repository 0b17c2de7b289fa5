//! Events delivered from the backend worker to the UI thread.

use timetable_core::{DataLocation, Startup};

pub enum UiEvent {
    Loaded {
        location: DataLocation,
        query: String,
        startup: Startup,
    },
    BackendFailed(String),
}
