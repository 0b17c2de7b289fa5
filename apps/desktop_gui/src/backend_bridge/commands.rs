//! Backend commands queued from UI to backend worker.

use timetable_core::DataLocation;

pub enum BackendCommand {
    /// Full page load: fetch both data files and bootstrap from `query`.
    Load {
        location: DataLocation,
        query: String,
    },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::Load { .. } => "load",
        }
    }
}
