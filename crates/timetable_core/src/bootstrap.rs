use chrono::NaiveDate;
use shared::{domain::CohortCatalog, error::DataError};
use tracing::{error, info, warn};

use crate::{
    renderer::{self, ViewModel},
    schedule::Schedule,
    source::DataSource,
    state::{InfoStatus, TimetableState},
};

/// Result of a page load. Only `Ready` may be wired to user input.
#[derive(Debug, Clone)]
pub enum Startup {
    Ready(TimetableState),
    Failed { error: DataError, view: ViewModel },
}

impl Startup {
    pub fn is_ready(&self) -> bool {
        matches!(self, Startup::Ready(_))
    }
}

/// Seeds state from the opening query, then loads the schedule and info records
/// in that order. A schedule failure is terminal; an info failure only degrades
/// the "last updated" line.
pub async fn bootstrap(
    source: &dyn DataSource,
    query: &str,
    today: NaiveDate,
    catalog: CohortCatalog,
) -> Startup {
    let mut state = TimetableState::new(today, catalog);
    state.load_from_query(query);

    let entries = match source.fetch_schedule().await {
        Ok(entries) => entries,
        Err(err) => {
            error!("failed to load schedule: {err}");
            return Startup::Failed {
                error: DataError::from(&err),
                view: renderer::render_load_failure(&state),
            };
        }
    };
    let schedule = Schedule::new(entries);
    if schedule.is_empty() {
        warn!("schedule loaded but holds no entries");
    } else {
        info!(entries = schedule.len(), "schedule loaded");
    }

    let info = match source.fetch_info().await {
        Ok(record) => InfoStatus::Loaded(record),
        Err(err) => {
            warn!("failed to load info: {err}");
            InfoStatus::Failed
        }
    };

    Startup::Ready(
        state
            .with_schedule(schedule)
            .with_info(info),
    )
}
