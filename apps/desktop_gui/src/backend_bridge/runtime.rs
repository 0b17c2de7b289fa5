//! Worker thread owning the tokio runtime that performs page loads.

use std::thread;

use crossbeam_channel::{Receiver, Sender};
use shared::domain::CohortCatalog;
use timetable_core::{bootstrap, source_for};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;

pub fn launch(cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>, catalog: CohortCatalog) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                tracing::error!("failed to build backend runtime: {err}");
                let _ = ui_tx.try_send(UiEvent::BackendFailed(format!(
                    "backend worker startup failure: failed to build runtime: {err}"
                )));
                return;
            }
        };

        while let Ok(cmd) = cmd_rx.recv() {
            match cmd {
                BackendCommand::Load { location, query } => {
                    let source = source_for(&location);
                    let today = chrono::Local::now().date_naive();
                    let startup = runtime.block_on(bootstrap(
                        source.as_ref(),
                        &query,
                        today,
                        catalog.clone(),
                    ));
                    if ui_tx
                        .send(UiEvent::Loaded {
                            location,
                            query,
                            startup,
                        })
                        .is_err()
                    {
                        break;
                    }
                }
            }
        }
        tracing::debug!("backend worker stopped");
    });
}
