use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use shared::domain::{CohortCatalog, Track};

pub const SETTINGS_FILE: &str = "timetable.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub data_location: String,
    pub log_filter: String,
    pub undergraduate_cohorts: Option<Vec<String>>,
    pub graduate_cohorts: Option<Vec<String>>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_location: "./docs".into(),
            log_filter: "info".into(),
            undergraduate_cohorts: None,
            graduate_cohorts: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    data_location: Option<String>,
    log_filter: Option<String>,
    undergraduate_cohorts: Option<Vec<String>>,
    graduate_cohorts: Option<Vec<String>>,
}

impl Settings {
    /// Catalog with any configured list replacing its default counterpart.
    pub fn catalog(&self) -> CohortCatalog {
        let defaults = CohortCatalog::default();
        let labels = |configured: &Option<Vec<String>>, track: Track| -> Vec<String> {
            match configured {
                Some(list) => list.clone(),
                None => defaults
                    .for_track(track)
                    .iter()
                    .map(|cohort| cohort.as_str().to_string())
                    .collect(),
            }
        };
        CohortCatalog::new(
            labels(&self.undergraduate_cohorts, Track::Undergraduate),
            labels(&self.graduate_cohorts, Track::Graduate),
        )
    }

    fn apply_file(&mut self, file_cfg: FileSettings) {
        if let Some(v) = file_cfg.data_location {
            self.data_location = v;
        }
        if let Some(v) = file_cfg.log_filter {
            self.log_filter = v;
        }
        if let Some(v) = file_cfg.undergraduate_cohorts.filter(|list| !list.is_empty()) {
            self.undergraduate_cohorts = Some(v);
        }
        if let Some(v) = file_cfg.graduate_cohorts.filter(|list| !list.is_empty()) {
            self.graduate_cohorts = Some(v);
        }
    }
}

/// Defaults, then the first settings file found, then environment overrides.
pub fn load_settings(explicit: Option<&Path>) -> Settings {
    let mut settings = Settings::default();

    if let Some(path) = settings_path(explicit) {
        match fs::read_to_string(&path) {
            Ok(raw) => match toml::from_str::<FileSettings>(&raw) {
                Ok(file_cfg) => {
                    tracing::debug!(path = %path.display(), "loaded settings file");
                    settings.apply_file(file_cfg);
                }
                Err(err) => {
                    tracing::warn!(path = %path.display(), "ignoring malformed settings: {err}");
                }
            },
            Err(err) => {
                tracing::warn!(path = %path.display(), "unable to read settings: {err}");
            }
        }
    }

    if let Ok(v) = std::env::var("TIMETABLE_DATA") {
        settings.data_location = v;
    }
    if let Ok(v) = std::env::var("APP__DATA_LOCATION") {
        settings.data_location = v;
    }
    if let Ok(v) = std::env::var("APP__LOG_FILTER") {
        settings.log_filter = v;
    }

    settings
}

fn settings_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    let local = PathBuf::from(SETTINGS_FILE);
    if local.exists() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("timetable").join(SETTINGS_FILE))
        .filter(|path| path.exists())
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;
