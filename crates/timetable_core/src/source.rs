use std::{
    fmt,
    path::PathBuf,
    str::FromStr,
};

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use shared::{
    domain::{InfoRecord, ScheduleEntry},
    error::{DataError, ErrorCode},
};
use thiserror::Error;
use url::Url;

pub const SCHEDULE_FILE: &str = "schedule.json";
pub const INFO_FILE: &str = "info.json";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("invalid data location '{location}': {reason}")]
    InvalidLocation { location: String, reason: String },
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        source: reqwest::Error,
    },
    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to decode {name}: {source}")]
    Decode {
        name: String,
        source: serde_json::Error,
    },
}

impl LoadError {
    pub fn code(&self) -> ErrorCode {
        match self {
            LoadError::InvalidLocation { .. } => ErrorCode::InvalidLocation,
            LoadError::Transport { .. } => ErrorCode::Transport,
            LoadError::Status { .. } => ErrorCode::Status,
            LoadError::Io { .. } => ErrorCode::Io,
            LoadError::Decode { .. } => ErrorCode::Decode,
        }
    }
}

impl From<&LoadError> for DataError {
    fn from(value: &LoadError) -> Self {
        DataError::new(value.code(), value.to_string())
    }
}

/// Where `schedule.json` and `info.json` live: a local directory or a base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataLocation {
    Directory(PathBuf),
    Remote(Url),
}

impl FromStr for DataLocation {
    type Err = LoadError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(LoadError::InvalidLocation {
                location: raw.to_string(),
                reason: "empty location".to_string(),
            });
        }

        if raw.starts_with("http://") || raw.starts_with("https://") {
            let mut url = Url::parse(raw).map_err(|err| LoadError::InvalidLocation {
                location: raw.to_string(),
                reason: err.to_string(),
            })?;
            // Relative joins drop the last segment unless the base ends in '/'.
            if !url.path().ends_with('/') {
                let path = format!("{}/", url.path());
                url.set_path(&path);
            }
            return Ok(DataLocation::Remote(url));
        }

        let path = raw.strip_prefix("file://").unwrap_or(raw);
        Ok(DataLocation::Directory(PathBuf::from(path)))
    }
}

impl DataLocation {
    /// Address of the page that sits next to the data files; history entries
    /// are resolved against it.
    pub fn page_url(&self) -> Result<Url, LoadError> {
        match self {
            DataLocation::Remote(url) => Ok(url.clone()),
            DataLocation::Directory(dir) => {
                let absolute = if dir.is_absolute() {
                    dir.clone()
                } else {
                    std::env::current_dir()
                        .map_err(|source| LoadError::Io {
                            path: dir.clone(),
                            source,
                        })?
                        .join(dir)
                };
                Url::from_directory_path(&absolute).map_err(|()| LoadError::InvalidLocation {
                    location: absolute.display().to_string(),
                    reason: "not representable as a file URL".to_string(),
                })
            }
        }
    }
}

impl fmt::Display for DataLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataLocation::Directory(path) => write!(f, "{}", path.display()),
            DataLocation::Remote(url) => write!(f, "{url}"),
        }
    }
}

#[async_trait]
pub trait DataSource: Send + Sync {
    async fn fetch_schedule(&self) -> Result<Vec<ScheduleEntry>, LoadError>;
    async fn fetch_info(&self) -> Result<InfoRecord, LoadError>;
}

pub struct FileSource {
    dir: PathBuf,
}

impl FileSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    async fn read_json<T: DeserializeOwned>(&self, name: &str) -> Result<T, LoadError> {
        let path = self.dir.join(name);
        let raw = tokio::fs::read(&path)
            .await
            .map_err(|source| LoadError::Io {
                path: path.clone(),
                source,
            })?;
        decode(name, &raw)
    }
}

#[async_trait]
impl DataSource for FileSource {
    async fn fetch_schedule(&self) -> Result<Vec<ScheduleEntry>, LoadError> {
        self.read_json(SCHEDULE_FILE).await
    }

    async fn fetch_info(&self) -> Result<InfoRecord, LoadError> {
        self.read_json(INFO_FILE).await
    }
}

pub struct HttpSource {
    http: Client,
    base: Url,
}

impl HttpSource {
    pub fn new(base: Url) -> Self {
        Self {
            http: Client::new(),
            base,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, name: &str) -> Result<T, LoadError> {
        let url = self
            .base
            .join(name)
            .map_err(|err| LoadError::InvalidLocation {
                location: self.base.to_string(),
                reason: err.to_string(),
            })?;
        let transport = |source| LoadError::Transport {
            url: url.to_string(),
            source,
        };

        let response = self.http.get(url.clone()).send().await.map_err(transport)?;
        if !response.status().is_success() {
            return Err(LoadError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }
        let raw = response.bytes().await.map_err(transport)?;
        decode(name, &raw)
    }
}

#[async_trait]
impl DataSource for HttpSource {
    async fn fetch_schedule(&self) -> Result<Vec<ScheduleEntry>, LoadError> {
        self.get_json(SCHEDULE_FILE).await
    }

    async fn fetch_info(&self) -> Result<InfoRecord, LoadError> {
        self.get_json(INFO_FILE).await
    }
}

pub fn source_for(location: &DataLocation) -> Box<dyn DataSource> {
    match location {
        DataLocation::Directory(dir) => Box::new(FileSource::new(dir.clone())),
        DataLocation::Remote(base) => Box::new(HttpSource::new(base.clone())),
    }
}

fn decode<T: DeserializeOwned>(name: &str, raw: &[u8]) -> Result<T, LoadError> {
    serde_json::from_slice(raw).map_err(|source| LoadError::Decode {
        name: name.to_string(),
        source,
    })
}

#[cfg(test)]
#[path = "tests/source_tests.rs"]
mod tests;
