use std::{fmt, ops::RangeInclusive};

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Class slots shown as grid rows.
pub const PERIODS: RangeInclusive<u8> = 1..=5;

/// Records in this slot carry a daily note instead of a class.
pub const NOTE_PERIOD: u8 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Day,
    Week,
}

impl Mode {
    pub const ALL: [Mode; 2] = [Mode::Day, Mode::Week];

    pub fn as_param(self) -> &'static str {
        match self {
            Mode::Day => "day",
            Mode::Week => "week",
        }
    }

    /// Case-insensitive match against the `type` query values.
    pub fn from_param(raw: &str) -> Option<Self> {
        let lower = raw.to_lowercase();
        Self::ALL.into_iter().find(|mode| mode.as_param() == lower)
    }

    /// Days moved by one paging step.
    pub fn step_days(self) -> i64 {
        match self {
            Mode::Day => 1,
            Mode::Week => 7,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Track {
    #[default]
    Undergraduate,
    Graduate,
}

impl Track {
    pub const ALL: [Track; 2] = [Track::Undergraduate, Track::Graduate];

    pub fn as_param(self) -> &'static str {
        match self {
            Track::Undergraduate => "undergrad",
            Track::Graduate => "graduate",
        }
    }

    /// Case-insensitive match against the `target` query values.
    pub fn from_param(raw: &str) -> Option<Self> {
        let lower = raw.to_lowercase();
        Self::ALL.into_iter().find(|track| track.as_param() == lower)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cohort(pub String);

impl Cohort {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cohort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ordered cohort lists per track. Order is display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CohortCatalog {
    undergraduate: Vec<Cohort>,
    graduate: Vec<Cohort>,
}

impl Default for CohortCatalog {
    fn default() -> Self {
        Self::new(
            ["1年生", "2年生", "3年生", "4年生", "4年助産"],
            ["M1", "M2", "D1", "D2/3"],
        )
    }
}

impl CohortCatalog {
    pub fn new<U, G>(undergraduate: U, graduate: G) -> Self
    where
        U: IntoIterator,
        U::Item: Into<String>,
        G: IntoIterator,
        G::Item: Into<String>,
    {
        Self {
            undergraduate: undergraduate.into_iter().map(Cohort::new).collect(),
            graduate: graduate.into_iter().map(Cohort::new).collect(),
        }
    }

    pub fn for_track(&self, track: Track) -> &[Cohort] {
        match track {
            Track::Undergraduate => &self.undergraduate,
            Track::Graduate => &self.graduate,
        }
    }

    /// Universal cohort set: undergraduate then graduate.
    pub fn all(&self) -> impl Iterator<Item = &Cohort> {
        self.undergraduate.iter().chain(self.graduate.iter())
    }

    pub fn first(&self) -> Option<&Cohort> {
        self.all().next()
    }

    pub fn find(&self, label: &str) -> Option<&Cohort> {
        self.all().find(|cohort| cohort.as_str() == label)
    }

    pub fn contains(&self, cohort: &Cohort) -> bool {
        self.find(cohort.as_str()).is_some()
    }
}

/// One row of `schedule.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub date: NaiveDate,
    #[serde(rename = "grade")]
    pub cohort: Cohort,
    pub period: u8,
    #[serde(rename = "courses", default, deserialize_with = "lenient_label")]
    pub course: String,
    #[serde(default, deserialize_with = "lenient_label")]
    pub room: String,
    #[serde(default, deserialize_with = "lenient_label")]
    pub comment: String,
}

impl ScheduleEntry {
    pub fn has_course(&self) -> bool {
        !self.course.is_empty()
    }

    pub fn is_note(&self) -> bool {
        self.period == NOTE_PERIOD && !self.comment.is_empty()
    }
}

/// Spreadsheet exports emit numeric rooms and nulls; all of them read as text.
fn lenient_label<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.map(label_text).unwrap_or_default())
}

/// Float columns come through as `101.0`; whole values print without the fraction.
fn label_text(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(text) => text,
        serde_json::Value::Number(number) => match (number.as_i64(), number.as_f64()) {
            (Some(whole), _) => whole.to_string(),
            (None, Some(float)) if float.fract() == 0.0 && float.abs() < 1e15 => {
                format!("{float:.0}")
            }
            _ => number.to_string(),
        },
        other => other.to_string(),
    }
}

/// `info.json`. Any body decodes: a missing, null or empty `last_modified`,
/// or a body that is not an object, reads as unknown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InfoRecord {
    pub last_modified: Option<String>,
}

impl<'de> Deserialize<'de> for InfoRecord {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let last_modified = match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::Object(mut fields) => fields
                .remove("last_modified")
                .map(label_text)
                .filter(|text| !text.is_empty()),
            _ => None,
        };
        Ok(Self { last_modified })
    }
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
