//! Query-string protocol shared by the address bar, header links and bookmarks.

use chrono::NaiveDate;
use url::form_urlencoded;

use crate::domain::{Cohort, Mode, Track};

pub const PARAM_DAY: &str = "day";
pub const PARAM_TYPE: &str = "type";
pub const PARAM_GRADE: &str = "grade";
pub const PARAM_TARGET: &str = "target";

/// Raw values of the recognized parameters. For repeated keys the first occurrence wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pub day: Option<String>,
    pub mode: Option<String>,
    pub grade: Option<String>,
    pub target: Option<String>,
}

impl QueryParams {
    /// Accepts a bare query, a `?`-prefixed search string, or an empty string.
    pub fn parse(query: &str) -> Self {
        let query = query.trim();
        let query = query.strip_prefix('?').unwrap_or(query);

        let mut params = Self::default();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            let slot = match key.as_ref() {
                PARAM_DAY => &mut params.day,
                PARAM_TYPE => &mut params.mode,
                PARAM_GRADE => &mut params.grade,
                PARAM_TARGET => &mut params.target,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }
        params
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.day.as_deref().and_then(parse_day_param)
    }

    pub fn mode(&self) -> Option<Mode> {
        self.mode.as_deref().and_then(Mode::from_param)
    }

    pub fn track(&self) -> Option<Track> {
        self.target.as_deref().and_then(Track::from_param)
    }
}

/// Parses `YYYY[-]MM[-]DD`. Each separator is independently optional.
pub fn parse_day_param(raw: &str) -> Option<NaiveDate> {
    let bytes = raw.as_bytes();
    let (year, rest) = take_digits(bytes, 4)?;
    let rest = rest.strip_prefix(b"-").unwrap_or(rest);
    let (month, rest) = take_digits(rest, 2)?;
    let rest = rest.strip_prefix(b"-").unwrap_or(rest);
    let (day, rest) = take_digits(rest, 2)?;
    if !rest.is_empty() {
        return None;
    }
    NaiveDate::from_ymd_opt(year as i32, month, day)
}

fn take_digits(bytes: &[u8], count: usize) -> Option<(u32, &[u8])> {
    if bytes.len() < count {
        return None;
    }
    let (head, rest) = bytes.split_at(count);
    let mut value = 0u32;
    for byte in head {
        if !byte.is_ascii_digit() {
            return None;
        }
        value = value * 10 + u32::from(byte - b'0');
    }
    Some((value, rest))
}

/// Canonical bookmarkable settings. Never carries the date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsQuery {
    Week { grade: Cohort },
    Day { target: Track },
}

impl SettingsQuery {
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        match self {
            SettingsQuery::Week { grade } => serializer
                .append_pair(PARAM_TYPE, Mode::Week.as_param())
                .append_pair(PARAM_GRADE, grade.as_str()),
            SettingsQuery::Day { target } => serializer
                .append_pair(PARAM_TYPE, Mode::Day.as_param())
                .append_pair(PARAM_TARGET, target.as_param()),
        };
        serializer.finish()
    }

    /// Search-string form used for links and address comparison.
    pub fn href(&self) -> String {
        format!("?{}", self.to_query_string())
    }
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
