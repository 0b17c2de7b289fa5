//! Display strings and date formats for the Japanese timetable.

use chrono::{Datelike, NaiveDate};
use shared::domain::{Mode, Track};

const WEEKDAYS: [&str; 7] = ["日", "月", "火", "水", "木", "金", "土"];

pub const PERIOD_CORNER: &str = "時限";
pub const COHORT_PROMPT: &str = "学年";
pub const SELECT_COHORT: &str = "学年を選択してください。";
pub const LOAD_FAILED: &str = "時間割データの読み込みに失敗しました。";
pub const ERROR_MARKER: &str = "エラー";

const LAST_UPDATED_PREFIX: &str = "最終更新: ";
const LAST_UPDATED_UNKNOWN: &str = "不明";
const LAST_UPDATED_FAILED: &str = "取得失敗";

pub fn mode_label(mode: Mode) -> &'static str {
    match mode {
        Mode::Day => "日",
        Mode::Week => "週",
    }
}

pub fn track_label(track: Track) -> &'static str {
    match track {
        Track::Undergraduate => "学部",
        Track::Graduate => "研究課程部",
    }
}

pub fn period_label(period: u8) -> String {
    format!("{period}限")
}

pub fn weekday_label(date: NaiveDate) -> &'static str {
    WEEKDAYS[date.weekday().num_days_from_sunday() as usize]
}

/// `2024年4月8日（月）`
pub fn day_header(date: NaiveDate) -> String {
    format!(
        "{}年{}月{}日（{}）",
        date.year(),
        date.month(),
        date.day(),
        weekday_label(date)
    )
}

/// `2024年4月8日～4月12日`
pub fn week_header(monday: NaiveDate, friday: NaiveDate) -> String {
    format!(
        "{}年{}月{}日～{}月{}日",
        monday.year(),
        monday.month(),
        monday.day(),
        friday.month(),
        friday.day()
    )
}

pub fn month_day(date: NaiveDate) -> String {
    format!("{}月{}日", date.month(), date.day())
}

pub fn last_updated(value: Option<&str>) -> String {
    format!(
        "{LAST_UPDATED_PREFIX}{}",
        value.unwrap_or(LAST_UPDATED_UNKNOWN)
    )
}

pub fn last_updated_failed() -> String {
    format!("{LAST_UPDATED_PREFIX}{LAST_UPDATED_FAILED}")
}
