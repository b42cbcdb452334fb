//! 日期工具
//!
//! "今天" 总是在配置的时区中计算，而不是浏览器本地时区。

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

pub const DATE_INPUT_FORMAT: &str = "%Y-%m-%d";

/// 周日为 0
pub const DAY_ABBREVIATIONS: [&str; 7] = ["Dom", "Seg", "Ter", "Qua", "Qui", "Sex", "Sáb"];

pub fn day_abbreviation(day_of_week: u8) -> Option<&'static str> {
    DAY_ABBREVIATIONS.get(day_of_week as usize).copied()
}

/// 某一时刻在指定时区的日历日期
pub fn date_in(tz: Tz, instant: DateTime<Utc>) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

/// 指定时区的今天
pub fn today_in(tz: Tz) -> NaiveDate {
    date_in(tz, Utc::now())
}

/// `<input type="date">` 使用的 `YYYY-MM-DD`
pub fn format_date_input(date: NaiveDate) -> String {
    date.format(DATE_INPUT_FORMAT).to_string()
}

pub fn parse_date_input(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_INPUT_FORMAT).ok()
}
