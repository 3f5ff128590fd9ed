use chrono::{Datelike, Duration, Local, NaiveDate, NaiveTime};

use crate::errors::AppError;

/// Accepted date shapes, tried in order. Formats without a year are parsed
/// with the current calendar year appended.
const DATE_FORMATS: &[(&str, bool)] = &[
    ("%Y-%m-%d", true),
    ("%A, %B %d", false),
    ("%B %d", false),
    ("%A %B %d", false),
    ("%B %d, %Y", true),
    ("%B %d %Y", true),
    ("%A %d %B", false),
];

const TIME_FORMATS: &[&str] = &["%I:%M%p", "%H:%M", "%H:%M:%S"];

pub fn parse_date(raw: &str) -> Result<NaiveDate, AppError> {
    let cleaned = strip_ordinal_suffixes(raw);
    if cleaned.is_empty() {
        return Err(AppError::DateFormat(raw.to_string()));
    }

    let current_year = Local::now().year();
    for (format, has_year) in DATE_FORMATS {
        let (candidate, format) = if *has_year {
            (cleaned.clone(), (*format).to_string())
        } else {
            (format!("{cleaned} {current_year}"), format!("{format} %Y"))
        };
        if let Ok(date) = NaiveDate::parse_from_str(&candidate, &format) {
            return Ok(date);
        }
    }

    Err(AppError::DateFormat(raw.to_string()))
}

pub fn parse_time(raw: &str) -> Result<NaiveTime, AppError> {
    parse_with_formats(raw, TIME_FORMATS)
}

/// Like `parse_time` but also accepts an hour with a meridiem and no
/// minutes ("3pm"). Used when inferring an end time from a free-form start.
pub fn parse_time_lenient(raw: &str) -> Result<NaiveTime, AppError> {
    parse_with_formats(raw, &["%I:%M%p", "%H:%M", "%H:%M:%S", "%I%p"])
}

fn parse_with_formats(raw: &str, formats: &[&str]) -> Result<NaiveTime, AppError> {
    let cleaned: String = raw.to_lowercase().split_whitespace().collect();
    for format in formats {
        if let Ok(time) = NaiveTime::parse_from_str(&cleaned, format) {
            return Ok(time);
        }
    }
    Err(AppError::TimeFormat(raw.to_string()))
}

/// Thirty minutes after the start, wrapping across midnight. If the start
/// cannot be parsed under any format, it is echoed back verbatim.
pub fn infer_end_time(start_raw: &str) -> String {
    match parse_time_lenient(start_raw) {
        Ok(start) => (start + Duration::minutes(30)).format("%H:%M").to_string(),
        Err(_) => start_raw.to_string(),
    }
}

/// Drop "st"/"nd"/"rd"/"th" when it directly follows a digit, so
/// "October 25th" matches the month-day formats.
fn strip_ordinal_suffixes(raw: &str) -> String {
    let chars: Vec<char> = raw.trim().to_lowercase().chars().collect();
    let mut out = String::with_capacity(chars.len());
    let mut i = 0;
    while i < chars.len() {
        if i > 0 && chars[i - 1].is_ascii_digit() && i + 1 < chars.len() {
            let suffix = (chars[i], chars[i + 1]);
            if matches!(suffix, ('s', 't') | ('n', 'd') | ('r', 'd') | ('t', 'h')) {
                i += 2;
                continue;
            }
        }
        out.push(chars[i]);
        i += 1;
    }
    out
}
