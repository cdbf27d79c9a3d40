//! Small pure helpers shared by the capture heuristics.
//!
//! # Responsibility
//! - Resolve local days, clock minutes and weekdays for the caller's instant.
//! - Provide numeric coercion that treats non-finite values as absent.
//!
//! # Invariants
//! - No helper reads the system clock; "now" always comes from `TimeAnchor`.
//! - A `TimeAnchor` only exists for instants in `MIN_NOW_MS..=MAX_NOW_MS`, so
//!   day and minute arithmetic derived from it cannot overflow.

use chrono::{DateTime, Datelike, Days, FixedOffset, NaiveDate, Timelike, Weekday};

pub const MINUTE_MS: i64 = 60 * 1000;
pub const HOUR_MS: i64 = 60 * MINUTE_MS;
pub const MINUTES_PER_DAY: i64 = 24 * 60;

/// 0001-01-01T00:00:00Z.
pub const MIN_NOW_MS: i64 = -62_135_596_800_000;
/// 9999-12-31T23:59:59.999Z.
pub const MAX_NOW_MS: i64 = 253_402_300_799_999;

/// Caller-supplied instant plus the wall-clock offset used to interpret it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeAnchor {
    /// Epoch milliseconds treated as "now" for the whole parse call.
    pub now_ms: i64,
    now: DateTime<FixedOffset>,
    today_start_ms: i64,
}

impl TimeAnchor {
    /// Anchors `now_ms` in the fixed offset `utc_offset_minutes`.
    ///
    /// Returns `None` when `now_ms` is outside `MIN_NOW_MS..=MAX_NOW_MS` or
    /// the offset is not strictly within one day.
    pub fn new(now_ms: i64, utc_offset_minutes: i32) -> Option<Self> {
        if !(MIN_NOW_MS..=MAX_NOW_MS).contains(&now_ms) {
            return None;
        }
        let offset = FixedOffset::east_opt(utc_offset_minutes.checked_mul(60)?)?;
        let now = DateTime::from_timestamp_millis(now_ms)?.with_timezone(&offset);
        let today_start_ms = midnight_ms(now.date_naive(), offset)?;
        Some(Self {
            now_ms,
            now,
            today_start_ms,
        })
    }

    pub fn today(&self) -> NaiveDate {
        self.now.date_naive()
    }

    /// Epoch ms of local midnight today.
    pub fn today_start(&self) -> i64 {
        self.today_start_ms
    }

    /// Epoch ms of local midnight `offset_days` away from today.
    ///
    /// Falls back to today when the target day is not representable.
    pub fn day_start(&self, offset_days: i64) -> i64 {
        let today = self.today();
        let day = if offset_days >= 0 {
            today.checked_add_days(Days::new(offset_days.unsigned_abs()))
        } else {
            today.checked_sub_days(Days::new(offset_days.unsigned_abs()))
        };
        day.and_then(|day| midnight_ms(day, *self.now.offset()))
            .unwrap_or(self.today_start_ms)
    }

    /// Whole days from today to `date`.
    pub fn days_until(&self, date: NaiveDate) -> i64 {
        date.signed_duration_since(self.today()).num_days()
    }

    /// Local minute-of-day (`0..1440`) of now.
    pub fn now_minute(&self) -> i64 {
        i64::from(self.now.hour() * 60 + self.now.minute())
    }

    pub fn now_hour(&self) -> i64 {
        i64::from(self.now.hour())
    }

    pub fn weekday(&self) -> Weekday {
        self.now.weekday()
    }

    /// Now, rounded down to the previous local `:00` or `:30`.
    pub fn now_snapped_to_half_hour(&self) -> i64 {
        self.today_start_ms + (self.now_minute() / 30) * 30 * MINUTE_MS
    }

    /// Local wall-clock time of `ms`.
    pub fn local(&self, ms: i64) -> Option<DateTime<FixedOffset>> {
        DateTime::from_timestamp_millis(ms).map(|at| at.with_timezone(self.now.offset()))
    }
}

fn midnight_ms(day: NaiveDate, offset: FixedOffset) -> Option<i64> {
    day.and_hms_opt(0, 0, 0)?
        .and_local_timezone(offset)
        .single()
        .map(|at| at.timestamp_millis())
}

/// Formats a local `HH:MM` label for `ms`.
pub fn format_clock(anchor: &TimeAnchor, ms: i64) -> String {
    anchor
        .local(ms)
        .map(|at| at.format("%H:%M").to_string())
        .unwrap_or_default()
}

/// Parses a decimal token, returning `None` for malformed or non-finite input.
pub fn parse_finite(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Parses an integer token, returning `None` for malformed input.
pub fn parse_int(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok()
}

/// Converts `whole` hours plus an optional single tenth digit to minutes.
pub fn hours_to_minutes(whole: &str, tenth: Option<&str>) -> Option<i64> {
    let whole = parse_int(whole)? as f64;
    let tenth = match tenth {
        Some(digit) => parse_int(digit)? as f64 / 10.0,
        None => 0.0,
    };
    let minutes = ((whole + tenth) * 60.0).round();
    minutes.is_finite().then_some(minutes as i64)
}

/// Uppercases the first character of `value`.
pub fn capitalize_first(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Removes the first ASCII-case-insensitive occurrence of `needle`.
///
/// Returns `haystack` unchanged when `needle` is empty or absent.
pub fn remove_first_ignore_case(haystack: &str, needle: &str) -> String {
    if needle.is_empty() {
        return haystack.to_string();
    }
    let lowered = haystack.to_ascii_lowercase();
    match lowered.find(&needle.to_ascii_lowercase()) {
        Some(start) => {
            let end = start + needle.len();
            format!("{}{}", &haystack[..start], &haystack[end..])
        }
        None => haystack.to_string(),
    }
}

/// Pushes `value` when not already present, keeping first-seen order.
pub fn push_unique(values: &mut Vec<String>, value: String) {
    if !values.contains(&value) {
        values.push(value);
    }
}
