//! Clock-time and duration resolution for single phrases.
//!
//! # Responsibility
//! - Resolve one time token (`3`, `4:30pm`, `7 o'clock`) to a local minute-of-day.
//! - Resolve relative offsets, explicit ranges and anchored single times.
//! - Parse explicit durations and estimate activity durations.
//!
//! # Invariants
//! - Returned minutes may exceed `1440` for relative times late in the day;
//!   callers clamp when converting to instants.
//! - A resolved range always has `end_min >= start_min` unless both 12h retries
//!   were exhausted; callers still enforce the interval invariant.
//! - Meridiem ambiguity is resolved by: explicit marker, preferred-after anchor,
//!   context keywords, then nearest forward occurrence from now.

use crate::nlp::tokens::{hours_to_minutes, parse_int, TimeAnchor, MINUTES_PER_DAY};
use once_cell::sync::Lazy;
use regex::Regex;

const HALF_DAY_MINUTES: i64 = 12 * 60;
const DEFAULT_RELATIVE_MINUTES_DURATION: i64 = 30;
const DEFAULT_RELATIVE_HOURS_DURATION: i64 = 60;

static TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,2})(?::(\d{2}))?\s*(am|pm)?(?:\s*o'?clock)?$").expect("valid token regex")
});
static COMMA_SEPARATOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(\d{1,2})\s*,\s*(?:to|until|till)\b").expect("valid comma separator regex")
});
static STUTTER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(\d{1,2})\s+(\d{1,2}:\d{2})\b").expect("valid stutter regex")
});
static RELATIVE_MINUTES_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bin\s+(\d{1,3})\s*(?:m|min|mins|minute|minutes)\b")
        .expect("valid relative minutes regex")
});
static RELATIVE_HOURS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bin\s+(\d{1,2})(?:\.(\d))?\s*(?:h|hr|hrs|hour|hours)\b")
        .expect("valid relative hours regex")
});
static RANGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:\bfrom\s+|\bat\s+|@)?\s*\b(\d{1,2}(?::\d{2})?(?:\s*o'?clock)?\s*(?:am|pm)?)\s*(?:-|\x{2013}|\x{2014}|\s+(?:to|until|till)\s+)\s*(\d{1,2}(?::\d{2})?(?:\s*o'?clock)?\s*(?:am|pm)?)\b",
    )
    .expect("valid range regex")
});
static SINGLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\bat|@)\s*(\d{1,2}(?::\d{2})?(?:\s*o'?clock)?\s*(?:am|pm)?)\b")
        .expect("valid single time regex")
});
static UNTIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:until|till)\s+(\d{1,2}(?::\d{2})?(?:\s*o'?clock)?\s*(?:am|pm)?)\b")
        .expect("valid until regex")
});
static MERIDIEM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(am|pm)\b").expect("valid meridiem regex"));
static LEADING_HOUR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(\d{1,2})").expect("valid leading hour regex"));
static SHIFT_VOCAB_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:work|shift|clinic|patients|inpatient|rounds)\b").expect("valid shift regex")
});
static EVENING_HINT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:dinner|tonight|night|pm)\b").expect("valid evening regex"));
static MORNING_HINT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:breakfast|morning|am)\b").expect("valid morning regex"));

static DURATION_MINUTES_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bfor\s+(\d{1,3})\s*(?:m|min|mins|minute|minutes)\b")
        .expect("valid duration minutes regex")
});
static DURATION_ONE_HOUR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bfor\s+(?:an?|1)\s+hour\b").expect("valid one hour regex")
});
static DURATION_HALF_HOUR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bfor\s+(?:(?:a|an)\s+half\s+hour|half\s+an?\s+hour)\b")
        .expect("valid half hour regex")
});
static DURATION_HOURS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bfor\s+(\d{1,2})(?:\.(\d))?\s*(?:h|hr|hrs|hour|hours)\b")
        .expect("valid duration hours regex")
});

/// Ordered activity keyword table used when no duration is stated.
static ACTIVITY_ESTIMATES: Lazy<Vec<(Regex, i64)>> = Lazy::new(|| {
    [
        (r"\b(?:brush|brushed)\b.*\b(?:teeth|tooth)\b", 2),
        (r"\bfloss\b", 2),
        (r"\bshower\b", 10),
        (r"\b(?:call|phone|ring)\b", 15),
        (r"\b(?:dinner|lunch|breakfast)\b", 60),
        (r"\b(?:meeting|appointment|visit)\b", 30),
        (r"\b(?:gym|workout|lift|run|cardio|yoga)\b", 60),
        (r"\b(?:grocery|store|shopping|errand)\b", 45),
        (r"\b(?:sleep|nap)\b", 60),
    ]
    .into_iter()
    .map(|(pattern, minutes)| (Regex::new(pattern).expect("valid estimate regex"), minutes))
    .collect()
});

/// Explicit AM/PM marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Meridiem {
    Am,
    Pm,
}

impl Meridiem {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "am" => Some(Self::Am),
            "pm" => Some(Self::Pm),
            _ => None,
        }
    }
}

/// Resolved local interval for one phrase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeRange {
    /// Local minute-of-day of the start.
    pub start_min: i64,
    /// Local minute-of-day of the end; equals `start_min` for a point time.
    pub end_min: i64,
    /// Lowercased text that produced the match, removed from titles.
    pub consumed: String,
}

/// Resolves one time token to a local minute-of-day.
///
/// `context` is scanned for evening/morning hints; `preferred_after` is the
/// carried anchor from the previous explicit time in the same capture.
pub fn resolve_time_token(
    raw: &str,
    context: &str,
    anchor: &TimeAnchor,
    forced: Option<Meridiem>,
    preferred_after: Option<i64>,
) -> Option<i64> {
    let token = raw.trim().to_ascii_lowercase();
    let caps = TOKEN_RE.captures(&token)?;
    let hour = parse_int(caps.get(1)?.as_str())?;
    let minute = match caps.get(2) {
        Some(m) => parse_int(m.as_str())?,
        None => 0,
    };
    if !(0..=23).contains(&hour) || !(0..=59).contains(&minute) {
        return None;
    }

    let meridiem = forced.or_else(|| caps.get(3).and_then(|m| Meridiem::parse(m.as_str())));
    if let Some(meridiem) = meridiem {
        // 24h tokens such as "15pm" keep their hour.
        let hour = match (hour, meridiem) {
            (12, Meridiem::Am) => 0,
            (h, Meridiem::Pm) if h < 12 => h + 12,
            (h, _) => h,
        };
        return Some(hour * 60 + minute);
    }

    let same_half = hour * 60 + minute;
    let afternoon = (hour % 12 + 12) * 60 + minute;

    if let Some(anchor_min) = preferred_after {
        let after = [same_half, afternoon]
            .into_iter()
            .filter(|candidate| *candidate >= anchor_min)
            .min();
        if let Some(candidate) = after {
            return Some(candidate);
        }
    }

    let ctx = context.to_lowercase();
    if (1..=11).contains(&hour) && EVENING_HINT_RE.is_match(&ctx) {
        return Some((hour + 12) * 60 + minute);
    }
    if MORNING_HINT_RE.is_match(&ctx) {
        if hour == 12 {
            return Some(minute);
        }
        if (1..=11).contains(&hour) {
            return Some(same_half);
        }
    }

    let now_min = anchor.now_minute();
    let forward = |candidate: i64| {
        if candidate >= now_min {
            candidate - now_min
        } else {
            candidate + MINUTES_PER_DAY - now_min
        }
    };
    if forward(afternoon) <= forward(same_half) {
        Some(afternoon)
    } else {
        Some(same_half)
    }
}

/// Resolves the first time expression in `phrase`.
///
/// Order: relative minutes, relative hours, explicit range, anchored single
/// time. Returns `None` when nothing matches.
pub fn resolve_time_range(
    phrase: &str,
    anchor: &TimeAnchor,
    preferred_after: Option<i64>,
) -> Option<TimeRange> {
    let lowered = phrase.to_lowercase();
    let collapsed = COMMA_SEPARATOR_RE.replace_all(&lowered, "${1} to");
    let text = STUTTER_RE.replace_all(&collapsed, "${2}").into_owned();

    if let Some(range) = resolve_relative(&text, anchor) {
        return Some(range);
    }
    if let Some(range) = resolve_explicit_range(&text, anchor, preferred_after) {
        return range;
    }

    let caps = SINGLE_RE.captures(&text)?;
    let start_min = resolve_time_token(
        caps.get(1)?.as_str(),
        &text,
        anchor,
        None,
        preferred_after,
    )?;
    Some(TimeRange {
        start_min,
        end_min: start_min,
        consumed: caps.get(0)?.as_str().to_string(),
    })
}

/// Resolves a bare `until <t>` continuation against the carried start.
pub fn resolve_until(phrase: &str, anchor: &TimeAnchor, base_start: i64) -> Option<TimeRange> {
    let caps = UNTIL_RE.captures(phrase)?;
    let raw = caps.get(1)?.as_str();
    let mut end_min = resolve_time_token(raw, phrase, anchor, None, Some(base_start))?;
    if end_min < base_start {
        end_min += HALF_DAY_MINUTES;
    }
    Some(TimeRange {
        start_min: base_start,
        end_min,
        consumed: caps.get(0)?.as_str().to_lowercase(),
    })
}

fn resolve_relative(text: &str, anchor: &TimeAnchor) -> Option<TimeRange> {
    if let Some(caps) = RELATIVE_MINUTES_RE.captures(text) {
        if let Some(delta) = caps.get(1).and_then(|m| parse_int(m.as_str())) {
            let start_min = anchor.now_minute() + delta.clamp(1, HALF_DAY_MINUTES);
            let duration = parse_duration_minutes(text).unwrap_or(DEFAULT_RELATIVE_MINUTES_DURATION);
            return Some(TimeRange {
                start_min,
                end_min: start_min + duration,
                consumed: caps.get(0)?.as_str().to_string(),
            });
        }
    }

    let caps = RELATIVE_HOURS_RE.captures(text)?;
    let delta = hours_to_minutes(caps.get(1)?.as_str(), caps.get(2).map(|m| m.as_str()))?;
    let start_min = anchor.now_minute() + delta.clamp(1, HALF_DAY_MINUTES);
    let duration = parse_duration_minutes(text).unwrap_or(DEFAULT_RELATIVE_HOURS_DURATION);
    Some(TimeRange {
        start_min,
        end_min: start_min + duration,
        consumed: caps.get(0)?.as_str().to_string(),
    })
}

/// Outer `None`: no range syntax. Inner `None`: range syntax whose tokens
/// failed to resolve, which ends resolution for the phrase.
fn resolve_explicit_range(
    text: &str,
    anchor: &TimeAnchor,
    preferred_after: Option<i64>,
) -> Option<Option<TimeRange>> {
    let caps = RANGE_RE.captures(text)?;
    let (Some(start_raw), Some(end_raw), Some(whole)) = (caps.get(1), caps.get(2), caps.get(0))
    else {
        return None;
    };
    let (start_raw, end_raw) = (start_raw.as_str(), end_raw.as_str());

    let start_has_meridiem = MERIDIEM_RE.is_match(start_raw);
    let end_meridiem = MERIDIEM_RE
        .captures(end_raw)
        .and_then(|m| m.get(1))
        .and_then(|m| Meridiem::parse(m.as_str()));

    let leading_hour = |raw: &str| {
        LEADING_HOUR_RE
            .captures(raw)
            .and_then(|m| m.get(1))
            .and_then(|m| parse_int(m.as_str()))
    };
    let overnight_like = match (leading_hour(start_raw), leading_hour(end_raw)) {
        (Some(start_hour), Some(end_hour)) => {
            start_hour > end_hour && SHIFT_VOCAB_RE.is_match(text)
        }
        _ => false,
    };

    // Shift vocabulary with "8-5" or "8-5pm" reads as a day shift.
    let infer_shift = overnight_like && !start_has_meridiem && end_meridiem.is_none();
    let start_forced = if infer_shift
        || (overnight_like && !start_has_meridiem && end_meridiem == Some(Meridiem::Pm))
    {
        Some(Meridiem::Am)
    } else {
        None
    };
    let end_forced = infer_shift.then_some(Meridiem::Pm);

    let Some(start_min) = resolve_time_token(start_raw, text, anchor, start_forced, preferred_after)
    else {
        return Some(None);
    };
    let Some(mut end_min) = resolve_time_token(end_raw, text, anchor, end_forced, Some(start_min))
    else {
        return Some(None);
    };
    for _ in 0..2 {
        if end_min < start_min {
            end_min += HALF_DAY_MINUTES;
        }
    }

    Some(Some(TimeRange {
        start_min,
        end_min,
        consumed: whole.as_str().trim().to_string(),
    }))
}

/// Parses an explicit "for N minutes/hours" duration.
pub fn parse_duration_minutes(text: &str) -> Option<i64> {
    let t = text.to_lowercase();
    if let Some(minutes) = DURATION_MINUTES_RE
        .captures(&t)
        .and_then(|caps| caps.get(1))
        .and_then(|m| parse_int(m.as_str()))
    {
        return Some(minutes.clamp(1, MINUTES_PER_DAY));
    }
    if DURATION_ONE_HOUR_RE.is_match(&t) {
        return Some(60);
    }
    if DURATION_HALF_HOUR_RE.is_match(&t) {
        return Some(30);
    }
    let caps = DURATION_HOURS_RE.captures(&t)?;
    let minutes = hours_to_minutes(caps.get(1)?.as_str(), caps.get(2).map(|m| m.as_str()))?;
    Some(minutes.clamp(1, MINUTES_PER_DAY))
}

/// Estimates an activity duration from keywords; defaults to 30 minutes.
pub fn estimate_minutes(text: &str) -> i64 {
    let t = text.to_lowercase();
    ACTIVITY_ESTIMATES
        .iter()
        .find(|(re, _)| re.is_match(&t))
        .map(|(_, minutes)| *minutes)
        .unwrap_or(30)
}

#[cfg(test)]
mod tests {
    use super::{
        estimate_minutes, parse_duration_minutes, resolve_time_range, resolve_time_token,
        resolve_until, Meridiem,
    };
    use crate::nlp::tokens::TimeAnchor;

    // 2024-01-01T10:00:00Z.
    fn anchor() -> TimeAnchor {
        TimeAnchor::new(1_704_103_200_000, 0).expect("fixed instant should anchor")
    }

    #[test]
    fn token_honors_explicit_and_forced_meridiem() {
        let a = anchor();
        assert_eq!(resolve_time_token("2pm", "", &a, None, None), Some(14 * 60));
        assert_eq!(resolve_time_token("12am", "", &a, None, None), Some(0));
        assert_eq!(resolve_time_token("12 pm", "", &a, None, None), Some(12 * 60));
        assert_eq!(
            resolve_time_token("7", "", &a, Some(Meridiem::Am), None),
            Some(7 * 60)
        );
        assert_eq!(resolve_time_token("4:75", "", &a, None, None), None);
        assert_eq!(resolve_time_token("soon", "", &a, None, None), None);
    }

    #[test]
    fn token_prefers_candidate_after_anchor() {
        let a = anchor();
        assert_eq!(
            resolve_time_token("4:30", "", &a, None, Some(15 * 60)),
            Some(16 * 60 + 30)
        );
        assert_eq!(
            resolve_time_token("11", "", &a, None, Some(9 * 60)),
            Some(11 * 60)
        );
    }

    #[test]
    fn token_uses_context_hints_then_nearest_forward() {
        let a = anchor();
        assert_eq!(
            resolve_time_token("7", "dinner with sam", &a, None, None),
            Some(19 * 60)
        );
        assert_eq!(
            resolve_time_token("8", "breakfast", &a, None, None),
            Some(8 * 60)
        );
        // 3 at 10:00 is closer going forward as 15:00.
        assert_eq!(resolve_time_token("3", "", &a, None, None), Some(15 * 60));
        // 11 at 10:00 is closer as 11:00.
        assert_eq!(resolve_time_token("11", "", &a, None, None), Some(11 * 60));
    }

    #[test]
    fn range_resolves_relative_offsets() {
        let a = anchor();
        let range = resolve_time_range("gym in 20 minutes", &a, None).unwrap();
        assert_eq!(range.start_min, 10 * 60 + 20);
        assert_eq!(range.end_min, 10 * 60 + 50);

        let range = resolve_time_range("call in 1.5 hours for 15 min", &a, None).unwrap();
        assert_eq!(range.start_min, 11 * 60 + 30);
        assert_eq!(range.end_min, 11 * 60 + 45);
    }

    #[test]
    fn range_applies_shift_heuristic() {
        let a = anchor();
        let range = resolve_time_range("clinic 8-5", &a, None).unwrap();
        assert_eq!(range.start_min, 8 * 60);
        assert_eq!(range.end_min, 17 * 60);

        let range = resolve_time_range("work 7 to 3pm", &a, None).unwrap();
        assert_eq!(range.start_min, 7 * 60);
        assert_eq!(range.end_min, 15 * 60);
    }

    #[test]
    fn range_rolls_end_forward_by_half_days() {
        let a = anchor();
        let range = resolve_time_range("meeting from 11am to 1", &a, None).unwrap();
        assert_eq!(range.start_min, 11 * 60);
        assert_eq!(range.end_min, 13 * 60);
        assert_eq!(range.consumed, "from 11am to 1");
    }

    #[test]
    fn single_anchored_time_and_absent_time() {
        let a = anchor();
        let range = resolve_time_range("Meeting at 2pm", &a, None).unwrap();
        assert_eq!(range.start_min, 14 * 60);
        assert_eq!(range.end_min, 14 * 60);
        assert_eq!(range.consumed, "at 2pm");

        let range = resolve_time_range("standup @9:15am", &a, None).unwrap();
        assert_eq!(range.start_min, 9 * 60 + 15);

        assert!(resolve_time_range("water the plants", &a, None).is_none());
    }

    #[test]
    fn until_continues_from_carried_start() {
        let a = anchor();
        let range = resolve_until("stop by the store until 4:30", &a, 15 * 60).unwrap();
        assert_eq!(range.start_min, 15 * 60);
        assert_eq!(range.end_min, 16 * 60 + 30);
        assert_eq!(range.consumed, "until 4:30");
    }

    #[test]
    fn durations_and_estimates() {
        assert_eq!(parse_duration_minutes("run for 45 min"), Some(45));
        assert_eq!(parse_duration_minutes("read for an hour"), Some(60));
        assert_eq!(parse_duration_minutes("nap for half an hour"), Some(30));
        assert_eq!(parse_duration_minutes("study for 2.5 hours"), Some(150));
        assert_eq!(parse_duration_minutes("study"), None);
        assert_eq!(estimate_minutes("brushed my teeth"), 2);
        assert_eq!(estimate_minutes("team meeting"), 30);
        assert_eq!(estimate_minutes("gym"), 60);
        assert_eq!(estimate_minutes("something else"), 30);
    }
}
