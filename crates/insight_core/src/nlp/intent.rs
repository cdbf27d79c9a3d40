//! Phrase-level classifiers for tense, intent and signal quality.
//!
//! # Responsibility
//! - Classify a phrase as past tense, forgot-reminder, immediate or physical.
//! - Detect the day offset a capture refers to, including calendar dates.
//! - Score mood statements and pick out money amounts.
//! - Normalize titles and reject low-signal ("garbage") phrases.
//!
//! # Invariants
//! - Every classifier is a pure function of its input text (and anchor).
//! - Scores are clamped to `0..=10`; non-finite numbers are treated as absent.

use crate::nlp::tokens::{parse_finite, parse_int, TimeAnchor};
use chrono::{Datelike, NaiveDate, Weekday};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

const MAX_TITLE_CHARS: usize = 120;
const MAX_TITLE_WORDS: usize = 16;
const MIN_TITLE_CHARS: usize = 3;
const FILLER_WORDS: &[&str] = &[
    "ok", "okay", "alright", "right", "so", "then", "and", "yeah", "yep", "um", "uh", "i", "i'm",
    "im",
];
const MONTH_PATTERN: &str = "january|february|march|april|may|june|july|august|september|october|november|december|jan|feb|mar|apr|jun|jul|aug|sept|sep|oct|nov|dec";

static PAST_MARKER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:already|done|finished|completed|just did)\b").expect("valid past marker regex")
});
static PAST_SUBJECT_VERB_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(?:i|we)\s+(?:did|went|bought|got|ate|was|were|worked|studied|called|texted|emailed|brushed|slept)\b",
    )
    .expect("valid past subject regex")
});
static PAST_VERB_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:went|bought|ate|worked|called|brushed)\b").expect("valid past verb regex")
});
static FORGOT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bforgot\b").expect("valid forgot regex"));
static TOMORROW_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\btomorrow\b").expect("valid tomorrow regex"));
static YESTERDAY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\byesterday\b").expect("valid yesterday regex"));
static LAST_NIGHT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\blast night\b").expect("valid last night regex"));
static IN_DAYS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bin\s+(\d{1,2})\s+days?\b").expect("valid in days regex"));
static IN_WEEKS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bin\s+(\d{1,2})\s+weeks?\b").expect("valid in weeks regex"));
static NEXT_WEEK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bnext\s+week\b").expect("valid next week regex"));
static MONTH_DAY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\b(?:on\s+)?({MONTH_PATTERN})\.?\s+(\d{{1,2}})(?:st|nd|rd|th)?\b(?:,?\s*(\d{{4}})\b)?"
    ))
    .expect("valid month day regex")
});
static DAY_MONTH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\b(?:on\s+)?(?:the\s+)?(\d{{1,2}})(?:st|nd|rd|th)?\s+(?:of\s+)?({MONTH_PATTERN})\b\.?(?:,?\s*(\d{{4}})\b)?"
    ))
    .expect("valid day month regex")
});
static NUMERIC_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:on\s+)?(\d{1,2})/(\d{1,2})(?:/(\d{4}|\d{2}))?\b")
        .expect("valid numeric date regex")
});
static ISO_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:on\s+)?(\d{4})-(\d{1,2})-(\d{1,2})\b").expect("valid iso date regex")
});
static SCORE_LEAD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:feel|feeling|mood|rpe|rated?|energy|stress|pain|sleep)\b[^0-9]{0,24}$")
        .expect("valid score lead regex")
});
static WEEKDAY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(?:(next|last|this|on)\s+)?(sunday|monday|tuesday|wednesday|thursday|friday|saturday)\b",
    )
    .expect("valid weekday regex")
});
static IMMEDIATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:right now|now|starting|start(?:ing)?|about to|gonna|going to)\b")
        .expect("valid immediate regex")
});
static PHYSICAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:run|running|workout|gym|exercise|walk|walking|lift|lifting|train|training|bike|biking|cycle|cycling|swim|swimming|jog|jogging|stretch|stretching)\b",
    )
    .expect("valid physical regex")
});
static SHOULD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bshould\b").expect("valid should regex"));
static PARENT_HINT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:during|while)\s+(?:(?:my|the|a|an)\s+)?([a-z][\w\s-]{0,40})")
        .expect("valid parent hint regex")
});
static PARENT_HINT_CUT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:and then|then|also|but)\b|[,.]").expect("valid parent cut regex")
});
static MOOD_TRACKER_TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"#mood\s*(?:\(|:)").expect("valid mood token regex"));
static MOOD_FRACTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:feeling|feel|mood)\b[^0-9]{0,24}(\d{1,2})\s*/\s*10\b")
        .expect("valid mood fraction regex")
});
static MOOD_DIRECT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:mood|feeling|feel)\b[^0-9]{0,24}(\d{1,2})\b").expect("valid mood direct regex")
});
static MOOD_CLAUSE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:feeling|feel|mood)\b.*$").expect("valid mood clause regex"));
static MOOD_ADJECTIVES: Lazy<Vec<(Regex, i64)>> = Lazy::new(|| {
    [
        (r"\b(?:amazing|awesome|fantastic|incredible|great)\b", 9),
        (r"\b(?:good|pretty good|fine)\b", 7),
        (r"\b(?:okay|ok|meh|neutral)\b", 5),
        (r"\b(?:bad|not great|not good)\b", 3),
        (r"\b(?:awful|terrible|horrible|miserable)\b", 1),
        (r"\b(?:happy|joyful|excited)\b", 8),
        (r"\b(?:sad|down|depressed)\b", 2),
        (r"\b(?:angry|mad|frustrated)\b", 3),
    ]
    .into_iter()
    .map(|(pattern, score)| (Regex::new(pattern).expect("valid mood adjective regex"), score))
    .collect()
});
static MONEY_SYMBOL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\s*(\d+(?:\.\d{1,2})?)").expect("valid money symbol regex"));
static MONEY_WORD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(\d+(?:\.\d{1,2})?)\s*(?:dollars|bucks)\b").expect("valid money word regex")
});
static MONEY_SPEND_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bspend\s*(?:about\s*)?(\d+(?:\.\d{1,2})?)\b").expect("valid spend regex")
});
static MORNING_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bmorning\b").expect("valid morning regex"));
static AFTERNOON_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bafternoon\b").expect("valid afternoon regex"));
static EVENING_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bevening\b").expect("valid evening regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));
static FILLER_PREFIX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:ok(?:ay)?|alright|right|so|like|well|um+|uh+)\b[\s,.-]*")
        .expect("valid filler prefix regex")
});
static FILLER_LEAD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:ok(?:ay)?|um+|uh+)\b").expect("valid filler lead regex"));
static FIRST_PERSON_FUTURE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:i\s*'?m|im|i\s+am)\s+(?:going\s+to|gonna)\s+")
        .expect("valid first person future regex")
});
static PLURAL_FUTURE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:we\s*'?re|were|we\s+are)\s+(?:going\s+to|gonna)\s+")
        .expect("valid plural future regex")
});
static OBLIGATION_PREFIX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:i\s+(?:need|have)\s+to|i\s*'?ve\s+got\s+to|i\s+gotta|gotta)\s+")
        .expect("valid obligation prefix regex")
});
static TASK_INTENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:task|todo|reminder|need to)\b").expect("valid task intent regex")
});
static TASK_ONLY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:make (?:that )?a task|make this a task|reminder|todo)\b")
        .expect("valid task only regex")
});
static ACTIVITY_NOUN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:meeting|drive|driving|work|walk|dinner|lunch|breakfast|gym|workout|flight|clinic|rounds|study)\b",
    )
    .expect("valid activity noun regex")
});
static EXPLICIT_TASK_SIGNAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:i have to|i need to|need to|make (?:that )?a task|make this a task|reminder|todo|task for)\b",
    )
    .expect("valid explicit task signal regex")
});
static GLOBAL_SCOPE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:later|after this|after that|tomorrow|next|eventually)\b")
        .expect("valid scope regex")
});
static IMPERATIVE_LEAD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:call|text|email|buy|pick up|schedule|book|do|finish|start)\b")
        .expect("valid imperative lead regex")
});
static IMPERATIVE_PHRASE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:i have to|i need to|i'm gonna|im gonna|going to|gotta)\b")
        .expect("valid imperative phrase regex")
});

/// True for explicit past markers or past-tense verbs.
pub fn looks_like_past_tense(text: &str) -> bool {
    let t = text.to_lowercase();
    PAST_MARKER_RE.is_match(&t) || PAST_SUBJECT_VERB_RE.is_match(&t) || PAST_VERB_RE.is_match(&t)
}

pub fn looks_like_forgot(text: &str) -> bool {
    FORGOT_RE.is_match(text)
}

/// Day offset from local today that a capture refers to.
///
/// `tomorrow`/`yesterday` win; `last night` before 3am means yesterday;
/// then calendar dates; then `in N days|weeks`; then weekday names
/// (`next`/bare/`on`/`this` forward, `last` backward); then `next week`.
pub fn detect_day_offset(text: &str, anchor: &TimeAnchor) -> i64 {
    let t = text.to_lowercase();
    if TOMORROW_RE.is_match(&t) {
        return 1;
    }
    if YESTERDAY_RE.is_match(&t) {
        return -1;
    }
    if LAST_NIGHT_RE.is_match(&t) {
        return if anchor.now_hour() < 3 { -1 } else { 0 };
    }
    if let Some(date) = detect_calendar_date(&t, anchor) {
        return anchor.days_until(date);
    }
    if let Some(days) = first_number(&IN_DAYS_RE, &t) {
        return days;
    }
    if let Some(weeks) = first_number(&IN_WEEKS_RE, &t) {
        return weeks * 7;
    }
    if let Some(caps) = WEEKDAY_RE.captures(&t) {
        let qualifier = caps.get(1).map(|m| m.as_str());
        let target = caps
            .get(2)
            .and_then(|m| m.as_str().parse::<Weekday>().ok());
        if let Some(target) = target {
            let today = i64::from(anchor.weekday().num_days_from_sunday());
            let target = i64::from(target.num_days_from_sunday());
            let forward = (target - today).rem_euclid(7);
            return match qualifier {
                Some("next") if forward == 0 => 7,
                Some("last") => {
                    let back = (today - target).rem_euclid(7);
                    -(if back == 0 { 7 } else { back })
                }
                _ => forward,
            };
        }
    }
    if NEXT_WEEK_RE.is_match(&t) {
        return 7;
    }
    0
}

/// First calendar date named in `text` ("Jan 5", "5th of January", "1/5",
/// "2024-01-05").
///
/// Dates without a year take the next occurrence from today, or the most
/// recent one when the capture is past tense. Numeric `M/D` follows US order.
pub fn detect_calendar_date(text: &str, anchor: &TimeAnchor) -> Option<NaiveDate> {
    let mention = calendar_mentions(text).into_iter().next()?;
    if let Some(year) = mention.year {
        return NaiveDate::from_ymd_opt(year, mention.month, mention.day);
    }

    let today = anchor.today();
    let in_year = |year: i32| NaiveDate::from_ymd_opt(year, mention.month, mention.day);
    let this_year = in_year(today.year());
    if looks_like_past_tense(text) {
        match this_year {
            Some(date) if date <= today => Some(date),
            _ => in_year(today.year() - 1),
        }
    } else {
        match this_year {
            Some(date) if date >= today => Some(date),
            _ => in_year(today.year() + 1),
        }
    }
}

/// Removes calendar date mentions (and a leading `on`) from `text`.
pub fn strip_calendar_dates(text: &str) -> String {
    let mentions = calendar_mentions(text);
    if mentions.is_empty() {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for mention in mentions {
        out.push_str(&text[cursor..mention.start]);
        out.push(' ');
        cursor = mention.end;
    }
    out.push_str(&text[cursor..]);
    WHITESPACE_RE.replace_all(&out, " ").trim().to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CalendarMention {
    start: usize,
    end: usize,
    month: u32,
    day: u32,
    year: Option<i32>,
}

/// Non-overlapping date mentions in order of appearance.
///
/// Mentions that cannot be a real month/day are dropped, as are `N/10`
/// scores following words like "feeling" or "rpe".
fn calendar_mentions(text: &str) -> Vec<CalendarMention> {
    let mut found = Vec::new();
    for caps in MONTH_DAY_RE.captures_iter(text) {
        found.extend(to_mention(&caps, month_number(&caps, 1), parse_u32(&caps, 2), 3));
    }
    for caps in DAY_MONTH_RE.captures_iter(text) {
        found.extend(to_mention(&caps, month_number(&caps, 2), parse_u32(&caps, 1), 3));
    }
    for caps in NUMERIC_DATE_RE.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        if caps.get(3).is_none() && SCORE_LEAD_RE.is_match(&text[..whole.start()]) {
            continue;
        }
        found.extend(to_mention(&caps, parse_u32(&caps, 1), parse_u32(&caps, 2), 3));
    }
    for caps in ISO_DATE_RE.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        let year = caps.get(1).and_then(|m| m.as_str().parse::<i32>().ok());
        if let (Some(month), Some(day), Some(year)) = (parse_u32(&caps, 2), parse_u32(&caps, 3), year)
        {
            if NaiveDate::from_ymd_opt(year, month, day).is_some() {
                found.push(CalendarMention {
                    start: whole.start(),
                    end: whole.end(),
                    month,
                    day,
                    year: Some(year),
                });
            }
        }
    }

    found.sort_by_key(|mention| (mention.start, std::cmp::Reverse(mention.end)));
    let mut kept: Vec<CalendarMention> = Vec::with_capacity(found.len());
    for mention in found {
        if kept.last().map_or(true, |last| mention.start >= last.end) {
            kept.push(mention);
        }
    }
    kept
}

fn to_mention(
    caps: &Captures<'_>,
    month: Option<u32>,
    day: Option<u32>,
    year_group: usize,
) -> Option<CalendarMention> {
    let whole = caps.get(0)?;
    let (month, day) = (month?, day?);
    let year = match caps.get(year_group) {
        Some(m) => Some(expand_year(m.as_str())?),
        None => None,
    };
    // 2000 is a leap year, so Feb 29 survives the yearless check.
    NaiveDate::from_ymd_opt(year.unwrap_or(2000), month, day)?;
    Some(CalendarMention {
        start: whole.start(),
        end: whole.end(),
        month,
        day,
        year,
    })
}

fn month_number(caps: &Captures<'_>, group: usize) -> Option<u32> {
    let name = caps.get(group)?.as_str().to_lowercase();
    let prefix = name.get(..3)?;
    let month = match prefix {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

fn parse_u32(caps: &Captures<'_>, group: usize) -> Option<u32> {
    caps.get(group)?.as_str().parse().ok()
}

fn expand_year(raw: &str) -> Option<i32> {
    let year: i32 = raw.parse().ok()?;
    Some(if raw.len() == 2 { 2000 + year } else { year })
}

fn first_number(re: &Regex, text: &str) -> Option<i64> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| parse_int(m.as_str()))
}

pub fn is_immediate_intent(text: &str) -> bool {
    IMMEDIATE_RE.is_match(text)
}

pub fn is_physical_action(text: &str) -> bool {
    PHYSICAL_RE.is_match(text)
}

pub fn mentions_should(text: &str) -> bool {
    SHOULD_RE.is_match(text)
}

/// Task words present anywhere in the phrase (`task|todo|reminder|need to`).
pub fn has_task_intent(text: &str) -> bool {
    TASK_INTENT_RE.is_match(text)
}

/// Task-only phrasing ("make that a task") whose `title_prefix` names no activity.
pub fn has_task_only_intent(text: &str, title_prefix: &str) -> bool {
    TASK_ONLY_RE.is_match(text) && !ACTIVITY_NOUN_RE.is_match(title_prefix)
}

/// Explicit task/reminder language that overrides the garbage filter.
pub fn has_explicit_task_signal(text: &str) -> bool {
    EXPLICIT_TASK_SIGNAL_RE.is_match(text)
}

/// Phrases deferring work ("later", "tomorrow", "next") belong to the global list.
pub fn reads_as_deferred(text: &str) -> bool {
    GLOBAL_SCOPE_RE.is_match(text)
}

pub fn looks_imperative(phrase: &str) -> bool {
    IMPERATIVE_LEAD_RE.is_match(phrase) || IMPERATIVE_PHRASE_RE.is_match(phrase)
}

/// Extracts the activity named by "during my commute" / "while the meeting".
pub fn extract_embedded_parent_hint(text: &str) -> Option<String> {
    let caps = PARENT_HINT_RE.captures(text)?;
    let raw = caps.get(1)?.as_str();
    let cut = match PARENT_HINT_CUT_RE.find(raw) {
        Some(m) => &raw[..m.start()],
        None => raw,
    };
    let normalized = normalize_title(cut);
    (!normalized.is_empty()).then_some(normalized)
}

/// Scores a mood statement on `0..=10`.
///
/// Tries `N/10`, then `mood|feeling N`, then the adjective table. Explicit
/// `#mood(...)`/`#mood:` tokens are left to the tracker extractor.
pub fn parse_mood(text: &str) -> Option<i64> {
    let t = text.to_lowercase();
    if MOOD_TRACKER_TOKEN_RE.is_match(&t) || is_filler_only(&t) {
        return None;
    }
    let numeric = MOOD_FRACTION_RE
        .captures(&t)
        .or_else(|| MOOD_DIRECT_RE.captures(&t))
        .and_then(|caps| caps.get(1))
        .and_then(|m| parse_int(m.as_str()));
    if let Some(score) = numeric {
        return Some(score.clamp(0, 10));
    }
    MOOD_ADJECTIVES
        .iter()
        .find(|(re, _)| re.is_match(&t))
        .map(|(_, score)| *score)
}

/// Removes a trailing "feeling ..." clause so the rest can be parsed on its own.
pub fn strip_mood_clause(text: &str) -> String {
    MOOD_CLAUSE_RE.replace(text, "").trim().to_string()
}

/// First USD amount in `$N`, `N dollars|bucks`, or `spend about N` form.
pub fn parse_money_usd(text: &str) -> Option<f64> {
    let t = text.to_lowercase();
    [&*MONEY_SYMBOL_RE, &*MONEY_WORD_RE, &*MONEY_SPEND_RE]
        .into_iter()
        .find_map(|re| {
            re.captures(&t)
                .and_then(|caps| caps.get(1))
                .and_then(|m| parse_finite(m.as_str()))
        })
}

/// Hour used to schedule a future task without an explicit time.
pub fn default_future_task_hour(text: &str) -> i64 {
    let t = text.to_lowercase();
    if MORNING_RE.is_match(&t) {
        9
    } else if AFTERNOON_RE.is_match(&t) {
        13
    } else if EVENING_RE.is_match(&t) {
        18
    } else {
        9
    }
}

/// Collapses whitespace, trims separator debris (`,;:-`) and strips up to
/// three leading speech fillers.
pub fn normalize_title(raw: &str) -> String {
    let mut title = trim_separators(&WHITESPACE_RE.replace_all(raw, " "));
    for _ in 0..3 {
        let next = trim_separators(&FILLER_PREFIX_RE.replace(&title, ""));
        if next == title {
            break;
        }
        title = next;
    }
    title
}

fn trim_separators(text: &str) -> String {
    text.trim_matches(|c: char| c.is_whitespace() || matches!(c, ',' | ';' | ':' | '-'))
        .to_string()
}

/// Drops "I'm gonna", "we are going to", "I need to" style prefixes.
pub fn strip_first_person_prefix(text: &str) -> String {
    let text = FIRST_PERSON_FUTURE_RE.replace(text, "");
    let text = PLURAL_FUTURE_RE.replace(&text, "");
    OBLIGATION_PREFIX_RE.replace(&text, "").trim().to_string()
}

fn is_filler_only(text: &str) -> bool {
    let mut words = text.split_whitespace().peekable();
    words.peek().is_some()
        && words.all(|word| {
            let word = word.trim_matches(|c: char| c == ',' || c == '.' || c == '!' || c == '?');
            FILLER_WORDS.contains(&word.to_lowercase().as_str())
        })
}

/// True when a title is too short, too long, or made only of filler words.
pub fn is_garbage_phrase(title: &str) -> bool {
    let normalized = normalize_title(title);
    let chars = normalized.chars().count();
    if chars < MIN_TITLE_CHARS || chars > MAX_TITLE_CHARS {
        return true;
    }
    let words = normalized.split_whitespace().count();
    if words > MAX_TITLE_WORDS || is_filler_only(&normalized) {
        return true;
    }
    FILLER_LEAD_RE.is_match(&normalized) && words <= 3
}
