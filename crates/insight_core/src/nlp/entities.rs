//! Inline token extractors for trackers, people, tags, contexts and locations.
//!
//! # Responsibility
//! - Pull typed entities out of one block of raw text.
//! - Strip inline token syntax from phrases before titles are built.
//! - Read per-task tokens (`~30m`, `importance 7`, `effort 4`) and item lists.
//!
//! # Invariants
//! - Extractors are independent of each other and of the interpreter.
//! - Entity names are lowercased and deduplicated in first-seen order.
//! - Trackers are deduplicated by key; the first matching pattern wins.

use crate::model::capture::TrackerToken;
use crate::nlp::tokens::{parse_finite, parse_int, push_unique};
use once_cell::sync::Lazy;
use regex::Regex;

const MAX_PEOPLE: usize = 20;
const MAX_TAGS: usize = 20;
const MAX_CONTEXTS: usize = 10;
const MAX_LOCATIONS: usize = 10;
const MAX_LIST_ITEMS: usize = 12;

static TRACKER_PAREN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"#([a-zA-Z][\w/-]*)\s*\(\s*([-+]?\d*\.?\d+)\s*\)").expect("valid tracker paren regex")
});
static TRACKER_COLON_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"#([a-zA-Z][\w/-]*)\s*:\s*([-+]?\d*\.?\d+)").expect("valid tracker colon regex")
});
static TRACKER_NATURAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(mood|energy|stress|pain|anxiety|focus|motivation|sleep|productivity)\b[^0-9]{0,12}(\d{1,2})(?:\s*/\s*10)?",
    )
    .expect("valid tracker natural regex")
});
static PERSON_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"@([a-zA-Z][\w-]*)").expect("valid person regex"));
static QUOTED_PERSON_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"@"([^"]+)""#).expect("valid quoted person regex"));
static TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|\s)#([a-zA-Z][\w/-]*)").expect("valid tag regex"));
static CONTEXT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|\s)\*([a-zA-Z][\w-]*)").expect("valid context regex"));
static PLUS_CONTEXT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|[\s(])\+([a-zA-Z][\w/-]*)").expect("valid plus context regex"));
static LOCATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|\s)!([a-zA-Z][\w-]*)").expect("valid location regex"));
static QUOTED_LOCATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"!"([^"]+)""#).expect("valid quoted location regex"));

static NOISE_TRACKER_PAREN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"#[a-zA-Z][\w/-]*\(([-+]?\d*\.?\d+)\)").expect("valid noise paren regex")
});
static NOISE_TRACKER_COLON_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"#[a-zA-Z][\w/-]*:[-+]?\d*\.?\d+").expect("valid noise colon regex")
});
static NOISE_MENTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|\s)[+@][\w/-]+").expect("valid noise mention regex"));
static NOISE_PRIORITY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|\s)[!^]\d{1,2}\b").expect("valid noise priority regex"));
static ESTIMATE_TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)~\s*(\d{1,3})\s*(h|hr|hrs|hour|hours|m|min|mins|minute|minutes)\b")
        .expect("valid estimate token regex")
});
static NOISE_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|\s)#[\w/-]+").expect("valid noise tag regex"));
static IMPORTANCE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bimportance\s*(?:=|:)?\s*(\d{1,2})\b").expect("valid importance regex")
});
static DIFFICULTY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:difficulty|effort)\s*(?:=|:)?\s*(\d{1,2})\b")
        .expect("valid difficulty regex")
});
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));
static BUY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:buy|get|pick up)\b\s+(.+)$").expect("valid buy regex"));
static BUY_CUT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:at|in|to|with|for|tomorrow|today|next|on)\b").expect("valid buy cut regex")
});
static LIST_SEPARATOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i),|\band\b").expect("valid list separator regex"));

/// Extracts trackers: `#key(value)`, then `#key:value`, then "mood is 7".
pub fn extract_trackers(text: &str) -> Vec<TrackerToken> {
    let mut trackers: Vec<TrackerToken> = Vec::new();
    let mut push = |key: &str, value: f64| {
        let key = key.to_lowercase();
        if !trackers.iter().any(|tracker| tracker.key == key) {
            trackers.push(TrackerToken { key, value });
        }
    };

    for caps in TRACKER_PAREN_RE.captures_iter(text) {
        if let (Some(key), Some(value)) = (caps.get(1), caps.get(2).and_then(|m| parse_finite(m.as_str()))) {
            push(key.as_str(), value);
        }
    }
    for caps in TRACKER_COLON_RE.captures_iter(text) {
        if let (Some(key), Some(value)) = (caps.get(1), caps.get(2).and_then(|m| parse_finite(m.as_str()))) {
            push(key.as_str(), value);
        }
    }
    for caps in TRACKER_NATURAL_RE.captures_iter(text) {
        if let (Some(key), Some(value)) = (caps.get(1), caps.get(2).and_then(|m| parse_int(m.as_str()))) {
            push(key.as_str(), value.clamp(0, 10) as f64);
        }
    }

    trackers
}

/// Extracts `@name` and `@"Quoted Name"` mentions.
pub fn extract_people(text: &str) -> Vec<String> {
    let mut people = Vec::new();
    for re in [&*PERSON_RE, &*QUOTED_PERSON_RE] {
        for caps in re.captures_iter(text) {
            if let Some(name) = caps.get(1) {
                push_unique(&mut people, name.as_str().to_lowercase());
            }
        }
    }
    people.truncate(MAX_PEOPLE);
    people
}

/// Extracts `#tag` tokens that are not tracker syntax (`#key(` / `#key:`).
pub fn extract_tags(text: &str) -> Vec<String> {
    let mut tags = Vec::new();
    for caps in TAG_RE.captures_iter(text) {
        let Some(tag) = caps.get(1) else {
            continue;
        };
        if matches!(text[tag.end()..].chars().next(), Some('(') | Some(':')) {
            continue;
        }
        push_unique(&mut tags, tag.as_str().to_lowercase());
    }
    tags.truncate(MAX_TAGS);
    tags
}

/// Extracts `*context` and `+context` tokens.
pub fn extract_contexts(text: &str) -> Vec<String> {
    let mut contexts = Vec::new();
    for re in [&*CONTEXT_RE, &*PLUS_CONTEXT_RE] {
        for caps in re.captures_iter(text) {
            if let Some(context) = caps.get(1) {
                push_unique(&mut contexts, context.as_str().to_lowercase());
            }
        }
    }
    contexts.truncate(MAX_CONTEXTS);
    contexts
}

/// Extracts `!location` and `!"Quoted Location"` tokens.
pub fn extract_locations(text: &str) -> Vec<String> {
    let mut locations = Vec::new();
    for re in [&*LOCATION_RE, &*QUOTED_LOCATION_RE] {
        for caps in re.captures_iter(text) {
            if let Some(location) = caps.get(1) {
                push_unique(&mut locations, location.as_str().to_lowercase());
            }
        }
    }
    locations.truncate(MAX_LOCATIONS);
    locations
}

/// Removes tracker, mention, priority, estimate, tag and task-score tokens.
pub fn strip_inline_tokens(text: &str) -> String {
    let mut out = NOISE_TRACKER_PAREN_RE.replace_all(text, " ").into_owned();
    for re in [
        &*NOISE_TRACKER_COLON_RE,
        &*NOISE_MENTION_RE,
        &*NOISE_PRIORITY_RE,
        &*ESTIMATE_TOKEN_RE,
        &*NOISE_TAG_RE,
        &*IMPORTANCE_RE,
        &*DIFFICULTY_RE,
    ] {
        out = re.replace_all(&out, " ").into_owned();
    }
    WHITESPACE_RE.replace_all(&out, " ").trim().to_string()
}

/// Reads a `~30m` / `~2h` estimate token as minutes.
pub fn extract_estimate_token(text: &str) -> Option<i64> {
    let caps = ESTIMATE_TOKEN_RE.captures(text)?;
    let amount = parse_int(caps.get(1)?.as_str())?;
    let unit = caps.get(2)?.as_str().to_lowercase();
    let minutes = if unit.starts_with('h') { amount * 60 } else { amount };
    (minutes > 0).then_some(minutes)
}

/// Reads `importance 7` / `importance: 7`, clamped to `0..=10`.
pub fn extract_importance(text: &str) -> Option<i64> {
    score_token(&IMPORTANCE_RE, text)
}

/// Reads `difficulty 4` / `effort: 4`, clamped to `0..=10`.
pub fn extract_difficulty(text: &str) -> Option<i64> {
    score_token(&DIFFICULTY_RE, text)
}

fn score_token(re: &Regex, text: &str) -> Option<i64> {
    let caps = re.captures(text)?;
    parse_int(caps.get(1)?.as_str()).map(|value| value.clamp(0, 10))
}

/// Items after `buy|get|pick up`, cut before place/time words.
pub fn extract_buy_list(phrase: &str) -> Vec<String> {
    let Some(rest) = BUY_RE.captures(phrase).and_then(|caps| caps.get(1)) else {
        return Vec::new();
    };
    let rest = rest.as_str();
    let cut = match BUY_CUT_RE.find(rest) {
        Some(m) => &rest[..m.start()],
        None => rest,
    };
    split_item_list(cut)
}

/// Splits "a, b and c" into trimmed items, at most twelve.
pub fn split_item_list(text: &str) -> Vec<String> {
    LIST_SEPARATOR_RE
        .split(text)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .take(MAX_LIST_ITEMS)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{
        extract_buy_list, extract_contexts, extract_difficulty, extract_estimate_token,
        extract_importance, extract_locations, extract_people, extract_tags, extract_trackers,
        split_item_list, strip_inline_tokens,
    };
    use crate::model::capture::TrackerToken;

    #[test]
    fn trackers_follow_pattern_priority() {
        let trackers = extract_trackers("#energy(8) #mood:6 mood is 3 stress 4/10");
        assert_eq!(
            trackers,
            vec![
                TrackerToken { key: "energy".to_string(), value: 8.0 },
                TrackerToken { key: "mood".to_string(), value: 6.0 },
                TrackerToken { key: "stress".to_string(), value: 4.0 },
            ]
        );
        assert!(extract_trackers("nothing numeric").is_empty());
    }

    #[test]
    fn tags_skip_tracker_syntax() {
        assert_eq!(
            extract_tags("#Work notes #energy(8) #mood:6 #work #deep-focus"),
            vec!["work".to_string(), "deep-focus".to_string()]
        );
    }

    #[test]
    fn people_contexts_locations() {
        assert_eq!(
            extract_people(r#"lunch with @Sam and @"Dr Lee" and @sam"#),
            vec!["sam".to_string(), "dr lee".to_string()]
        );
        assert_eq!(
            extract_contexts("*home chores +errands"),
            vec!["home".to_string(), "errands".to_string()]
        );
        assert_eq!(
            extract_locations(r#"meet !cafe then !"Main Library""#),
            vec!["cafe".to_string(), "main library".to_string()]
        );
    }

    #[test]
    fn strip_removes_inline_tokens() {
        assert_eq!(
            strip_inline_tokens("#energy(8) call @sam !2 ~30m about rent #home importance 7"),
            "call about rent"
        );
    }

    #[test]
    fn task_tokens() {
        assert_eq!(extract_estimate_token("write docs ~2h"), Some(120));
        assert_eq!(extract_estimate_token("write docs ~45 min"), Some(45));
        assert_eq!(extract_importance("importance: 12"), Some(10));
        assert_eq!(extract_difficulty("effort 4"), Some(4));
        assert_eq!(extract_difficulty("easy"), None);
    }

    #[test]
    fn item_lists() {
        assert_eq!(
            extract_buy_list("buy milk, eggs and bread at the store"),
            vec!["milk".to_string(), "eggs".to_string(), "bread".to_string()]
        );
        assert!(extract_buy_list("call mom").is_empty());
        assert_eq!(
            split_item_list("apples, bananas, and pears"),
            vec!["apples".to_string(), "bananas".to_string(), "pears".to_string()]
        );
    }
}
