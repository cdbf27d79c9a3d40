//! Natural-language capture interpreter.
//!
//! # Responsibility
//! - Turn one capture into `ParsedTask`/`ParsedEvent` records.
//! - Thread the carried time anchor through phrases so "meeting at 2, then
//!   call until 4" resolves the second clause against the first.
//!
//! # Invariants
//! - Pure function of `(raw_text, now_ms, config)`; no clock reads, no I/O.
//! - The phrase loop is a left fold; `CarryState` is the only cross-phrase state.
//! - Untimed phrases run `UNTIMED_HEURISTICS` in order; the first match wins.
//! - Explicit time or task language always overrides the garbage filter.
//! - Output is capped at `MAX_TASKS` tasks and `MAX_EVENTS` events, keeping
//!   the earliest phrases.

use crate::config::CaptureConfig;
use crate::model::capture::{
    EventKind, ParseNaturalResult, ParsedEvent, ParsedTask, TaskScope, TaskStatus,
};
use crate::nlp::entities::{
    extract_buy_list, extract_difficulty, extract_estimate_token, extract_importance,
    split_item_list, strip_inline_tokens,
};
use crate::nlp::intent::{
    default_future_task_hour, detect_day_offset, extract_embedded_parent_hint,
    has_explicit_task_signal, has_task_intent, has_task_only_intent, is_garbage_phrase,
    is_immediate_intent, is_physical_action, looks_imperative, looks_like_forgot,
    looks_like_past_tense, mentions_should, normalize_title, parse_money_usd, parse_mood,
    reads_as_deferred, strip_calendar_dates, strip_first_person_prefix, strip_mood_clause,
};
use crate::nlp::segment::segment;
use crate::nlp::time::{
    estimate_minutes, parse_duration_minutes, resolve_time_range, resolve_until, TimeRange,
};
use crate::nlp::tokens::{
    capitalize_first, format_clock, hours_to_minutes, remove_first_ignore_case, TimeAnchor,
    HOUR_MS, MINUTE_MS, MINUTES_PER_DAY,
};
use log::{debug, trace, warn};
use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum tasks returned by one call.
pub const MAX_TASKS: usize = 16;
/// Maximum events returned by one call.
pub const MAX_EVENTS: usize = 32;

const LOG_EVENT_MINUTES: i64 = 5;
const MIN_EVENT_MINUTES: i64 = 5;
const GROCERY_ESTIMATE_MINUTES: i64 = 45;
const CONTINUATION_WINDOW_MINUTES: i64 = 60;
const MAX_END_MINUTE: i64 = 36 * 60;

static AT_WORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bat\b|@").expect("valid at word regex"));
static TASK_REQUEST_TAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:make|set)\b.*\b(?:task|todo|reminder)\b.*$")
        .expect("valid task request regex")
});
static LEADING_FORGOT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^forgot\s+").expect("valid leading forgot regex"));
static TRANSPORT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:drive|drove|driving|commute|uber|lyft|bus|train|flight|airport)\b")
        .expect("valid transport regex")
});
static WORK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(?:work|shift)\b").expect("valid work regex"));
static CLINIC_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:clinic|patients|inpatient|rounds)\b").expect("valid clinic regex")
});
static CALL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:call|phone|ring)\b").expect("valid call regex"));
static BANK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:bank|loan|mortgage|finance)\b").expect("valid bank regex")
});
static MEAL_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(dinner|lunch|breakfast)\b").expect("valid meal prefix regex"));
static BODYWEIGHT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(\d{1,4})\s*(push[-\s]?ups?|sit[-\s]?ups?|squats?|pull[-\s]?ups?)\b")
        .expect("valid bodyweight regex")
});
static RPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\brpe\s*(\d{1,2})\b").expect("valid rpe regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));
static MEAL_KIND_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(breakfast|lunch|dinner|snack|meal)\b").expect("valid meal kind regex")
});
static EATING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:ate|eating|eat|having|have)\b\s+(.+)$").expect("valid eating regex")
});
static DRINKING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:drank|drink|drinking)\b\s+(.+)$").expect("valid drinking regex")
});
static PURCHASE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:bought|purchased|picked up|got)\b\s+(.+)$").expect("valid purchase regex")
});
static SEGMENT_DURATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d{1,2})(?:\.(\d))?\s*(?:h|hr|hrs|hour|hours)\s+")
        .expect("valid segment duration regex")
});
static SEGMENT_LABEL_CUT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i),|\s+(?:and|then)\b").expect("valid segment label cut regex")
});
static SEGMENT_WORK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)work|shift|clinic").expect("valid segment work regex"));

/// Time anchor state threaded from one phrase to the next.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CarryState {
    /// End minute of the most recent explicit interval.
    pub last_explicit_min: Option<i64>,
    pub last_explicit_start_min: Option<i64>,
    pub last_explicit_end_min: Option<i64>,
    /// Index into the task list of the last titled task.
    pub last_task_index: Option<usize>,
}

impl CarryState {
    /// Anchor used to disambiguate the next phrase's clock times.
    pub fn preferred_after(&self) -> Option<i64> {
        self.last_explicit_end_min.or(self.last_explicit_min)
    }

    /// Start inherited by a bare "until <t>" clause.
    ///
    /// Short intervals (one hour or less) are continued from their start,
    /// longer ones from their end.
    pub fn continuation_start(&self) -> Option<i64> {
        match (self.last_explicit_start_min, self.last_explicit_end_min) {
            (Some(start), Some(end)) if end - start <= CONTINUATION_WINDOW_MINUTES => Some(start),
            _ => self.preferred_after(),
        }
    }

    fn after_explicit(self, start_min: i64, end_min: i64) -> Self {
        Self {
            last_explicit_min: Some(end_min),
            last_explicit_start_min: Some(start_min),
            last_explicit_end_min: Some(end_min),
            ..self
        }
    }
}

/// Capture-wide facts shared by every phrase.
struct CaptureContext<'a> {
    text: &'a str,
    anchor: TimeAnchor,
    day_offset: i64,
    day_start: i64,
    /// Last millisecond of the anchored day.
    day_end: i64,
    capture_is_past: bool,
}

impl CaptureContext<'_> {
    /// Default instant for a past-tense observation without a clock time.
    fn default_past_at(&self, text: &str) -> i64 {
        if self.day_start == self.anchor.today_start() {
            return self.anchor.now_snapped_to_half_hour();
        }
        if text.to_lowercase().contains("last night") {
            return self.day_start + 21 * HOUR_MS;
        }
        self.day_start + 12 * HOUR_MS
    }

    fn default_at(&self, phrase: &Phrase<'_>) -> i64 {
        if phrase.is_past {
            self.default_past_at(&phrase.clean)
        } else {
            self.anchor.now_ms
        }
    }

    /// `default_at` clamped into the anchored day.
    fn default_start(&self, phrase: &Phrase<'_>) -> i64 {
        self.default_at(phrase).clamp(self.day_start, self.day_end)
    }

    /// Converts resolved minutes to instants, rolling stale times to tomorrow.
    fn instants(&self, start_min: i64, end_min: i64, is_past: bool) -> (i64, i64) {
        let start_offset = start_min.clamp(0, MINUTES_PER_DAY - 1) * MINUTE_MS;
        let end_offset = end_min.clamp(1, MAX_END_MINUTE) * MINUTE_MS;
        let stale = !is_past
            && self.day_offset == 0
            && self.day_start + start_offset < self.anchor.now_ms - HOUR_MS;
        let day_start = if stale {
            self.anchor.day_start(1)
        } else {
            self.day_start
        };
        (day_start + start_offset, day_start + end_offset)
    }
}

/// One segmented phrase with its classifications precomputed.
struct Phrase<'a> {
    raw: &'a str,
    /// Phrase without mood clause and inline tokens.
    clean: String,
    parent_hint: Option<String>,
    is_past: bool,
    is_forgot: bool,
    is_future_context: bool,
    immediate: bool,
    force_event: bool,
    duration: i64,
}

impl Phrase<'_> {
    /// Status of a task emitted next to a timed event; tense alone decides.
    fn timed_status(&self) -> TaskStatus {
        if self.is_past {
            TaskStatus::Done
        } else {
            TaskStatus::Todo
        }
    }

    /// Status of an untimed task; "forgot" keeps it open even in past tense.
    fn untimed_status(&self) -> TaskStatus {
        if self.is_forgot {
            TaskStatus::Todo
        } else {
            self.timed_status()
        }
    }

    fn scope(&self) -> TaskScope {
        if self.is_future_context || reads_as_deferred(self.raw) {
            TaskScope::Global
        } else {
            TaskScope::Inline
        }
    }

    fn event_kind(&self) -> EventKind {
        if self.parent_hint.is_some() {
            EventKind::Episode
        } else {
            EventKind::Event
        }
    }

    fn log_event(&self, title: String, at: i64, tag: &str) -> ParsedEvent {
        let mut event = ParsedEvent::new(
            title,
            at,
            at + LOG_EVENT_MINUTES * MINUTE_MS,
            EventKind::Log,
            self.raw,
        );
        event.tags = vec![tag.to_string()];
        event
    }
}

/// Records produced by one phrase.
#[derive(Debug, Default)]
struct Emission {
    tasks: Vec<ParsedTask>,
    events: Vec<ParsedEvent>,
    /// Index into `tasks` of the task later phrases may refer back to.
    primary_task: Option<usize>,
    /// New schedule for the carried task ("make that a task at 5").
    reschedule_last_task: Option<(i64, i64)>,
    /// Explicit interval that becomes the next carried anchor.
    explicit: Option<(i64, i64)>,
}

impl Emission {
    fn push_primary_task(&mut self, task: ParsedTask) {
        self.tasks.push(task);
        self.primary_task = Some(self.tasks.len() - 1);
    }
}

/// Fold accumulator.
#[derive(Debug, Default)]
struct Interpretation {
    tasks: Vec<ParsedTask>,
    events: Vec<ParsedEvent>,
    carry: CarryState,
}

impl Interpretation {
    fn absorb(mut self, emission: Emission) -> Self {
        if let (Some((start_at, end_at)), Some(index)) =
            (emission.reschedule_last_task, self.carry.last_task_index)
        {
            if let Some(task) = self.tasks.get(index) {
                let rescheduled = ParsedTask {
                    scheduled_at: Some(start_at),
                    due_at: Some(end_at),
                    ..task.clone()
                };
                self.tasks[index] = rescheduled;
            }
        }
        if let Some(local) = emission.primary_task {
            self.carry.last_task_index = Some(self.tasks.len() + local);
        }
        if let Some((start_min, end_min)) = emission.explicit {
            self.carry = self.carry.after_explicit(start_min, end_min);
        }
        self.tasks.extend(emission.tasks);
        self.events.extend(emission.events);
        self
    }
}

/// Ordered fallback for phrases without a resolved time.
struct Heuristic {
    name: &'static str,
    apply: fn(&CaptureContext<'_>, &Phrase<'_>) -> Option<Emission>,
}

const UNTIMED_HEURISTICS: &[Heuristic] = &[
    Heuristic {
        name: "bodyweight_sets",
        apply: bodyweight_sets,
    },
    Heuristic {
        name: "meal",
        apply: meal,
    },
    Heuristic {
        name: "hydration",
        apply: hydration,
    },
    Heuristic {
        name: "purchase",
        apply: purchase,
    },
    Heuristic {
        name: "duration_segments",
        apply: duration_segments,
    },
    Heuristic {
        name: "imperative_task",
        apply: imperative_task,
    },
    Heuristic {
        name: "generic_event",
        apply: generic_event,
    },
];

/// Parses a capture with the default configuration.
pub fn parse_capture_natural(raw_text: &str, now_ms: i64) -> ParseNaturalResult {
    parse_capture_natural_with_config(raw_text, now_ms, &CaptureConfig::default())
}

/// Parses a capture into tasks and events.
///
/// Returns an empty result for blank input, and for a `now_ms` or offset
/// that cannot anchor a local day (see `CaptureConfig::anchor`). Never
/// panics; phrases that match no heuristic simply emit nothing.
pub fn parse_capture_natural_with_config(
    raw_text: &str,
    now_ms: i64,
    config: &CaptureConfig,
) -> ParseNaturalResult {
    let text = raw_text.trim();
    if text.is_empty() {
        return ParseNaturalResult::default();
    }

    let anchor = match config.anchor(now_ms) {
        Ok(anchor) => anchor,
        Err(err) => {
            warn!("event=capture_parse module=nlp status=rejected error={err}");
            return ParseNaturalResult::default();
        }
    };
    let day_offset = detect_day_offset(text, &anchor);
    let ctx = CaptureContext {
        text,
        anchor,
        day_offset,
        day_start: anchor.day_start(day_offset),
        day_end: anchor.day_start(day_offset + 1) - 1,
        capture_is_past: looks_like_past_tense(text),
    };

    let phrases = segment(text);
    let interpretation = phrases
        .iter()
        .fold(Interpretation::default(), |acc, raw| {
            let emission = interpret_phrase(&ctx, &acc.carry, raw);
            acc.absorb(emission)
        });

    let Interpretation {
        mut tasks,
        mut events,
        ..
    } = interpretation;
    tasks.truncate(MAX_TASKS);
    events.truncate(MAX_EVENTS);

    debug!(
        "event=capture_parse module=nlp status=ok phrases={} tasks={} events={} day_offset={}",
        phrases.len(),
        tasks.len(),
        events.len(),
        day_offset
    );
    ParseNaturalResult { tasks, events }
}

fn interpret_phrase(ctx: &CaptureContext<'_>, carry: &CarryState, raw: &str) -> Emission {
    let mood = parse_mood(raw);
    let clean = strip_calendar_dates(&strip_inline_tokens(&strip_mood_clause(raw)));
    let is_past = ctx.capture_is_past || looks_like_past_tense(raw);

    let time = resolve_time_range(&clean, &ctx.anchor, carry.preferred_after()).or_else(|| {
        carry
            .continuation_start()
            .and_then(|base| resolve_until(&clean, &ctx.anchor, base))
    });

    let immediate = is_immediate_intent(raw);
    let phrase = Phrase {
        raw,
        parent_hint: extract_embedded_parent_hint(raw),
        is_past,
        is_forgot: looks_like_forgot(raw),
        is_future_context: ctx.day_offset > 0 && !is_past,
        immediate,
        force_event: is_physical_action(&clean) && (immediate || mentions_should(raw)),
        duration: parse_duration_minutes(&clean).unwrap_or_else(|| estimate_minutes(&clean)),
        clean,
    };

    let mut emission = Emission::default();
    if let Some(score) = mood {
        emission
            .events
            .push(mood_event(ctx, &phrase, score, time.as_ref()));
    }

    let lowered = phrase.clean.to_lowercase();
    let mood_only_prefix = mood.is_some() && matches!(lowered.as_str(), "i" | "i'm" | "im");
    if phrase.clean.is_empty() || mood_only_prefix {
        return emission;
    }

    let force_keep = time.is_some() || has_explicit_task_signal(raw);
    if is_garbage_phrase(&phrase.clean) && !force_keep {
        trace!("event=phrase_skipped module=nlp reason=garbage");
        return emission;
    }

    if let Some(time) = time {
        timed_phrase(ctx, &phrase, &time, &mut emission);
        return emission;
    }

    for heuristic in UNTIMED_HEURISTICS {
        if let Some(found) = (heuristic.apply)(ctx, &phrase) {
            trace!(
                "event=phrase_matched module=nlp heuristic={} tasks={} events={}",
                heuristic.name,
                found.tasks.len(),
                found.events.len()
            );
            emission.tasks.extend(found.tasks);
            emission.events.extend(found.events);
            emission.primary_task = found.primary_task;
            break;
        }
    }
    emission
}

fn mood_event(
    ctx: &CaptureContext<'_>,
    phrase: &Phrase<'_>,
    score: i64,
    time: Option<&TimeRange>,
) -> ParsedEvent {
    let at = match time {
        Some(range) => ctx.instants(range.start_min, range.start_min, phrase.is_past).0,
        None if phrase.is_past => ctx.default_past_at(phrase.raw),
        None => ctx.anchor.now_ms,
    };
    let mut event = phrase.log_event(format!("mood: {score}/10"), at, "#mood");
    event.explicit_time = time.is_some();
    event
}

/// Time-bearing phrase: an event, plus tasks when task language is present.
fn timed_phrase(
    ctx: &CaptureContext<'_>,
    phrase: &Phrase<'_>,
    time: &TimeRange,
    emission: &mut Emission,
) {
    let start_min = time.start_min;
    let end_min = if time.end_min == time.start_min {
        time.start_min + phrase.duration
    } else {
        time.end_min
    };

    let without_time = remove_first_ignore_case(&phrase.clean, &time.consumed);
    let title_prefix = AT_WORD_RE.replace(&without_time, "").trim().to_string();
    let (event_title, task_title) = pick_event_and_task(&title_prefix);
    let task_intent = has_task_intent(phrase.raw);
    let task_only = has_task_only_intent(phrase.raw, &title_prefix);

    let (start_at, end_at) = ctx.instants(start_min, end_min, phrase.is_past);
    let scope = phrase.scope();
    let status = phrase.timed_status();
    let mut created_task = false;

    if task_intent {
        let request = TASK_REQUEST_TAIL_RE.replace(&title_prefix, "");
        let title = normalize_title(&strip_first_person_prefix(request.trim()));
        if is_garbage_phrase(&title) {
            emission.reschedule_last_task = Some((start_at, end_at));
        } else {
            let estimate = estimate_minutes(&title);
            let mut task = ParsedTask {
                status: Some(status),
                estimate_minutes: Some(estimate),
                scheduled_at: Some(start_at),
                due_at: Some(end_at),
                scope: Some(scope),
                ..ParsedTask::todo(title)
            };
            apply_task_tokens(&mut task, phrase.raw);
            emission.push_primary_task(task);
        }
        created_task = true;
    }

    let buy_items = extract_buy_list(phrase.raw);
    if !buy_items.is_empty() {
        emission.tasks.push(ParsedTask {
            status: Some(status),
            estimate_minutes: Some(GROCERY_ESTIMATE_MINUTES),
            scheduled_at: Some(start_at),
            due_at: Some(end_at),
            tags: vec!["#shopping".to_string()],
            notes: Some(checklist(&buy_items, false)),
            scope: Some(scope),
            ..ParsedTask::todo("Buy groceries")
        });
        created_task = true;
    }

    if !task_only {
        let title = timed_event_title(&event_title, phrase.raw);
        let mut event = ParsedEvent::new(
            title,
            start_at,
            end_at.max(start_at + MIN_EVENT_MINUTES * MINUTE_MS),
            phrase.event_kind(),
            phrase.raw,
        );
        event.estimate_minutes = Some((end_at.max(start_at) - start_at) / MINUTE_MS);
        event.explicit_time = true;
        event.parent_hint = phrase.parent_hint.clone();
        emission.events.push(event);
    }
    emission.explicit = Some((start_min, end_min));

    if task_only || created_task {
        return;
    }
    if let Some(task_title) = task_title {
        let title = normalize_title(&strip_first_person_prefix(&task_title));
        if !is_garbage_phrase(&title) {
            let mut task = ParsedTask {
                status: Some(status),
                estimate_minutes: Some(estimate_minutes(&task_title)),
                scope: Some(scope),
                ..ParsedTask::todo(title)
            };
            apply_task_tokens(&mut task, phrase.raw);
            emission.push_primary_task(task);
        }
    }
}

/// Normalized event title, falling back to shorter or raw-derived titles.
fn timed_event_title(event_title: &str, raw: &str) -> String {
    let title = normalize_title(if event_title.is_empty() { "Event" } else { event_title });
    if !is_garbage_phrase(&title) {
        return title;
    }
    let shortened = normalize_title(&title.split_whitespace().take(8).collect::<Vec<_>>().join(" "));
    if !is_garbage_phrase(&shortened) {
        return shortened;
    }
    let (from_raw, _) = pick_event_and_task(raw);
    let fallback = normalize_title(if from_raw.is_empty() { "Event" } else { from_raw.as_str() });
    if is_garbage_phrase(&fallback) {
        "Event".to_string()
    } else {
        fallback
    }
}

/// Splits a timed phrase prefix into an event title and optional task title.
fn pick_event_and_task(prefix: &str) -> (String, Option<String>) {
    if let Some(meal) = extract_meal_event_title(prefix) {
        let rest = remove_first_ignore_case(prefix, &meal).trim().to_string();
        return (meal, (!rest.is_empty()).then_some(rest));
    }
    let t = prefix.to_lowercase();
    let bucket = [
        (&*TRANSPORT_RE, "Transport"),
        (&*WORK_RE, "Work"),
        (&*CLINIC_RE, "Clinic"),
        (&*CALL_RE, "Call"),
        (&*BANK_RE, "Bank"),
    ]
    .into_iter()
    .find(|(re, _)| re.is_match(&t))
    .map(|(_, title)| title.to_string());
    (bucket.unwrap_or_else(|| normalize_title(prefix)), None)
}

/// "pick up kids then dinner with Sam" -> "Dinner with Sam".
fn extract_meal_event_title(prefix: &str) -> Option<String> {
    let padded = format!(" {prefix}");
    let lowered = padded.to_ascii_lowercase();
    let index = [" dinner", " lunch", " breakfast"]
        .iter()
        .filter_map(|word| lowered.rfind(word))
        .max()?;
    let after = padded[index..].trim();
    let title = MEAL_PREFIX_RE
        .replace(after, |caps: &regex::Captures<'_>| capitalize_first(&caps[1]))
        .trim()
        .to_string();
    (!title.is_empty()).then_some(title)
}

fn apply_task_tokens(task: &mut ParsedTask, raw: &str) {
    if let Some(minutes) = extract_estimate_token(raw) {
        task.estimate_minutes = Some(minutes);
    }
    task.importance = extract_importance(raw);
    task.difficulty = extract_difficulty(raw);
}

fn checklist(items: &[String], checked: bool) -> String {
    let mark = if checked { "x" } else { " " };
    items
        .iter()
        .map(|item| format!("- [{mark}] {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn bullet_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("- {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// "20 pushups rpe 8" -> workout log (+ rpe log).
fn bodyweight_sets(ctx: &CaptureContext<'_>, phrase: &Phrase<'_>) -> Option<Emission> {
    let caps = BODYWEIGHT_RE.captures(&phrase.clean)?;
    let reps = caps.get(1)?.as_str();
    let movement = WHITESPACE_RE
        .replace_all(&caps.get(2)?.as_str().to_lowercase(), " ")
        .into_owned();
    let at = ctx.default_at(phrase);

    let mut emission = Emission::default();
    emission
        .events
        .push(phrase.log_event(format!("workout: {reps} {movement}"), at, "#workout"));
    if let Some(rpe) = RPE_RE.captures(&phrase.clean).and_then(|c| c.get(1)) {
        emission
            .events
            .push(phrase.log_event(format!("rpe: {}", rpe.as_str()), at, "#workout"));
    }
    Some(emission)
}

/// "ate eggs and toast" / "lunch" -> meal event with item notes.
fn meal(ctx: &CaptureContext<'_>, phrase: &Phrase<'_>) -> Option<Emission> {
    let kind = MEAL_KIND_RE
        .captures(&phrase.clean)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_lowercase());
    // "have to ..." is obligation, not eating.
    let eaten = EATING_RE
        .captures(&phrase.clean)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|rest| !rest.to_lowercase().starts_with("to "));
    let named_meal = kind.as_deref().filter(|kind| *kind != "meal");
    if named_meal.is_none() && eaten.is_none() {
        return None;
    }

    let title = normalize_title(&named_meal.map(capitalize_first).unwrap_or_else(|| "Meal".to_string()));
    if is_garbage_phrase(&title) {
        return Some(Emission::default());
    }
    let items = eaten.map(split_item_list).unwrap_or_default();
    let minutes = parse_duration_minutes(&phrase.clean).unwrap_or(30).max(15);
    let at = ctx.default_at(phrase);

    let mut event = ParsedEvent::new(title, at, at + minutes * MINUTE_MS, EventKind::Event, phrase.raw);
    event.tags = vec!["#food".to_string()];
    event.notes = (!items.is_empty()).then(|| bullet_list(&items));
    event.estimate_minutes = Some(minutes);
    Some(Emission {
        events: vec![event],
        ..Emission::default()
    })
}

/// "drank a glass of water" -> hydration log.
fn hydration(ctx: &CaptureContext<'_>, phrase: &Phrase<'_>) -> Option<Emission> {
    let item = DRINKING_RE.captures(&phrase.clean)?.get(1)?.as_str().trim().to_string();
    let at = ctx.default_at(phrase);
    Some(Emission {
        events: vec![phrase.log_event(format!("drink: {item}"), at, "#hydration")],
        ..Emission::default()
    })
}

/// "bought apples, bananas and pears" -> grocery event plus a done task.
fn purchase(ctx: &CaptureContext<'_>, phrase: &Phrase<'_>) -> Option<Emission> {
    let rest = PURCHASE_RE.captures(&phrase.clean)?.get(1)?.as_str();
    let items = split_item_list(rest);
    let at = ctx.default_at(phrase);

    let mut event = ParsedEvent::new(
        "Grocery run",
        at,
        at + phrase.duration * MINUTE_MS,
        EventKind::Event,
        phrase.raw,
    );
    event.tags = vec!["#shopping".to_string()];
    event.notes = Some(bullet_list(&items));

    let task = ParsedTask {
        status: Some(TaskStatus::Done),
        notes: Some(checklist(&items, true)),
        estimate_minutes: Some(GROCERY_ESTIMATE_MINUTES),
        ..ParsedTask::todo("Buy groceries")
    };
    Some(Emission {
        tasks: vec![task],
        events: vec![event],
        ..Emission::default()
    })
}

/// "4 hours inpatient and 4 hours clinic" -> one event with a notes timeline.
fn duration_segments(ctx: &CaptureContext<'_>, phrase: &Phrase<'_>) -> Option<Emission> {
    let text = phrase.clean.as_str();
    let tokens: Vec<_> = SEGMENT_DURATION_RE.captures_iter(text).collect();
    if tokens.len() < 2 {
        return None;
    }

    let mut segments = Vec::with_capacity(tokens.len());
    for (index, caps) in tokens.iter().enumerate() {
        let (Some(whole), Some(token)) = (caps.get(1), caps.get(0)) else {
            continue;
        };
        let Some(minutes) = hours_to_minutes(whole.as_str(), caps.get(2).map(|m| m.as_str()))
        else {
            continue;
        };
        let label_end = tokens
            .get(index + 1)
            .and_then(|next| next.get(0))
            .map_or(text.len(), |next| next.start());
        let raw_label = &text[token.end()..label_end];
        let label = match SEGMENT_LABEL_CUT_RE.find(raw_label) {
            Some(cut) => &raw_label[..cut.start()],
            None => raw_label,
        }
        .trim();
        if !label.starts_with(|c: char| c.is_ascii_alphabetic()) {
            continue;
        }
        let label: String = label.chars().take(24).collect();
        segments.push((minutes.clamp(15, 12 * 60), label.trim().to_string()));
    }
    if segments.len() < 2 {
        return None;
    }

    let total: i64 = segments.iter().map(|(minutes, _)| minutes).sum();
    let start = ctx.default_start(phrase);
    let mut cursor = start;
    let mut timeline = Vec::with_capacity(segments.len());
    for (minutes, label) in &segments {
        timeline.push(format!("**{}** - {label}", format_clock(&ctx.anchor, cursor)));
        cursor += minutes * MINUTE_MS;
    }

    let title = if SEGMENT_WORK_RE.is_match(text) { "Work" } else { "Event" };
    let mut event = ParsedEvent::new(title, start, start + total * MINUTE_MS, EventKind::Event, phrase.raw);
    event.estimate_minutes = Some(total);
    event.notes = Some(timeline.join("\n"));
    Some(Emission {
        events: vec![event],
        ..Emission::default()
    })
}

/// Imperative, forgotten or future-day phrases become tasks.
fn imperative_task(ctx: &CaptureContext<'_>, phrase: &Phrase<'_>) -> Option<Emission> {
    let imperative = !phrase.force_event && looks_imperative(&phrase.clean);
    if !(imperative || phrase.is_forgot || phrase.is_future_context) {
        return None;
    }

    let without_forgot = LEADING_FORGOT_RE.replace(&phrase.clean, "");
    let title = normalize_title(&strip_first_person_prefix(without_forgot.trim()));
    if is_garbage_phrase(&title) {
        return Some(Emission::default());
    }

    let buy_items = extract_buy_list(&phrase.clean);
    let mut notes = Vec::new();
    if !buy_items.is_empty() {
        notes.push(checklist(&buy_items, false));
    }
    if let Some(budget) = parse_money_usd(&phrase.clean).or_else(|| parse_money_usd(ctx.text)) {
        notes.push(format!("Budget: ${budget}"));
    }

    let (scheduled_at, due_at) = if phrase.is_future_context {
        (
            Some(ctx.day_start + default_future_task_hour(&phrase.clean) * HOUR_MS),
            Some(ctx.day_end),
        )
    } else {
        (None, None)
    };

    let mut task = ParsedTask {
        status: Some(phrase.untimed_status()),
        estimate_minutes: Some(phrase.duration),
        scheduled_at,
        due_at,
        tags: if buy_items.is_empty() {
            Vec::new()
        } else {
            vec!["#shopping".to_string()]
        },
        notes: (!notes.is_empty()).then(|| notes.join("\n")),
        scope: Some(phrase.scope()),
        ..ParsedTask::todo(title)
    };
    apply_task_tokens(&mut task, phrase.raw);

    let mut emission = Emission::default();
    emission.push_primary_task(task);
    Some(emission)
}

/// Anything else is an event at the default time with an estimated duration.
fn generic_event(ctx: &CaptureContext<'_>, phrase: &Phrase<'_>) -> Option<Emission> {
    let title = normalize_title(&strip_first_person_prefix(&phrase.clean));
    if is_garbage_phrase(&title) {
        return Some(Emission::default());
    }

    let start = ctx.default_start(phrase);
    let mut event = ParsedEvent::new(
        title,
        start,
        start + phrase.duration * MINUTE_MS,
        phrase.event_kind(),
        phrase.raw,
    );
    event.estimate_minutes = Some(phrase.duration);
    event.parent_hint = phrase.parent_hint.clone();
    event.open_ended = phrase.force_event && phrase.immediate && !phrase.is_past;
    Some(Emission {
        events: vec![event],
        ..Emission::default()
    })
}

#[cfg(test)]
mod tests {
    use super::{extract_meal_event_title, pick_event_and_task, CarryState, Phrase};
    use crate::model::capture::TaskStatus;

    #[test]
    fn carry_prefers_short_interval_start_for_continuations() {
        let carry = CarryState::default().after_explicit(15 * 60, 15 * 60 + 15);
        assert_eq!(carry.preferred_after(), Some(15 * 60 + 15));
        assert_eq!(carry.continuation_start(), Some(15 * 60));

        let long = CarryState::default().after_explicit(9 * 60, 12 * 60);
        assert_eq!(long.continuation_start(), Some(12 * 60));
        assert_eq!(CarryState::default().continuation_start(), None);
    }

    #[test]
    fn meal_titles_and_keyword_buckets() {
        assert_eq!(
            extract_meal_event_title("pick up kids then dinner with Sam").as_deref(),
            Some("Dinner with Sam")
        );
        assert_eq!(extract_meal_event_title("meeting"), None);

        let (event, task) = pick_event_and_task("pick up kids then dinner with Sam");
        assert_eq!(event, "Dinner with Sam");
        assert_eq!(task.as_deref(), Some("pick up kids then"));

        assert_eq!(pick_event_and_task("Call Mom ,").0, "Call");
        assert_eq!(pick_event_and_task("drive to airport").0, "Transport");
        assert_eq!(pick_event_and_task("Meeting").0, "Meeting");
    }

    #[test]
    fn forgot_reopens_only_untimed_tasks() {
        let phrase = Phrase {
            raw: "forgot I already paid rent at 3",
            clean: "forgot I already paid rent at 3".to_string(),
            parent_hint: None,
            is_past: true,
            is_forgot: true,
            is_future_context: false,
            immediate: false,
            force_event: false,
            duration: 30,
        };
        assert_eq!(phrase.timed_status(), TaskStatus::Done);
        assert_eq!(phrase.untimed_status(), TaskStatus::Todo);

        let plain = Phrase {
            is_forgot: false,
            ..phrase
        };
        assert_eq!(plain.untimed_status(), TaskStatus::Done);
    }
}
