//! Capture output model.
//!
//! # Responsibility
//! - Define `ParsedTask`, `ParsedEvent`, `TrackerToken` and `ParsedBlock`.
//! - Provide validation of model invariants for callers persisting results.
//!
//! # Invariants
//! - `ParsedEvent::end_at >= ParsedEvent::start_at`, enforced by `ParsedEvent::new`
//!   and checked again on deserialization.
//! - Titles are never empty once emitted by the interpreter.
//! - Tags, people and locations are lowercase strings.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Task lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Created but not started.
    #[default]
    Todo,
    /// Work is in progress.
    InProgress,
    /// Completed (past-tense captures).
    Done,
}

/// Which list a captured task belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskScope {
    /// Attached to the capture it came from.
    Inline,
    /// Deferred work ("later", "tomorrow") for the global task list.
    Global,
}

/// Calendar projection of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Scheduled or observed block of time.
    #[default]
    Event,
    Task,
    /// Instantaneous observation (mood, reps, drink).
    Log,
    /// Block nested inside a parent activity ("during my commute").
    Episode,
}

/// Task extracted from one phrase.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedTask {
    /// Normalized title (fillers stripped, trimmed).
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Markdown notes, e.g. a `- [ ] item` checklist.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub estimate_minutes: Option<i64>,
    /// Unix epoch milliseconds.
    #[serde(default)]
    pub scheduled_at: Option<i64>,
    /// Unix epoch milliseconds.
    #[serde(default)]
    pub due_at: Option<i64>,
    /// `0..=10` when an `importance N` token was present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub importance: Option<i64>,
    /// `0..=10` when a `difficulty N` / `effort N` token was present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<TaskScope>,
}

impl ParsedTask {
    /// Creates a `todo` task with the given title.
    pub fn todo(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            status: Some(TaskStatus::Todo),
            ..Self::default()
        }
    }

    /// Checks that the title is not blank.
    pub fn validate(&self) -> Result<(), CaptureValidationError> {
        if self.title.trim().is_empty() {
            return Err(CaptureValidationError::EmptyTitle);
        }
        Ok(())
    }
}

/// Event extracted from one phrase.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawParsedEvent")]
pub struct ParsedEvent {
    pub title: String,
    /// Unix epoch milliseconds.
    pub start_at: i64,
    /// Unix epoch milliseconds, `>= start_at`.
    pub end_at: i64,
    pub kind: EventKind,
    /// True iff a clock time or range was resolved from the phrase.
    pub explicit_time: bool,
    /// Raw phrase the event was built from.
    pub source_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_hint: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub open_ended: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimate_minutes: Option<i64>,
    /// First `!location` of the enclosing block.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// `@people` of the enclosing block.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub people: Vec<String>,
}

impl ParsedEvent {
    /// Creates an event, pulling `end_at` up to `start_at` when reversed.
    pub fn new(
        title: impl Into<String>,
        start_at: i64,
        end_at: i64,
        kind: EventKind,
        source_text: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            start_at,
            end_at: end_at.max(start_at),
            kind,
            source_text: source_text.into(),
            ..Self::default()
        }
    }

    /// Duration in whole minutes.
    pub fn duration_minutes(&self) -> i64 {
        (self.end_at - self.start_at) / 60_000
    }

    /// Checks title and interval invariants.
    pub fn validate(&self) -> Result<(), CaptureValidationError> {
        if self.title.trim().is_empty() {
            return Err(CaptureValidationError::EmptyTitle);
        }
        if self.end_at < self.start_at {
            return Err(CaptureValidationError::InvalidEventWindow {
                start: self.start_at,
                end: self.end_at,
            });
        }
        Ok(())
    }
}

/// Deserialization mirror of `ParsedEvent`, validated on conversion.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawParsedEvent {
    title: String,
    start_at: i64,
    end_at: i64,
    #[serde(default)]
    kind: EventKind,
    #[serde(default)]
    explicit_time: bool,
    #[serde(default)]
    source_text: String,
    #[serde(default)]
    parent_hint: Option<String>,
    #[serde(default)]
    open_ended: bool,
    #[serde(default)]
    notes: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    estimate_minutes: Option<i64>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    people: Vec<String>,
}

impl TryFrom<RawParsedEvent> for ParsedEvent {
    type Error = CaptureValidationError;

    fn try_from(raw: RawParsedEvent) -> Result<Self, Self::Error> {
        let event = Self {
            title: raw.title,
            start_at: raw.start_at,
            end_at: raw.end_at,
            kind: raw.kind,
            explicit_time: raw.explicit_time,
            source_text: raw.source_text,
            parent_hint: raw.parent_hint,
            open_ended: raw.open_ended,
            notes: raw.notes,
            tags: raw.tags,
            estimate_minutes: raw.estimate_minutes,
            location: raw.location,
            people: raw.people,
        };
        event.validate()?;
        Ok(event)
    }
}

/// Numeric tracker value scoped to one block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerToken {
    /// Lowercase tracker key, e.g. `mood`.
    pub key: String,
    pub value: f64,
}

/// One divider-delimited section of a capture, parsed in isolation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedBlock {
    /// Opaque identifier; stable for identical input and `now_ms`.
    pub id: String,
    pub block_index: usize,
    pub raw_text: String,
    pub tasks: Vec<ParsedTask>,
    pub events: Vec<ParsedEvent>,
    pub trackers: Vec<TrackerToken>,
    pub people: Vec<String>,
    pub tags: Vec<String>,
    pub contexts: Vec<String>,
    pub locations: Vec<String>,
}

/// Tasks and events from `parse_capture_natural`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParseNaturalResult {
    pub tasks: Vec<ParsedTask>,
    pub events: Vec<ParsedEvent>,
}

impl ParseNaturalResult {
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty() && self.events.is_empty()
    }

    /// Validates every emitted task and event.
    pub fn validate(&self) -> Result<(), CaptureValidationError> {
        self.tasks.iter().try_for_each(ParsedTask::validate)?;
        self.events.iter().try_for_each(ParsedEvent::validate)
    }

    /// Drops events whose `source_text` a specialized extractor already claimed.
    ///
    /// Tasks carry no source phrase and are kept.
    pub fn without_claimed<S: AsRef<str>>(mut self, claimed: &[S]) -> Self {
        self.events.retain(|event| {
            !claimed
                .iter()
                .any(|phrase| phrase.as_ref().trim() == event.source_text.trim())
        });
        self
    }
}

/// Per-block results plus flattened task/event lists.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParseBlocksResult {
    pub blocks: Vec<ParsedBlock>,
    pub tasks: Vec<ParsedTask>,
    pub events: Vec<ParsedEvent>,
}

/// Model invariant violations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureValidationError {
    /// Title is empty or whitespace only.
    EmptyTitle,
    /// `end_at` precedes `start_at`.
    InvalidEventWindow { start: i64, end: i64 },
}

impl Display for CaptureValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::InvalidEventWindow { start, end } => {
                write!(f, "endAt ({end}) must be >= startAt ({start})")
            }
        }
    }
}

impl Error for CaptureValidationError {}

#[cfg(test)]
mod tests {
    use super::{CaptureValidationError, EventKind, ParseNaturalResult, ParsedEvent, ParsedTask};

    #[test]
    fn new_event_never_reverses_window() {
        let event = ParsedEvent::new("Call", 2_000, 1_000, EventKind::Event, "call");
        assert_eq!(event.end_at, 2_000);
        assert!(event.validate().is_ok());
    }

    #[test]
    fn validate_rejects_blank_titles_and_reversed_windows() {
        let mut event = ParsedEvent::new("Call", 1_000, 2_000, EventKind::Event, "call");
        event.end_at = 500;
        assert_eq!(
            event.validate(),
            Err(CaptureValidationError::InvalidEventWindow { start: 1_000, end: 500 })
        );
        assert_eq!(
            ParsedTask::todo("  ").validate(),
            Err(CaptureValidationError::EmptyTitle)
        );
    }

    #[test]
    fn without_claimed_drops_matching_sources() {
        let result = ParseNaturalResult {
            tasks: vec![ParsedTask::todo("Buy groceries")],
            events: vec![
                ParsedEvent::new("ran 3 miles", 0, 0, EventKind::Event, "ran 3 miles"),
                ParsedEvent::new("Call", 0, 0, EventKind::Event, "call mom"),
            ],
        };
        let filtered = result.without_claimed(&["ran 3 miles"]);
        assert_eq!(filtered.events.len(), 1);
        assert_eq!(filtered.events[0].title, "Call");
        assert_eq!(filtered.tasks.len(), 1);
    }
}
