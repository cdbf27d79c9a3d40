//! Divider-delimited block parsing.
//!
//! # Responsibility
//! - Split a capture on markdown horizontal rules (`---`, `***`, `___`).
//! - Run the interpreter and entity extractors on each block in isolation.
//! - Enrich block events with locations/people and block tasks with tags.
//!
//! # Invariants
//! - No state crosses a block boundary.
//! - Block IDs are deterministic for identical `(index, now_ms, text)`.
//! - Flattened totals are capped at `MAX_TOTAL_TASKS` / `MAX_TOTAL_EVENTS`.

use crate::config::CaptureConfig;
use crate::model::capture::{ParseBlocksResult, ParsedBlock};
use crate::nlp::entities::{
    extract_contexts, extract_locations, extract_people, extract_tags, extract_trackers,
};
use crate::nlp::interpreter::parse_capture_natural_with_config;
use crate::nlp::tokens::push_unique;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;

/// Cap on flattened tasks across all blocks.
pub const MAX_TOTAL_TASKS: usize = 32;
/// Cap on flattened events across all blocks.
pub const MAX_TOTAL_EVENTS: usize = 64;

static DIVIDER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\t ]*(?:-{3,}|\*{3,}|_{3,})[\t ]*$").expect("valid divider regex")
});

/// Parses a capture block-by-block with the default configuration.
pub fn parse_capture_with_blocks(raw_text: &str, now_ms: i64) -> ParseBlocksResult {
    parse_capture_with_blocks_with_config(raw_text, now_ms, &CaptureConfig::default())
}

/// Parses each divider-delimited block independently.
///
/// Blank input yields an empty result.
pub fn parse_capture_with_blocks_with_config(
    raw_text: &str,
    now_ms: i64,
    config: &CaptureConfig,
) -> ParseBlocksResult {
    let text = raw_text.trim();
    if text.is_empty() {
        return ParseBlocksResult::default();
    }

    let blocks: Vec<ParsedBlock> = split_on_dividers(text)
        .into_iter()
        .enumerate()
        .map(|(index, block_text)| parse_block(index, block_text, now_ms, config))
        .collect();

    let tasks = blocks
        .iter()
        .flat_map(|block| block.tasks.iter().cloned())
        .take(MAX_TOTAL_TASKS)
        .collect::<Vec<_>>();
    let events = blocks
        .iter()
        .flat_map(|block| block.events.iter().cloned())
        .take(MAX_TOTAL_EVENTS)
        .collect::<Vec<_>>();

    debug!(
        "event=capture_blocks module=nlp status=ok blocks={} tasks={} events={}",
        blocks.len(),
        tasks.len(),
        events.len()
    );
    ParseBlocksResult {
        blocks,
        tasks,
        events,
    }
}

/// Splits on divider lines, trimming and dropping empty sections.
pub fn split_on_dividers(text: &str) -> Vec<String> {
    let mut sections = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in text.lines() {
        if DIVIDER_RE.is_match(line) {
            sections.push(current.join("\n"));
            current.clear();
        } else {
            current.push(line);
        }
    }
    sections.push(current.join("\n"));

    sections
        .into_iter()
        .map(|section| section.trim().to_string())
        .filter(|section| !section.is_empty())
        .collect()
}

fn parse_block(index: usize, text: String, now_ms: i64, config: &CaptureConfig) -> ParsedBlock {
    let parsed = parse_capture_natural_with_config(&text, now_ms, config);
    let trackers = extract_trackers(&text);
    let people = extract_people(&text);
    let tags = extract_tags(&text);
    let contexts = extract_contexts(&text);
    let locations = extract_locations(&text);

    let events = parsed
        .events
        .into_iter()
        .map(|mut event| {
            if event.location.is_none() {
                event.location = locations.first().cloned();
            }
            if event.people.is_empty() {
                event.people = people.clone();
            }
            event
        })
        .collect();

    let tasks = parsed
        .tasks
        .into_iter()
        .map(|mut task| {
            for tag in &tags {
                push_unique(&mut task.tags, tag.clone());
            }
            task
        })
        .collect();

    ParsedBlock {
        id: block_id(index, now_ms, &text),
        block_index: index,
        raw_text: text,
        tasks,
        events,
        trackers,
        people,
        tags,
        contexts,
        locations,
    }
}

fn block_id(index: usize, now_ms: i64, text: &str) -> String {
    let name = format!("{index}:{now_ms}:{text}");
    format!(
        "blk_{}",
        Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes()).simple()
    )
}
