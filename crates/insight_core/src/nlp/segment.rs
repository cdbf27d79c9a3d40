//! Splits a capture into ordered candidate phrases.
//!
//! # Responsibility
//! - Break text on line/sentence boundaries, standalone `then`/`also`
//!   conjunctions and first-person future pivots ("I'm gonna ...").
//!
//! # Invariants
//! - Phrase order follows the source text; later phrases may depend on it.
//! - Phrases are trimmed and non-empty.
//! - At most `MAX_PHRASES` phrases are produced.
//! - A `.` between two digits ("1.5 hours", "$4.50") is not a boundary.

use once_cell::sync::Lazy;
use regex::Regex;

/// Upper bound on phrases produced for one capture.
pub const MAX_PHRASES: usize = 48;

static CONJUNCTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\s+(?:and then|then|also)\s+").expect("valid conjunction regex")
});
static FUTURE_PIVOT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:i\s*'?m|im|i\s+am)?\s*(?:gonna|going\s+to)\b").expect("valid pivot regex")
});

/// Segments `text` into at most [`MAX_PHRASES`] ordered phrases.
pub fn segment(text: &str) -> Vec<String> {
    split_sentences(text)
        .into_iter()
        .flat_map(|sentence| {
            CONJUNCTION_RE
                .split(sentence)
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .flat_map(|part| split_on_future_pivots(&part))
        .map(|part| part.trim().to_string())
        .filter(|part| !part.is_empty())
        .take(MAX_PHRASES)
        .collect()
}

/// Splits on newlines, `;`, and `.` unless the dot sits between digits.
fn split_sentences(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut parts = Vec::new();
    let mut start = 0;
    for (index, byte) in bytes.iter().enumerate() {
        let boundary = match byte {
            b'\n' | b'\r' | b';' => true,
            b'.' => {
                let digit_before = index > 0 && bytes[index - 1].is_ascii_digit();
                let digit_after = bytes.get(index + 1).is_some_and(u8::is_ascii_digit);
                !(digit_before && digit_after)
            }
            _ => false,
        };
        if boundary {
            parts.push(&text[start..index]);
            start = index + 1;
        }
    }
    parts.push(&text[start..]);
    parts
}

/// Splits before every future pivot that is not at the start of `part`.
fn split_on_future_pivots(part: &str) -> Vec<String> {
    let trimmed = part.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    let starts: Vec<usize> = FUTURE_PIVOT_RE
        .find_iter(trimmed)
        .map(|m| m.start())
        .filter(|start| *start > 0)
        .collect();
    if starts.is_empty() {
        return vec![trimmed.to_string()];
    }

    let mut out = Vec::with_capacity(starts.len() + 1);
    let mut last = 0;
    for start in starts {
        let piece = trimmed[last..start].trim();
        if !piece.is_empty() {
            out.push(piece.to_string());
        }
        last = start;
    }
    let tail = trimmed[last..].trim();
    if !tail.is_empty() {
        out.push(tail.to_string());
    }
    out
}
