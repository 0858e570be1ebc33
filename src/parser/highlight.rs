//! Input-highlighting vocabulary.
//!
//! The input form colors a *superset* of what the parser extracts: words like
//! "tonight" or "weekly" light up while typing but produce no structured
//! fields. Keeping the two vocabularies separate is intentional; see
//! `parse_smart_text`.

use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;

static HIGHLIGHT_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"#\w+").expect("valid tag regex"));

// "!!!" sits outside the word-bounded group: '!' is not a word character, so
// a \b-wrapped alternative would never match it.
static KEYWORD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:tomorrow|tonight|today|after work|urgent|every day|weekly)\b|!!!")
        .expect("valid keyword regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightKind {
    /// Free-form `#word` token not found in the known vocabulary.
    Tag,
    /// `#word` token matching a known tag name.
    KnownTag,
    /// Urgency marker: "urgent" or "!!!".
    Urgency,
    /// Any other recognized keyword, including ones the parser never
    /// extracts ("tonight", "after work", "every day", "weekly").
    Keyword,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightSpan {
    /// Byte range into the input text.
    pub range: Range<usize>,
    pub kind: HighlightKind,
}

/// Compute highlight spans for raw input text. Spans are non-overlapping and
/// sorted ascending; tag tokens win over keywords they happen to contain.
pub fn highlight_spans(text: &str, known_tags: &[String]) -> Vec<HighlightSpan> {
    let mut spans: Vec<HighlightSpan> = Vec::new();

    for m in HIGHLIGHT_TAG_RE.find_iter(text) {
        let word = m.as_str()[1..].to_lowercase();
        let kind = if known_tags.iter().any(|t| t.eq_ignore_ascii_case(&word)) {
            HighlightKind::KnownTag
        } else {
            HighlightKind::Tag
        };
        spans.push(HighlightSpan { range: m.range(), kind });
    }

    for m in KEYWORD_RE.find_iter(text) {
        let overlaps_tag = spans
            .iter()
            .any(|s| m.start() < s.range.end && s.range.start < m.end());
        if overlaps_tag {
            continue;
        }
        let lower = m.as_str().to_lowercase();
        let kind = if lower.contains("urgent") || lower.contains("!!!") {
            HighlightKind::Urgency
        } else {
            HighlightKind::Keyword
        };
        spans.push(HighlightSpan { range: m.range(), kind });
    }

    spans.sort_by_key(|s| s.range.start);
    spans
}
