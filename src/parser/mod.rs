//! Natural-language reminder parsing.
//!
//! Turns free-form input like `"Buy milk tomorrow at 5pm #shopping !!!"` into
//! a structured result. Each rule extracts data and strips the matched text
//! from the evolving title, so later rules only ever see what is left.

pub mod highlight;

use chrono::{Days, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::{Priority, Recurrence};

pub use highlight::{highlight_spans, HighlightKind, HighlightSpan};

static URGENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)urgent").expect("valid urgency regex"));
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"#\w+").expect("valid tag regex"));
static TOMORROW_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)tomorrow").expect("valid tomorrow regex"));
static TODAY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)today").expect("valid today regex"));
static TIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bat\s+(\d{1,2})(?::(\d{2}))?\s*(am|pm)?").expect("valid time regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmartParseResult {
    pub clean_title: String,
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
    pub tags: Vec<String>,
    pub priority: Priority,
    pub recurrence: Option<Recurrence>,
}

/// Parse free-form reminder text into structured fields.
///
/// Pure and infallible: absent patterns leave the corresponding field at its
/// default, and the result for a fixed `text` and `today` never changes.
/// `today` anchors the relative-date keywords, so callers (and tests) control
/// "now" instead of the function reading the system clock.
///
/// `_known_tags` is accepted for parity with the input form, which passes its
/// tag vocabulary along; extraction accepts any `#word` regardless of
/// membership, and the vocabulary only matters for highlighting.
pub fn parse_smart_text(text: &str, _known_tags: &[String], today: NaiveDate) -> SmartParseResult {
    let mut clean_title = text.to_string();
    let mut date: Option<NaiveDate> = None;
    let mut time: Option<String> = None;
    let mut priority = Priority::Normal;
    let mut tags: Vec<String> = Vec::new();

    // Rule 1: urgency markers. Both the literal "!!!" and the word "urgent"
    // escalate priority; every occurrence of either is stripped.
    if clean_title.contains("!!!") || URGENT_RE.is_match(&clean_title) {
        priority = Priority::Critical;
        clean_title = clean_title.replace("!!!", "");
        clean_title = URGENT_RE.replace_all(&clean_title, "").into_owned();
    }

    // Rule 2: hashtags. Lowercased without the '#'; duplicates are kept and
    // left for consumers treating tags as a set to collapse.
    let found: Vec<String> = TAG_RE
        .find_iter(&clean_title)
        .map(|m| m.as_str()[1..].to_lowercase())
        .collect();
    if !found.is_empty() {
        clean_title = TAG_RE.replace_all(&clean_title, "").into_owned();
        tags = found;
    }

    // Rule 3: relative dates. "tomorrow" wins over "today" by check order.
    // "tonight", "after work", "every day", "weekly" are highlight-only
    // vocabulary (see highlight.rs) and deliberately extract nothing.
    if TOMORROW_RE.is_match(&clean_title) {
        date = Some(today.checked_add_days(Days::new(1)).unwrap_or(today));
        clean_title = TOMORROW_RE.replace_all(&clean_title, "").into_owned();
    } else if TODAY_RE.is_match(&clean_title) {
        date = Some(today);
        clean_title = TODAY_RE.replace_all(&clean_title, "").into_owned();
    }

    // Rule 4: explicit time ("at 5", "at 5:30pm"). Without am/pm the hour is
    // a 24-hour literal, so "at 5" is 05:00.
    if let Some(caps) = TIME_RE.captures(&clean_title) {
        let mut hour: u32 = caps[1].parse().unwrap_or(0);
        let minute: u32 = caps
            .get(2)
            .map(|m| m.as_str().parse().unwrap_or(0))
            .unwrap_or(0);
        let meridiem = caps.get(3).map(|m| m.as_str().to_lowercase());

        match meridiem.as_deref() {
            Some("pm") if hour < 12 => hour += 12,
            Some("am") if hour == 12 => hour = 0,
            _ => {}
        }

        time = Some(format!("{:02}:{:02}", hour, minute));

        let matched = caps.get(0).map(|m| m.range()).unwrap_or(0..0);
        clean_title.replace_range(matched, "");

        // A bare time phrase always anchors to the current day.
        if date.is_none() {
            date = Some(today);
        }
    }

    // Rule 5: title finalization. Stripped tokens leave gaps; collapse them
    // and trim the edges.
    let clean_title = WHITESPACE_RE
        .replace_all(&clean_title, " ")
        .trim()
        .to_string();

    SmartParseResult {
        clean_title,
        date,
        time,
        tags,
        priority,
        // No extraction rule exists for recurrence; the field stays empty by
        // contract rather than by accident.
        recurrence: None,
    }
}
