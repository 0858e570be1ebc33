use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::parser::SmartParseResult;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Priority {
    Normal,
    High,
    Critical,
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Normal
    }
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Normal => "normal",
            Priority::High => "high",
            Priority::Critical => "critical",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Recurrence {
    Daily,
    Weekly,
    Monthly,
}

impl Recurrence {
    pub fn label(&self) -> &'static str {
        match self {
            Recurrence::Daily => "Every day",
            Recurrence::Weekly => "Every week",
            Recurrence::Monthly => "Every month",
        }
    }
}

/// Named place trigger attached to a reminder. Stored and surfaced to the
/// host application; never evaluated against device position in-core.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationTrigger {
    pub name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub radius_m: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub id: String,
    pub title: String,
    pub is_completed: bool,
    /// Calendar day the reminder is bound to. `None` means "no specific day":
    /// a timed reminder without a date fires every day at that time.
    pub date: Option<NaiveDate>,
    /// Target time of day as a zero-padded `HH:MM` 24-hour string. Date-only
    /// reminders leave this `None` and are never fired by the trigger loop.
    pub time: Option<String>,
    pub tags: Vec<String>,
    pub priority: Priority,
    pub location: Option<LocationTrigger>,
    /// Always `None` out of the parser; the field and its consumers are kept
    /// for reminders imported with a recurrence already set.
    pub recurrence: Option<Recurrence>,
    pub created_at: DateTime<Utc>,
}

impl Reminder {
    /// Build a reminder from a parse result, applying the creation-time rules
    /// of the input form: an empty parsed title falls back to the raw input
    /// text, and titles mentioning "home" get a named location trigger.
    pub fn from_parsed(parsed: SmartParseResult, raw_text: &str, now: DateTime<Utc>) -> Self {
        let title = if parsed.clean_title.is_empty() {
            raw_text.trim().to_string()
        } else {
            parsed.clean_title
        };

        let location = if title.to_lowercase().contains("home") {
            Some(LocationTrigger {
                name: "Home".to_string(),
                latitude: None,
                longitude: None,
                radius_m: Some(100),
            })
        } else {
            None
        };

        Self {
            id: Uuid::new_v4().to_string(),
            title,
            is_completed: false,
            date: parsed.date,
            time: parsed.time,
            tags: parsed.tags,
            priority: parsed.priority,
            location,
            recurrence: parsed.recurrence,
            created_at: now,
        }
    }

    pub fn repeat_label(&self) -> &'static str {
        match self.recurrence {
            Some(recurrence) => recurrence.label(),
            None => "Once",
        }
    }
}
