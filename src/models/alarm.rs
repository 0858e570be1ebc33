use serde::{Deserialize, Serialize};
use uuid::Uuid;

const DAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Daily-repeating time trigger, independent of calendar date.
///
/// `days` (weekday indices, Sun = 0) is stored and rendered but is not
/// consulted by the firing check: an enabled alarm fires on every day whose
/// `HH:MM` matches. Known gap, kept until the intended behavior is settled.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alarm {
    pub id: String,
    /// Zero-padded `HH:MM` 24-hour string.
    pub time: String,
    pub label: String,
    pub is_enabled: bool,
    pub days: Vec<u8>,
    pub snooze_count: u32,
    pub ringtone: String,
}

impl Alarm {
    /// New enabled alarm repeating on all seven days, matching the defaults
    /// of the alarm creation form.
    pub fn new(time: impl Into<String>, label: impl Into<String>, ringtone: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            time: time.into(),
            label: label.into(),
            is_enabled: true,
            days: vec![0, 1, 2, 3, 4, 5, 6],
            snooze_count: 0,
            ringtone: ringtone.into(),
        }
    }

    pub fn repeat_label(&self) -> String {
        if self.days.len() == 7 {
            return "Every day".to_string();
        }
        let names: Vec<&str> = self
            .days
            .iter()
            .filter_map(|&day| DAY_NAMES.get(day as usize).copied())
            .collect();
        if names.is_empty() {
            "Once".to_string()
        } else {
            names.join(", ")
        }
    }
}
