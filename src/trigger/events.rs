use serde::Serialize;

use crate::models::Priority;

/// Vibration request shapes, with the buzz timings the host feeds to the
/// platform vibrator (alternating on/off milliseconds).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum HapticPattern {
    Light,
    Heavy,
    Sos,
    Success,
    Error,
}

impl HapticPattern {
    pub fn pattern_ms(&self) -> &'static [u64] {
        match self {
            HapticPattern::Light => &[50],
            HapticPattern::Heavy => &[500, 200, 500],
            HapticPattern::Sos => &[
                100, 50, 100, 50, 100, 200, 500, 200, 500, 200, 500, 200, 100, 50, 100, 50, 100,
            ],
            HapticPattern::Success => &[50, 30, 50],
            HapticPattern::Error => &[200, 50, 200],
        }
    }
}

/// Origin of a full-screen presentation. A tagged variant instead of an id
/// prefix, so dismissal can branch without sniffing strings: dismissing an
/// alarm-derived presentation must not toggle any reminder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PresentationSource {
    Reminder { id: String },
    Alarm { id: String },
}

/// Request to show the full-screen alert UI for a fired item.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FullScreenAlert {
    pub source: PresentationSource,
    pub title: String,
    pub priority: Priority,
}

/// One fired reminder or alarm, carrying the side-effect requests the host
/// should dispatch. `tone` and `haptic` are `None` when quiet mode swallowed
/// them; `alert` is `None` when full-screen presentation is disabled.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Firing {
    pub source: PresentationSource,
    pub tone: Option<String>,
    pub haptic: Option<HapticPattern>,
    pub alert: Option<FullScreenAlert>,
}

/// Everything one evaluation tick decided: firings to dispatch and completed
/// reminders whose retention window has lapsed.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TickOutcome {
    pub firings: Vec<Firing>,
    pub expired: Vec<String>,
}
