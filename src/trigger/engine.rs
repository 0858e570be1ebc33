//! Pure per-tick evaluation.
//!
//! `evaluate` reads a snapshot of the collections and settings and returns
//! intents; it never mutates anything and never fails. Idempotence over time
//! comes from the minute-boundary gate: with a once-per-second cadence the
//! match condition is true for exactly one tick per target minute.

use chrono::{DateTime, Local, Timelike};
use log::warn;

use crate::models::{Alarm, Priority, Reminder};
use crate::settings::{AppSettings, SoundMode};

use super::events::{Firing, FullScreenAlert, HapticPattern, PresentationSource, TickOutcome};

/// Fallback tone for alarms persisted without a ringtone id.
pub const DEFAULT_ALARM_TONE: &str = "radar";

/// Parse a `HH:MM` string into hour and minute. Malformed values are a
/// non-match for the trigger loop, never an error; range validation is
/// unnecessary because an out-of-range hour can never equal the clock's.
pub fn parse_hhmm(value: &str) -> Option<(u32, u32)> {
    let (hour, minute) = value.split_once(':')?;
    let hour: u32 = hour.trim().parse().ok()?;
    let minute: u32 = minute.trim().parse().ok()?;
    Some((hour, minute))
}

pub fn evaluate(
    now: DateTime<Local>,
    reminders: &[Reminder],
    alarms: &[Alarm],
    settings: &AppSettings,
) -> TickOutcome {
    let mut outcome = TickOutcome::default();

    if now.second() == 0 {
        check_reminders(now, reminders, settings, &mut outcome);
        check_alarms(now, alarms, &mut outcome);
    }

    // The expiry sweep is cheap and date-independent, so it runs every tick
    // rather than only at minute boundaries.
    if let Some(window_ms) = settings.auto_delete.retention_ms() {
        let now_ms = now.timestamp_millis();
        for reminder in reminders {
            // The window is anchored to created_at: completion time is not
            // tracked, so an item completed right after creation expires at
            // the same wall-clock moment as one completed near the boundary.
            if reminder.is_completed
                && now_ms - reminder.created_at.timestamp_millis() >= window_ms
            {
                outcome.expired.push(reminder.id.clone());
            }
        }
    }

    outcome
}

fn check_reminders(
    now: DateTime<Local>,
    reminders: &[Reminder],
    settings: &AppSettings,
    outcome: &mut TickOutcome,
) {
    let today = now.date_naive();

    for reminder in reminders {
        if reminder.is_completed {
            continue;
        }
        let Some(time) = reminder.time.as_deref() else {
            // Date-only reminders are never fired by this loop.
            continue;
        };
        let Some((hour, minute)) = parse_hhmm(time) else {
            warn!(
                "reminder {} has unparseable time {:?}; treating as non-match",
                reminder.id, time
            );
            continue;
        };
        if hour != now.hour() || minute != now.minute() {
            continue;
        }
        // A dated reminder fires only on its day; without a date it fires
        // every day at this time (implicit daily recurrence by omission).
        if let Some(date) = reminder.date {
            if date != today {
                continue;
            }
        }

        // Driving mode drops non-critical firings outright; a suppressed
        // firing is lost, not deferred.
        if settings.driving_mode && reminder.priority != Priority::Critical {
            continue;
        }

        let audible = settings.sound_mode != SoundMode::Silent;
        let source = PresentationSource::Reminder {
            id: reminder.id.clone(),
        };
        outcome.firings.push(Firing {
            source: source.clone(),
            tone: audible.then(|| settings.reminder_sound.clone()),
            haptic: audible.then_some(HapticPattern::Heavy),
            alert: settings.full_screen_alarm.then(|| FullScreenAlert {
                source,
                title: reminder.title.clone(),
                priority: reminder.priority,
            }),
        });
    }
}

fn check_alarms(now: DateTime<Local>, alarms: &[Alarm], outcome: &mut TickOutcome) {
    for alarm in alarms {
        if !alarm.is_enabled {
            continue;
        }
        let Some((hour, minute)) = parse_hhmm(&alarm.time) else {
            warn!(
                "alarm {} has unparseable time {:?}; treating as non-match",
                alarm.id, alarm.time
            );
            continue;
        };
        if hour != now.hour() || minute != now.minute() {
            continue;
        }
        // No calendar-date constraint, and `days` is not consulted: an
        // enabled alarm matches purely on time of day. Alarms also ignore
        // quiet mode and driving mode; they always sound.
        let tone = if alarm.ringtone.is_empty() {
            DEFAULT_ALARM_TONE.to_string()
        } else {
            alarm.ringtone.clone()
        };
        let title = if alarm.label.is_empty() {
            "Alarm".to_string()
        } else {
            alarm.label.clone()
        };
        let source = PresentationSource::Alarm {
            id: alarm.id.clone(),
        };
        outcome.firings.push(Firing {
            source: source.clone(),
            tone: Some(tone),
            haptic: Some(HapticPattern::Sos),
            // Alarms present as a critical pseudo-reminder.
            alert: Some(FullScreenAlert {
                source,
                title,
                priority: Priority::Critical,
            }),
        });
    }
}
