use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone, Utc};
use remindr::trigger::{evaluate, HapticPattern, PresentationSource};
use remindr::{Alarm, AppSettings, AutoDelete, Priority, Reminder, SoundMode};

// 2026-03-17 is a Tuesday; the day-of-week pin below depends on that.
const YEAR: i32 = 2026;
const MONTH: u32 = 3;
const DAY: u32 = 17;

fn at(hour: u32, minute: u32, second: u32) -> DateTime<Local> {
    Local
        .with_ymd_and_hms(YEAR, MONTH, DAY, hour, minute, second)
        .unwrap()
}

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(YEAR, MONTH, DAY).unwrap()
}

fn reminder(id: &str, time: &str, date: Option<NaiveDate>) -> Reminder {
    Reminder {
        id: id.to_string(),
        title: format!("reminder {id}"),
        is_completed: false,
        date,
        time: Some(time.to_string()),
        tags: Vec::new(),
        priority: Priority::Normal,
        location: None,
        recurrence: None,
        created_at: Utc::now(),
    }
}

fn alarm(id: &str, time: &str) -> Alarm {
    Alarm {
        id: id.to_string(),
        time: time.to_string(),
        label: String::new(),
        is_enabled: true,
        days: vec![0, 1, 2, 3, 4, 5, 6],
        snooze_count: 0,
        ringtone: String::new(),
    }
}

#[test]
fn reminder_fires_once_per_minute_boundary() {
    let reminders = vec![reminder("r1", "07:00", Some(base_date()))];
    let settings = AppSettings::default();

    let boundary = evaluate(at(7, 0, 0), &reminders, &[], &settings);
    assert_eq!(boundary.firings.len(), 1);
    assert_eq!(
        boundary.firings[0].source,
        PresentationSource::Reminder { id: "r1".into() }
    );

    for second in [1, 30, 59] {
        let later = evaluate(at(7, 0, second), &reminders, &[], &settings);
        assert!(later.firings.is_empty(), "fired again at second {second}");
    }

    let wrong_minute = evaluate(at(7, 1, 0), &reminders, &[], &settings);
    assert!(wrong_minute.firings.is_empty());
}

#[test]
fn dated_reminder_is_bound_to_its_day() {
    let settings = AppSettings::default();
    let next_day = Local
        .with_ymd_and_hms(YEAR, MONTH, DAY + 1, 7, 0, 0)
        .unwrap();

    let dated = vec![reminder("r1", "07:00", Some(base_date()))];
    assert_eq!(evaluate(at(7, 0, 0), &dated, &[], &settings).firings.len(), 1);
    assert!(evaluate(next_day, &dated, &[], &settings).firings.is_empty());

    // Without a date the reminder repeats daily by omission.
    let undated = vec![reminder("r2", "07:00", None)];
    assert_eq!(evaluate(at(7, 0, 0), &undated, &[], &settings).firings.len(), 1);
    assert_eq!(evaluate(next_day, &undated, &[], &settings).firings.len(), 1);
}

#[test]
fn driving_mode_suppresses_non_critical_outright() {
    let mut settings = AppSettings::default();
    settings.driving_mode = true;

    let normal = vec![reminder("r1", "08:15", None)];
    let outcome = evaluate(at(8, 15, 0), &normal, &[], &settings);
    assert!(outcome.firings.is_empty());

    let mut critical = reminder("r2", "08:15", None);
    critical.priority = Priority::Critical;
    let outcome = evaluate(at(8, 15, 0), &[critical], &[], &settings);
    assert_eq!(outcome.firings.len(), 1);
    assert!(outcome.firings[0].tone.is_some());
}

#[test]
fn quiet_mode_drops_audio_and_haptics_but_not_presentation() {
    let mut settings = AppSettings::default();
    settings.sound_mode = SoundMode::Silent;
    settings.full_screen_alarm = true;

    let reminders = vec![reminder("r1", "09:30", None)];
    let outcome = evaluate(at(9, 30, 0), &reminders, &[], &settings);

    assert_eq!(outcome.firings.len(), 1);
    let firing = &outcome.firings[0];
    assert!(firing.tone.is_none());
    assert!(firing.haptic.is_none());
    let alert = firing.alert.as_ref().expect("full-screen alert");
    assert_eq!(alert.title, "reminder r1");
}

#[test]
fn firing_carries_configured_tone_and_heavy_buzz() {
    let mut settings = AppSettings::default();
    settings.reminder_sound = "chimes".into();
    settings.full_screen_alarm = false;

    let reminders = vec![reminder("r1", "09:30", None)];
    let outcome = evaluate(at(9, 30, 0), &reminders, &[], &settings);

    let firing = &outcome.firings[0];
    assert_eq!(firing.tone.as_deref(), Some("chimes"));
    assert_eq!(firing.haptic, Some(HapticPattern::Heavy));
    assert!(firing.alert.is_none());
}

#[test]
fn completed_and_date_only_reminders_never_fire() {
    let settings = AppSettings::default();

    let mut done = reminder("r1", "10:00", None);
    done.is_completed = true;

    let mut date_only = reminder("r2", "10:00", Some(base_date()));
    date_only.time = None;

    let outcome = evaluate(at(10, 0, 0), &[done, date_only], &[], &settings);
    assert!(outcome.firings.is_empty());
}

#[test]
fn malformed_time_is_a_non_match() {
    let settings = AppSettings::default();

    let mut broken = reminder("r1", "10:00", None);
    broken.time = Some("ten o'clock".into());
    let mut also_broken = reminder("r2", "10:00", None);
    also_broken.time = Some("10:xx".into());

    let bad_alarm = alarm("a1", "25;00");

    let outcome = evaluate(at(10, 0, 0), &[broken, also_broken], &[bad_alarm], &settings);
    assert!(outcome.firings.is_empty());
}

#[test]
fn alarm_fires_regardless_of_day_of_week() {
    // Documented quirk: `days` is stored but never consulted. This alarm is
    // Monday-only and the tick lands on a Tuesday; it still fires.
    let mut monday_only = alarm("a1", "06:30");
    monday_only.days = vec![1];

    let outcome = evaluate(at(6, 30, 0), &[], &[monday_only], &AppSettings::default());
    assert_eq!(outcome.firings.len(), 1);
}

#[test]
fn alarm_ignores_quiet_and_driving_modes() {
    let mut settings = AppSettings::default();
    settings.sound_mode = SoundMode::Silent;
    settings.driving_mode = true;
    settings.full_screen_alarm = false;

    let outcome = evaluate(at(6, 30, 0), &[], &[alarm("a1", "06:30")], &settings);

    assert_eq!(outcome.firings.len(), 1);
    let firing = &outcome.firings[0];
    // Empty stored ringtone falls back to the default tone.
    assert_eq!(firing.tone.as_deref(), Some("radar"));
    assert_eq!(firing.haptic, Some(HapticPattern::Sos));

    // Alarms always present as a critical pseudo-reminder, with the source
    // tagged so dismissal never toggles a reminder behind it.
    let alert = firing.alert.as_ref().expect("alarm alert");
    assert_eq!(alert.priority, Priority::Critical);
    assert_eq!(alert.title, "Alarm");
    assert_eq!(alert.source, PresentationSource::Alarm { id: "a1".into() });
}

#[test]
fn disabled_alarm_never_fires() {
    let mut off = alarm("a1", "06:30");
    off.is_enabled = false;

    let outcome = evaluate(at(6, 30, 0), &[], &[off], &AppSettings::default());
    assert!(outcome.firings.is_empty());
}

#[test]
fn alarm_label_and_ringtone_pass_through() {
    let mut wake = alarm("a1", "06:30");
    wake.label = "Wake up".into();
    wake.ringtone = "urgent".into();

    let outcome = evaluate(at(6, 30, 0), &[], &[wake], &AppSettings::default());
    let firing = &outcome.firings[0];
    assert_eq!(firing.tone.as_deref(), Some("urgent"));
    assert_eq!(firing.alert.as_ref().map(|a| a.title.as_str()), Some("Wake up"));
}

#[test]
fn expiry_window_is_anchored_to_created_at() {
    let now = at(7, 0, 30);

    let mut old = reminder("r1", "07:00", None);
    old.is_completed = true;
    old.created_at = now.with_timezone(&Utc) - Duration::hours(25);

    let mut settings = AppSettings::default();
    settings.auto_delete = AutoDelete::After24h;

    // Sweep runs on every tick, minute boundary or not.
    let outcome = evaluate(now, &[old.clone()], &[], &settings);
    assert_eq!(outcome.expired, vec!["r1".to_string()]);

    settings.auto_delete = AutoDelete::Never;
    let outcome = evaluate(now, &[old.clone()], &[], &settings);
    assert!(outcome.expired.is_empty());

    // Still pending items never expire, no matter how old.
    old.is_completed = false;
    settings.auto_delete = AutoDelete::After24h;
    let outcome = evaluate(now, &[old], &[], &settings);
    assert!(outcome.expired.is_empty());
}

#[test]
fn immediate_expiry_uses_a_sixty_second_window() {
    let now = at(12, 0, 15);
    let mut settings = AppSettings::default();
    settings.auto_delete = AutoDelete::Immediately;

    let mut fresh = reminder("r1", "12:00", None);
    fresh.is_completed = true;
    fresh.created_at = now.with_timezone(&Utc) - Duration::seconds(30);

    let mut stale = reminder("r2", "12:00", None);
    stale.is_completed = true;
    stale.created_at = now.with_timezone(&Utc) - Duration::seconds(61);

    let outcome = evaluate(now, &[fresh, stale], &[], &settings);
    assert_eq!(outcome.expired, vec!["r2".to_string()]);
}

#[test]
fn each_matching_item_fires_exactly_once() {
    let reminders = vec![
        reminder("r1", "07:00", None),
        reminder("r2", "07:00", Some(base_date())),
        reminder("r3", "08:00", None),
    ];
    let alarms = vec![alarm("a1", "07:00")];

    let outcome = evaluate(at(7, 0, 0), &reminders, &alarms, &AppSettings::default());
    assert_eq!(outcome.firings.len(), 3);
}
