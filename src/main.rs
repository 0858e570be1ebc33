use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::{Local, Utc};
use log::{info, warn};

use remindr::trigger::{parse_hhmm, FullScreenAlert, HapticPattern, PresentationSink};
use remindr::{
    parse_smart_text, Alarm, Reminder, RingtoneEngine, SettingsStore, SoundMode, SystemClock,
    ToneKind, TriggerController, Vault,
};

/// Headless presentation collaborator: full-screen alerts and vibration
/// requests land in the log instead of a screen.
struct LogPresentationSink;

impl PresentationSink for LogPresentationSink {
    fn present(&self, alert: &FullScreenAlert) {
        info!(
            "FULL SCREEN [{}] {} ({:?})",
            alert.priority.as_str(),
            alert.title,
            alert.source
        );
    }

    fn vibrate(&self, pattern: HapticPattern) {
        info!("VIBRATE {:?} {:?}", pattern, pattern.pattern_ms());
    }
}

fn data_dir() -> PathBuf {
    std::env::var("REMINDR_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(".remindr"))
}

fn print_usage() {
    println!("remindr <command>");
    println!("  add <text...>                parse text and store a reminder");
    println!("  list                         show stored reminders");
    println!("  alarms                       show stored alarms");
    println!("  alarm-add <HH:MM> [label] [ringtone]");
    println!("  run                          start the trigger loop (Ctrl-C to stop)");
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first().map(String::as_str) else {
        print_usage();
        return Ok(());
    };

    let dir = data_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create data dir {}", dir.display()))?;
    let vault = Vault::new(dir.join("vault.sqlite3"))?;
    let settings = Arc::new(SettingsStore::new(dir.join("settings.json"))?);

    match command {
        "add" => {
            let text = args[1..].join(" ");
            if text.trim().is_empty() {
                bail!("nothing to add: pass the reminder text");
            }

            let known: Vec<String> = vault
                .get_tags()
                .await?
                .into_iter()
                .map(|t| t.name)
                .collect();
            let parsed = parse_smart_text(&text, &known, Local::now().date_naive());
            let reminder = Reminder::from_parsed(parsed, &text, Utc::now());

            println!("title:    {}", reminder.title);
            println!("date:     {}", reminder.date.map(|d| d.to_string()).unwrap_or_else(|| "-".into()));
            println!("time:     {}", reminder.time.as_deref().unwrap_or("-"));
            println!("tags:     {}", if reminder.tags.is_empty() { "-".into() } else { reminder.tags.join(", ") });
            println!("priority: {}", reminder.priority.as_str());

            vault.add_reminder(reminder).await?;

            if settings.get().sound_mode != SoundMode::Silent {
                let audio = RingtoneEngine::new();
                if let Err(err) = audio.play_tone(ToneKind::Success) {
                    warn!("success tone not played: {err}");
                }
                // Let the short chime finish before the process exits.
                tokio::time::sleep(std::time::Duration::from_millis(500)).await;
            }
        }
        "list" => {
            let reminders = vault.get_reminders().await?;
            if reminders.is_empty() {
                println!("no reminders");
            }
            for r in reminders {
                let tags = if r.tags.is_empty() {
                    "-".to_string()
                } else {
                    format!("#{}", r.tags.join(" #"))
                };
                println!(
                    "[{}] {}  {} {}  {}  {}  ({})",
                    if r.is_completed { "x" } else { " " },
                    r.title,
                    r.date.map(|d| d.to_string()).unwrap_or_else(|| "any day".into()),
                    r.time.as_deref().unwrap_or("--:--"),
                    tags,
                    r.priority.as_str(),
                    r.repeat_label(),
                );
            }
        }
        "alarms" => {
            let alarms = vault.get_alarms().await?;
            if alarms.is_empty() {
                println!("no alarms");
            }
            for a in alarms {
                println!(
                    "[{}] {}  {}  {}  ({})",
                    if a.is_enabled { "on " } else { "off" },
                    a.time,
                    if a.label.is_empty() { "Alarm" } else { a.label.as_str() },
                    a.ringtone,
                    a.repeat_label(),
                );
            }
        }
        "alarm-add" => {
            let Some(time) = args.get(1) else {
                bail!("alarm-add needs a HH:MM time");
            };
            if parse_hhmm(time).is_none() {
                bail!("'{time}' is not a valid HH:MM time");
            }
            let label = args.get(2).cloned().unwrap_or_default();
            let ringtone = args.get(3).cloned().unwrap_or_else(|| "radar".into());
            vault.add_alarm(Alarm::new(time.clone(), label, ringtone)).await?;
            println!("alarm set for {time}");
        }
        "run" => {
            info!("remindr trigger loop starting (data dir: {})", dir.display());

            let controller = TriggerController::new(
                vault,
                settings,
                Arc::new(RingtoneEngine::new()),
                Arc::new(LogPresentationSink),
                Arc::new(SystemClock),
            );

            controller.start().await?;
            tokio::signal::ctrl_c()
                .await
                .context("failed to listen for shutdown signal")?;
            controller.stop().await?;
        }
        _ => print_usage(),
    }

    Ok(())
}
