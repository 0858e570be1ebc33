use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, sync::RwLock};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SoundMode {
    Default,
    Silent,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AutoDelete {
    #[serde(rename = "never")]
    Never,
    #[serde(rename = "immediately")]
    Immediately,
    #[serde(rename = "24h")]
    After24h,
}

impl AutoDelete {
    /// Retention window for completed reminders, measured from `created_at`.
    /// `None` disables the expiry sweep entirely.
    pub fn retention_ms(&self) -> Option<i64> {
        match self {
            AutoDelete::Never => None,
            AutoDelete::Immediately => Some(60_000),
            AutoDelete::After24h => Some(86_400_000),
        }
    }
}

/// Subset of the application settings the trigger engine reads each tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    pub sound_mode: SoundMode,
    pub driving_mode: bool,
    pub full_screen_alarm: bool,
    pub auto_delete: AutoDelete,
    /// Tone id played when a reminder fires.
    pub reminder_sound: String,
    /// Minutes; 0 means snooze is off. Not consulted by the engine.
    pub default_snooze_min: u32,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            sound_mode: SoundMode::Default,
            driving_mode: false,
            full_screen_alarm: false,
            auto_delete: AutoDelete::Never,
            reminder_sound: "radar".into(),
            default_snooze_min: 0,
        }
    }
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<AppSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_default()
        } else {
            AppSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn get(&self) -> AppSettings {
        self.data.read().unwrap().clone()
    }

    pub fn update(&self, apply: impl FnOnce(&mut AppSettings)) -> Result<()> {
        let mut guard = self.data.write().unwrap();
        apply(&mut guard);
        self.persist(&guard)
    }

    pub fn reload(&self) -> Result<()> {
        let contents = fs::read_to_string(&self.path)?;
        let data: AppSettings = serde_json::from_str(&contents)?;
        let mut guard = self.data.write().unwrap();
        *guard = data;
        Ok(())
    }

    fn persist(&self, data: &AppSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}
