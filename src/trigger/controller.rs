use std::sync::Arc;

use anyhow::{bail, Context, Result};
use log::{error, info, warn};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{self, Duration, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::audio::RingtoneEngine;
use crate::clock::Clock;
use crate::settings::SettingsStore;
use crate::store::Vault;

use super::engine;
use super::events::{FullScreenAlert, HapticPattern, PresentationSource};

/// Consumer of presentation-layer side effects. The trigger loop only emits
/// requests; rendering and vibration live with the host.
pub trait PresentationSink: Send + Sync {
    fn present(&self, alert: &FullScreenAlert);
    fn vibrate(&self, pattern: HapticPattern);
}

/// Drives the once-per-second evaluation loop over the vault's current
/// reminder and alarm collections.
pub struct TriggerController {
    vault: Vault,
    settings: Arc<SettingsStore>,
    audio: Arc<RingtoneEngine>,
    sink: Arc<dyn PresentationSink>,
    clock: Arc<dyn Clock>,
    ticker: Mutex<Option<JoinHandle<()>>>,
    cancel_token: Mutex<Option<CancellationToken>>,
}

impl TriggerController {
    pub fn new(
        vault: Vault,
        settings: Arc<SettingsStore>,
        audio: Arc<RingtoneEngine>,
        sink: Arc<dyn PresentationSink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            vault,
            settings,
            audio,
            sink,
            clock,
            ticker: Mutex::new(None),
            cancel_token: Mutex::new(None),
        }
    }

    /// Spawn the tick loop. Ticks are strictly sequential: each body runs to
    /// completion (including applying expiry deletions) before the next tick
    /// is awaited. There is no catch-up for time spent not running; a target
    /// minute that passes while the loop is down never fires.
    pub async fn start(&self) -> Result<()> {
        let mut ticker_guard = self.ticker.lock().await;
        if ticker_guard.is_some() {
            bail!("trigger loop already running");
        }

        let cancel_token = CancellationToken::new();
        let token = cancel_token.clone();

        let vault = self.vault.clone();
        let settings = Arc::clone(&self.settings);
        let audio = Arc::clone(&self.audio);
        let sink = Arc::clone(&self.sink);
        let clock = Arc::clone(&self.clock);

        let handle = tokio::spawn(async move {
            let mut interval = time::interval(Duration::from_secs(1));
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        if let Err(err) =
                            run_tick(&vault, &settings, &audio, sink.as_ref(), clock.as_ref()).await
                        {
                            error!("trigger tick failed: {err:?}");
                        }
                    }
                    _ = token.cancelled() => {
                        info!("trigger loop shutting down");
                        break;
                    }
                }
            }
        });

        *ticker_guard = Some(handle);
        *self.cancel_token.lock().await = Some(cancel_token);
        Ok(())
    }

    pub async fn stop(&self) -> Result<()> {
        if let Some(token) = self.cancel_token.lock().await.take() {
            token.cancel();
        }

        if let Some(handle) = self.ticker.lock().await.take() {
            handle.await.context("trigger loop task failed to join")?;
        }
        Ok(())
    }

    /// Handle a dismissal acknowledgment from the presentation layer. Always
    /// silences the ringtone; only a reminder-derived presentation toggles
    /// the underlying reminder complete.
    pub async fn dismiss(&self, source: &PresentationSource) -> Result<()> {
        if let Err(err) = self.audio.stop() {
            warn!("failed to stop ringtone on dismiss: {err}");
        }

        match source {
            PresentationSource::Reminder { id } => {
                self.vault.toggle_reminder(id).await.map(|_| ())
            }
            PresentationSource::Alarm { .. } => Ok(()),
        }
    }
}

async fn run_tick(
    vault: &Vault,
    settings: &SettingsStore,
    audio: &RingtoneEngine,
    sink: &dyn PresentationSink,
    clock: &dyn Clock,
) -> Result<()> {
    let now = clock.now();
    let reminders = vault.get_reminders().await?;
    let alarms = vault.get_alarms().await?;
    let current = settings.get();

    let outcome = engine::evaluate(now, &reminders, &alarms, &current);

    for firing in &outcome.firings {
        info!("firing {:?}", firing.source);
        if let Some(tone) = &firing.tone {
            // Fire-and-forget: a broken audio device must not stall the loop.
            if let Err(err) = audio.play_ringtone(tone) {
                warn!("failed to start ringtone {tone}: {err}");
            }
        }
        if let Some(pattern) = firing.haptic {
            sink.vibrate(pattern);
        }
        if let Some(alert) = &firing.alert {
            sink.present(alert);
        }
    }

    if !outcome.expired.is_empty() {
        vault
            .delete_reminders(&outcome.expired)
            .await
            .context("failed to apply expiry sweep")?;
        info!("auto-deleted {} completed reminder(s)", outcome.expired.len());
    }

    Ok(())
}
