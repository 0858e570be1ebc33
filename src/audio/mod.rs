pub mod melody;

use log::warn;
use melody::{find_melody, FeedbackTone, MelodySource};
use rodio::{OutputStream, Sink};
use std::sync::{
    mpsc::{self, Sender},
    Arc, Mutex,
};
use std::thread;

pub use melody::{Melody, ToneKind, RINGTONES};

enum AudioCommand {
    PlayRingtone(String),
    PlayTone(ToneKind),
    Stop,
    SetVolume(f32),
}

/// Handle to the playback collaborator. The trigger core only ever passes
/// tone identifiers through here; synthesis happens on a dedicated thread.
pub struct RingtoneEngine {
    tx: Arc<Mutex<Option<Sender<AudioCommand>>>>,
}

impl RingtoneEngine {
    pub fn new() -> Self {
        Self {
            tx: Arc::new(Mutex::new(None)),
        }
    }

    fn ensure_thread(&self) -> Result<Sender<AudioCommand>, String> {
        if let Some(tx) = self.tx.lock().map_err(|e| e.to_string())?.as_ref() {
            return Ok(tx.clone());
        }

        let (tx, rx) = mpsc::channel::<AudioCommand>();

        // Spawn dedicated audio thread holding non-Send audio objects
        thread::Builder::new()
            .name("audio-engine".to_string())
            .spawn(move || {
                let mut _stream: Option<OutputStream> = None;
                let mut sink: Option<Sink> = None;

                fn fresh_sink(
                    stream: &mut Option<OutputStream>,
                    sink: &mut Option<Sink>,
                ) -> Result<(), String> {
                    // Whatever is playing stops; a new tone always starts
                    // from the top.
                    if let Some(old) = sink.take() {
                        old.stop();
                    }
                    *stream = None;
                    let (s, handle) = OutputStream::try_default()
                        .map_err(|e| format!("Failed to create audio output stream: {}", e))?;
                    let new_sink = Sink::try_new(&handle)
                        .map_err(|e| format!("Failed to create audio sink: {}", e))?;
                    *stream = Some(s);
                    *sink = Some(new_sink);
                    Ok(())
                }

                while let Ok(cmd) = rx.recv() {
                    match cmd {
                        AudioCommand::PlayRingtone(tone_id) => {
                            match fresh_sink(&mut _stream, &mut sink) {
                                Ok(()) => {
                                    if let Some(ref s) = sink {
                                        s.append(MelodySource::new(find_melody(&tone_id)));
                                        s.play();
                                    }
                                }
                                Err(err) => warn!("ringtone {tone_id} not started: {err}"),
                            }
                        }
                        AudioCommand::PlayTone(kind) => {
                            match fresh_sink(&mut _stream, &mut sink) {
                                Ok(()) => {
                                    if let Some(ref s) = sink {
                                        s.append(FeedbackTone::new(kind));
                                        s.play();
                                    }
                                }
                                Err(err) => warn!("feedback tone not started: {err}"),
                            }
                        }
                        AudioCommand::Stop => {
                            if let Some(old) = sink.take() {
                                old.stop();
                            }
                            _stream = None;
                        }
                        AudioCommand::SetVolume(v) => {
                            if let Some(ref s) = sink {
                                s.set_volume(v.clamp(0.0, 1.0));
                            }
                        }
                    }
                }
            })
            .map_err(|e| e.to_string())?;

        let tx_clone = tx.clone();
        *self.tx.lock().map_err(|e| e.to_string())? = Some(tx);
        Ok(tx_clone)
    }

    /// Start (or replace) the looping ringtone for the given tone id.
    /// Unknown ids fall back to the default tone.
    pub fn play_ringtone(&self, tone_id: &str) -> Result<(), String> {
        let tx = self.ensure_thread()?;
        tx.send(AudioCommand::PlayRingtone(tone_id.to_string()))
            .map_err(|e| e.to_string())
    }

    /// One-shot UI feedback chime.
    pub fn play_tone(&self, kind: ToneKind) -> Result<(), String> {
        let tx = self.ensure_thread()?;
        tx.send(AudioCommand::PlayTone(kind)).map_err(|e| e.to_string())
    }

    pub fn set_volume(&self, volume: f32) -> Result<(), String> {
        let tx = self.ensure_thread()?;
        tx.send(AudioCommand::SetVolume(volume))
            .map_err(|e| e.to_string())
    }

    pub fn stop(&self) -> Result<(), String> {
        if let Ok(Some(tx)) = self.tx.lock().map(|g| g.clone()) {
            let _ = tx.send(AudioCommand::Stop);
        }
        Ok(())
    }
}

impl Default for RingtoneEngine {
    fn default() -> Self {
        Self::new()
    }
}
