//! Ringtone synthesis.
//!
//! Each ringtone is a short looping melody of oscillator notes with a punchy
//! attack/decay envelope, rendered sample-by-sample as a rodio `Source`.

use rodio::Source;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use std::time::Duration;

const SAMPLE_RATE: u32 = 44_100;
/// Alarms loop every 1.5 seconds.
const LOOP_SECS: f32 = 1.5;
const ATTACK_SECS: f32 = 0.02;
const DECAY_FLOOR: f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

#[derive(Debug, Clone, Copy)]
pub struct Note {
    pub freq_hz: f32,
    pub offset_secs: f32,
    pub duration_secs: f32,
    pub waveform: Waveform,
    /// Exponential frequency sweep target over the note's duration.
    pub slide_to_hz: Option<f32>,
    pub volume: f32,
}

const fn note(freq_hz: f32, offset_secs: f32, duration_secs: f32, waveform: Waveform, volume: f32) -> Note {
    Note {
        freq_hz,
        offset_secs,
        duration_secs,
        waveform,
        slide_to_hz: None,
        volume,
    }
}

const fn slide(
    freq_hz: f32,
    offset_secs: f32,
    duration_secs: f32,
    waveform: Waveform,
    slide_to_hz: f32,
    volume: f32,
) -> Note {
    Note {
        freq_hz,
        offset_secs,
        duration_secs,
        waveform,
        slide_to_hz: Some(slide_to_hz),
        volume,
    }
}

pub struct Melody {
    pub id: &'static str,
    pub name: &'static str,
    pub category: &'static str,
    pub notes: &'static [Note],
}

/// The ringtone library. The first entry ("radar") is the fallback for
/// unknown tone ids.
pub static RINGTONES: &[Melody] = &[
    Melody {
        id: "radar",
        name: "Radar (Default)",
        category: "Classic",
        notes: &[
            note(1200.0, 0.0, 0.08, Waveform::Sawtooth, 0.8),
            note(1200.0, 0.13, 0.08, Waveform::Sawtooth, 0.8),
            note(1200.0, 0.26, 0.08, Waveform::Sawtooth, 0.8),
        ],
    },
    Melody {
        id: "classic_alarm",
        name: "Classic Alarm",
        category: "Loud",
        notes: &[
            note(880.0, 0.0, 0.2, Waveform::Square, 1.0),
            note(880.0, 0.4, 0.2, Waveform::Square, 1.0),
        ],
    },
    Melody {
        id: "cosmic",
        name: "Cosmic",
        category: "Sci-Fi",
        notes: &[
            slide(440.0, 0.0, 0.8, Waveform::Sine, 880.0, 0.7),
            slide(880.0, 0.5, 0.8, Waveform::Sine, 440.0, 0.7),
        ],
    },
    Melody {
        id: "circuit",
        name: "Circuit",
        category: "Sci-Fi",
        notes: &[
            note(440.0, 0.0, 0.1, Waveform::Square, 0.6),
            note(554.0, 0.1, 0.1, Waveform::Square, 0.6),
            note(659.0, 0.2, 0.1, Waveform::Square, 0.6),
            note(880.0, 0.3, 0.1, Waveform::Square, 0.6),
        ],
    },
    Melody {
        id: "chimes",
        name: "Morning Chimes",
        category: "Melodic",
        notes: &[
            note(523.0, 0.0, 1.0, Waveform::Triangle, 0.6),
            note(659.0, 0.2, 1.0, Waveform::Triangle, 0.6),
            note(784.0, 0.4, 1.0, Waveform::Triangle, 0.6),
            note(1046.0, 0.6, 1.5, Waveform::Triangle, 0.5),
        ],
    },
    Melody {
        id: "reflection",
        name: "Reflection",
        category: "Melodic",
        notes: &[
            note(587.0, 0.0, 0.3, Waveform::Sine, 0.6),
            note(659.0, 0.3, 0.3, Waveform::Sine, 0.6),
            note(784.0, 0.6, 0.8, Waveform::Sine, 0.5),
        ],
    },
    Melody {
        id: "urgent",
        name: "Nuclear Alert",
        category: "Loud",
        notes: &[
            slide(800.0, 0.0, 0.3, Waveform::Sawtooth, 1200.0, 1.0),
            slide(800.0, 0.3, 0.3, Waveform::Sawtooth, 1200.0, 1.0),
            slide(800.0, 0.6, 0.3, Waveform::Sawtooth, 1200.0, 1.0),
        ],
    },
];

pub fn find_melody(id: &str) -> &'static Melody {
    RINGTONES.iter().find(|m| m.id == id).unwrap_or(&RINGTONES[0])
}

fn envelope(volume: f32, duration_secs: f32, rel: f32) -> f32 {
    if rel < ATTACK_SECS {
        // Fast linear attack for a punchy onset.
        volume * (rel / ATTACK_SECS)
    } else {
        let span = (duration_secs - ATTACK_SECS).max(f32::EPSILON);
        volume * (DECAY_FLOOR / volume.max(DECAY_FLOOR)).powf((rel - ATTACK_SECS) / span)
    }
}

fn render_note(note: &Note, rel: f32) -> f32 {
    // Phase in cycles. For sweeps, integrate the exponential frequency ramp
    // analytically so the chirp is smooth.
    let cycles = match note.slide_to_hz {
        Some(target) if (target - note.freq_hz).abs() > f32::EPSILON => {
            let ratio = target / note.freq_hz;
            let d = note.duration_secs;
            note.freq_hz * d / ratio.ln() * (ratio.powf(rel / d) - 1.0)
        }
        _ => note.freq_hz * rel,
    };

    let x = 2.0 * PI * cycles;
    let wave = match note.waveform {
        Waveform::Sine => x.sin(),
        Waveform::Square => {
            if x.sin() >= 0.0 {
                1.0
            } else {
                -1.0
            }
        }
        Waveform::Sawtooth => 2.0 * (cycles - (cycles + 0.5).floor()),
        Waveform::Triangle => (2.0 / PI) * x.sin().asin(),
    };

    wave * envelope(note.volume, note.duration_secs, rel)
}

/// Infinite looping melody stream.
pub struct MelodySource {
    melody: &'static Melody,
    sample_rate: u32,
    num_sample: usize,
}

impl MelodySource {
    pub fn new(melody: &'static Melody) -> Self {
        Self {
            melody,
            sample_rate: SAMPLE_RATE,
            num_sample: 0,
        }
    }
}

impl Iterator for MelodySource {
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        self.num_sample = self.num_sample.wrapping_add(1);
        let t = (self.num_sample as f32 / self.sample_rate as f32) % LOOP_SECS;

        let mut sample = 0.0f32;
        for note in self.melody.notes {
            // Check the current cycle and the tail of the previous one, so
            // notes longer than the loop period keep ringing across the wrap.
            for cycle in 0..2u32 {
                let rel = t + cycle as f32 * LOOP_SECS - note.offset_secs;
                if rel >= 0.0 && rel < note.duration_secs {
                    sample += render_note(note, rel);
                }
            }
        }

        // Headroom: overlapping chime notes can sum past full scale.
        Some((sample * 0.4).clamp(-1.0, 1.0))
    }
}

impl Source for MelodySource {
    fn current_frame_len(&self) -> Option<usize> {
        None // Infinite stream
    }

    fn channels(&self) -> u16 {
        1
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        None // Loops until stopped
    }
}

/// Short one-shot UI feedback chimes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ToneKind {
    Success,
    Critical,
}

impl ToneKind {
    fn duration_secs(&self) -> f32 {
        match self {
            ToneKind::Success => 0.4,
            ToneKind::Critical => 0.2,
        }
    }
}

pub struct FeedbackTone {
    kind: ToneKind,
    sample_rate: u32,
    num_sample: usize,
}

impl FeedbackTone {
    pub fn new(kind: ToneKind) -> Self {
        Self {
            kind,
            sample_rate: SAMPLE_RATE,
            num_sample: 0,
        }
    }
}

impl Iterator for FeedbackTone {
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        self.num_sample = self.num_sample.wrapping_add(1);
        let t = self.num_sample as f32 / self.sample_rate as f32;
        let total = self.kind.duration_secs();
        if t >= total {
            return None;
        }

        let sample = match self.kind {
            ToneKind::Success => {
                // Rising sine, 523.25 Hz up an octave over the first 100 ms.
                let freq = 523.25 * 2.0f32.powf((t / 0.1).min(1.0));
                let gain = 0.1 * (DECAY_FLOOR / 0.1f32).powf(t / total);
                (2.0 * PI * freq * t).sin() * gain
            }
            ToneKind::Critical => {
                // Aggressive falling square, 880 Hz down to 440 Hz.
                let freq = 880.0 - 440.0 * (t / total);
                let gain = 0.3 * (DECAY_FLOOR / 0.3f32).powf(t / total);
                if (2.0 * PI * freq * t).sin() >= 0.0 {
                    gain
                } else {
                    -gain
                }
            }
        };

        Some(sample)
    }
}

impl Source for FeedbackTone {
    fn current_frame_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> u16 {
        1
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        Some(Duration::from_secs_f32(self.kind.duration_secs()))
    }
}
