//! Reminder/alarm core: natural-language parsing plus the once-per-second
//! trigger engine. Storage, audio output, and presentation are collaborators
//! behind narrow interfaces; the core only reads snapshots and emits intents.

pub mod audio;
pub mod clock;
pub mod models;
pub mod parser;
pub mod settings;
pub mod store;
pub mod trigger;

pub use audio::{RingtoneEngine, ToneKind};
pub use clock::{Clock, SystemClock};
pub use models::{Alarm, Priority, Recurrence, Reminder, Tag};
pub use parser::{highlight_spans, parse_smart_text, SmartParseResult};
pub use settings::{AppSettings, AutoDelete, SettingsStore, SoundMode};
pub use store::Vault;
pub use trigger::{
    evaluate, Firing, FullScreenAlert, HapticPattern, PresentationSink, PresentationSource,
    TickOutcome, TriggerController,
};
