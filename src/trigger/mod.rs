pub mod controller;
pub mod engine;
pub mod events;

pub use controller::{PresentationSink, TriggerController};
pub use engine::{evaluate, parse_hhmm};
pub use events::{Firing, FullScreenAlert, HapticPattern, PresentationSource, TickOutcome};
