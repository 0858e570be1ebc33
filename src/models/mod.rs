pub mod alarm;
pub mod reminder;
pub mod tag;

pub use alarm::Alarm;
pub use reminder::{LocationTrigger, Priority, Recurrence, Reminder};
pub use tag::{initial_tags, Tag};
