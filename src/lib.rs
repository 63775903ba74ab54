//! Terminal companion that interrupts you to stand up and drink water. Two independent timers
//! fire modal reminders; confirming a reminder after a short countdown re-arms its timer.
//!

pub mod cli;
pub mod host;
pub mod i18n;
pub mod reminder;
pub mod settings;
pub mod status;
pub mod timer;
pub mod utils;
