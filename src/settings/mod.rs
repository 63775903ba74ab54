//! Product settings of the reminder. Settings live in a flat JSON object, the same way editor
//! settings files store them, with every key prefixed by the [NAMESPACE].
//!
//! Settings are never cached: every operation that needs them calls [SettingsSource::load] so
//! edits take effect on the next timer reset.

pub mod file;
pub mod watch;

use std::time::Duration;

use crate::timer::ReminderKind;

pub const NAMESPACE: &str = "healthReminder";

pub const SIT_INTERVAL_KEY: &str = "sitReminderInterval";
pub const DRINK_INTERVAL_KEY: &str = "drinkReminderInterval";
pub const ENABLE_SIT_KEY: &str = "enableSitReminder";
pub const ENABLE_DRINK_KEY: &str = "enableDrinkReminder";
pub const LANGUAGE_KEY: &str = "language";

pub const ALL_KEYS: [&str; 5] = [
    SIT_INTERVAL_KEY,
    DRINK_INTERVAL_KEY,
    ENABLE_SIT_KEY,
    ENABLE_DRINK_KEY,
    LANGUAGE_KEY,
];

pub const DEFAULT_SIT_INTERVAL: i64 = 60;
pub const DEFAULT_DRINK_INTERVAL: i64 = 45;
pub const DEFAULT_LANGUAGE: &str = "zh-CN";

/// Full name of a key as it appears in the settings file.
pub fn qualified_key(key: &str) -> String {
    format!("{NAMESPACE}.{key}")
}

/// Snapshot of the reminder settings. Intervals are kept as configured, including zero and
/// negative values; see [Settings::interval_for].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub sit_interval_minutes: i64,
    pub drink_interval_minutes: i64,
    pub sit_enabled: bool,
    pub drink_enabled: bool,
    pub language: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sit_interval_minutes: DEFAULT_SIT_INTERVAL,
            drink_interval_minutes: DEFAULT_DRINK_INTERVAL,
            sit_enabled: true,
            drink_enabled: true,
            language: DEFAULT_LANGUAGE.into(),
        }
    }
}

impl Settings {
    pub fn interval_minutes(&self, kind: ReminderKind) -> i64 {
        match kind {
            ReminderKind::Sit => self.sit_interval_minutes,
            ReminderKind::Drink => self.drink_interval_minutes,
        }
    }

    pub fn enabled(&self, kind: ReminderKind) -> bool {
        match kind {
            ReminderKind::Sit => self.sit_enabled,
            ReminderKind::Drink => self.drink_enabled,
        }
    }

    /// Delay after which the reminder should fire. `None` means the reminder is disabled, either
    /// explicitly or because its interval is not positive.
    pub fn interval_for(&self, kind: ReminderKind) -> Option<Duration> {
        let minutes = self.interval_minutes(kind);
        if !self.enabled(kind) || minutes <= 0 {
            return None;
        }
        let minutes = u64::try_from(minutes).ok()?;
        Some(Duration::from_secs(minutes.saturating_mul(60)))
    }
}

/// Where the reminder reads its settings from.
#[cfg_attr(test, mockall::automock)]
pub trait SettingsSource {
    fn load(&self) -> Settings;
}

/// Settings that never change.
#[cfg(test)]
pub struct StaticSettings(pub Settings);

#[cfg(test)]
impl SettingsSource for StaticSettings {
    fn load(&self) -> Settings {
        self.0.clone()
    }
}

impl<T: SettingsSource + ?Sized> SettingsSource for std::rc::Rc<T> {
    fn load(&self) -> Settings {
        (**self).load()
    }
}
