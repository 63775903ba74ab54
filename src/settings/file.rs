use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

use super::{
    qualified_key, Settings, SettingsSource, ALL_KEYS, DRINK_INTERVAL_KEY, ENABLE_DRINK_KEY,
    ENABLE_SIT_KEY, LANGUAGE_KEY, SIT_INTERVAL_KEY,
};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("unknown setting `{0}`, expected one of: {keys}", keys = ALL_KEYS.join(", "))]
    UnknownKey(String),
    #[error("invalid value `{value}` for `{key}`: expected {expected}")]
    InvalidValue {
        key: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("settings file {0:?} does not contain a JSON object")]
    NotAnObject(PathBuf),
}

/// Settings backed by a JSON file. The file is read on every [SettingsSource::load]; a missing or
/// broken file yields the defaults.
#[derive(Debug, Clone)]
pub struct JsonFileSettings {
    path: PathBuf,
}

impl JsonFileSettings {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_object(&self) -> Result<Map<String, Value>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {:?}", self.path));
            }
        };
        if content.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str::<Value>(&content)
            .with_context(|| format!("Failed to parse {:?}", self.path))?
        {
            Value::Object(map) => Ok(map),
            _ => Err(SettingsError::NotAnObject(self.path.clone()).into()),
        }
    }

    fn write_object(&self, object: Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&Value::Object(object))?;
        std::fs::write(&self.path, content + "\n")
            .with_context(|| format!("Failed to write {:?}", self.path))?;
        Ok(())
    }

    /// Parses `raw` according to the type of `key` and stores it, keeping every other entry of
    /// the file intact.
    pub fn set_value(&self, key: &str, raw: &str) -> Result<()> {
        let value = parse_value(key, raw)?;
        let mut object = self.read_object()?;
        object.insert(qualified_key(key), value);
        debug!("Setting {key} to {raw}");
        self.write_object(object)
    }

    /// Removes every reminder setting so the defaults apply again.
    pub fn reset(&self) -> Result<()> {
        let mut object = self.read_object()?;
        for key in ALL_KEYS {
            object.remove(&qualified_key(key));
        }
        self.write_object(object)
    }
}

impl SettingsSource for JsonFileSettings {
    fn load(&self) -> Settings {
        match self.read_object() {
            Ok(object) => settings_from_object(&object),
            Err(e) => {
                warn!("Falling back to default settings: {e:?}");
                Settings::default()
            }
        }
    }
}

fn parse_value(key: &str, raw: &str) -> Result<Value, SettingsError> {
    let key = ALL_KEYS
        .into_iter()
        .find(|known| *known == key)
        .ok_or_else(|| SettingsError::UnknownKey(key.into()))?;
    let raw = raw.trim();
    let invalid = |expected| SettingsError::InvalidValue {
        key,
        value: raw.into(),
        expected,
    };
    match key {
        SIT_INTERVAL_KEY | DRINK_INTERVAL_KEY => raw
            .parse::<i64>()
            .map(Value::from)
            .map_err(|_| invalid("a whole number of minutes")),
        ENABLE_SIT_KEY | ENABLE_DRINK_KEY => raw
            .parse::<bool>()
            .map(Value::from)
            .map_err(|_| invalid("true or false")),
        _ => Ok(Value::from(raw)),
    }
}

/// Reads the reminder settings out of a settings object. Entries of the wrong type are ignored.
pub fn settings_from_object(object: &Map<String, Value>) -> Settings {
    let defaults = Settings::default();
    Settings {
        sit_interval_minutes: read(object, SIT_INTERVAL_KEY, Value::as_i64)
            .unwrap_or(defaults.sit_interval_minutes),
        drink_interval_minutes: read(object, DRINK_INTERVAL_KEY, Value::as_i64)
            .unwrap_or(defaults.drink_interval_minutes),
        sit_enabled: read(object, ENABLE_SIT_KEY, Value::as_bool).unwrap_or(defaults.sit_enabled),
        drink_enabled: read(object, ENABLE_DRINK_KEY, Value::as_bool)
            .unwrap_or(defaults.drink_enabled),
        language: read(object, LANGUAGE_KEY, |v| v.as_str().map(String::from))
            .unwrap_or(defaults.language),
    }
}

fn read<T>(
    object: &Map<String, Value>,
    key: &str,
    extract: impl Fn(&Value) -> Option<T>,
) -> Option<T> {
    let value = object.get(&qualified_key(key))?;
    let extracted = extract(value);
    if extracted.is_none() {
        warn!("Ignoring {key} with unexpected value {value}");
    }
    extracted
}

#[cfg(test)]
mod tests {
    use std::fs;

    use anyhow::Result;
    use tempfile::tempdir;

    use super::*;
    use crate::utils::logging::TEST_LOGGING;

    #[test]
    fn missing_file_gives_defaults() -> Result<()> {
        *TEST_LOGGING;
        let dir = tempdir()?;
        let settings = JsonFileSettings::new(dir.path().join("settings.json"));
        assert_eq!(settings.load(), Settings::default());
        Ok(())
    }

    #[test]
    fn reads_configured_values() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("settings.json");
        fs::write(
            &path,
            r#"{
                "healthReminder.sitReminderInterval": 45,
                "healthReminder.drinkReminderInterval": 30,
                "healthReminder.enableSitReminder": true,
                "healthReminder.enableDrinkReminder": false,
                "healthReminder.language": "en",
                "editor.fontSize": 14
            }"#,
        )?;

        let settings = JsonFileSettings::new(path).load();
        assert_eq!(
            settings,
            Settings {
                sit_interval_minutes: 45,
                drink_interval_minutes: 30,
                sit_enabled: true,
                drink_enabled: false,
                language: "en".into(),
            }
        );
        Ok(())
    }

    #[test]
    fn wrong_types_and_garbage_fall_back_to_defaults() -> Result<()> {
        *TEST_LOGGING;
        let dir = tempdir()?;
        let path = dir.path().join("settings.json");
        fs::write(
            &path,
            r#"{ "healthReminder.sitReminderInterval": "soon", "healthReminder.language": "fr" }"#,
        )?;
        let settings = JsonFileSettings::new(path.clone()).load();
        assert_eq!(settings.sit_interval_minutes, 60);
        assert_eq!(settings.language, "fr");

        fs::write(&path, "{ not json")?;
        assert_eq!(JsonFileSettings::new(path).load(), Settings::default());
        Ok(())
    }

    #[test]
    fn negative_interval_is_passed_through() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "healthReminder.drinkReminderInterval": -3 }"#)?;
        assert_eq!(JsonFileSettings::new(path).load().drink_interval_minutes, -3);
        Ok(())
    }

    #[test]
    fn set_value_keeps_foreign_keys() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "editor.fontSize": 14 }"#)?;
        let settings = JsonFileSettings::new(path.clone());

        settings.set_value("sitReminderInterval", "25")?;
        settings.set_value("enableDrinkReminder", "false")?;
        settings.set_value("language", "en")?;

        let loaded = settings.load();
        assert_eq!(loaded.sit_interval_minutes, 25);
        assert!(!loaded.drink_enabled);
        assert_eq!(loaded.language, "en");

        let raw: Value = serde_json::from_str(&fs::read_to_string(&path)?)?;
        assert_eq!(raw["editor.fontSize"], 14);

        settings.reset()?;
        assert_eq!(settings.load(), Settings::default());
        let raw: Value = serde_json::from_str(&fs::read_to_string(&path)?)?;
        assert_eq!(raw["editor.fontSize"], 14);
        Ok(())
    }

    #[test]
    fn set_value_rejects_bad_input() -> Result<()> {
        let dir = tempdir()?;
        let settings = JsonFileSettings::new(dir.path().join("settings.json"));

        let err = settings.set_value("sitReminderInterval", "an hour").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SettingsError>(),
            Some(SettingsError::InvalidValue { key: "sitReminderInterval", .. })
        ));

        let err = settings.set_value("volume", "11").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SettingsError>(),
            Some(SettingsError::UnknownKey(_))
        ));
        Ok(())
    }
}
