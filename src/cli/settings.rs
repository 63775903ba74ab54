use anyhow::Result;
use clap::Subcommand;

use crate::settings::{
    file::JsonFileSettings, qualified_key, Settings, SettingsSource, DRINK_INTERVAL_KEY,
    ENABLE_DRINK_KEY, ENABLE_SIT_KEY, LANGUAGE_KEY, SIT_INTERVAL_KEY,
};

#[derive(Subcommand, Debug)]
pub enum SettingsCommand {
    #[command(about = "Print the effective settings")]
    Show {},
    #[command(about = "Print the path of the settings file")]
    Path {},
    #[command(about = "Change one setting, for example `set sitReminderInterval 50`")]
    Set { key: String, value: String },
    #[command(about = "Remove all reminder settings so the defaults apply")]
    Reset {},
}

pub fn process_settings_command(command: SettingsCommand, settings: &JsonFileSettings) -> Result<()> {
    match command {
        SettingsCommand::Show {} => {
            print!("{}", describe(&settings.load()));
        }
        SettingsCommand::Path {} => {
            println!("{}", settings.path().display());
        }
        SettingsCommand::Set { key, value } => {
            settings.set_value(&key, &value)?;
            println!("{} = {}", qualified_key(&key), value.trim());
        }
        SettingsCommand::Reset {} => {
            settings.reset()?;
            println!("Reminder settings reset to defaults");
        }
    }
    Ok(())
}

fn describe(settings: &Settings) -> String {
    [
        (SIT_INTERVAL_KEY, settings.sit_interval_minutes.to_string()),
        (DRINK_INTERVAL_KEY, settings.drink_interval_minutes.to_string()),
        (ENABLE_SIT_KEY, settings.sit_enabled.to_string()),
        (ENABLE_DRINK_KEY, settings.drink_enabled.to_string()),
        (LANGUAGE_KEY, settings.language.clone()),
    ]
    .into_iter()
    .map(|(key, value)| format!("{} = {value}\n", qualified_key(key)))
    .collect()
}
