use std::{fmt::Display, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;

use crate::{
    i18n::texts_for,
    reminder::{ModalDocument, CONFIRM_COUNTDOWN},
    settings::SettingsSource,
    timer::ReminderKind,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Reminder {
    Sit,
    Drink,
}

impl From<Reminder> for ReminderKind {
    fn from(value: Reminder) -> Self {
        match value {
            Reminder::Sit => Self::Sit,
            Reminder::Drink => Self::Drink,
        }
    }
}

impl Display for Reminder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        ReminderKind::from(*self).fmt(f)
    }
}

#[derive(Debug, Parser)]
pub struct RenderCommand {
    #[arg(help = "Which reminder to render")]
    reminder: Reminder,
    #[arg(long, short, help = "Output file. Prints to stdout when omitted")]
    output: Option<PathBuf>,
    #[arg(long, help = "Language code. Defaults to the configured language")]
    language: Option<String>,
}

/// Renders the modal document in the configured language, the same one a session would show.
pub fn process_render_command(
    RenderCommand {
        reminder,
        output,
        language,
    }: RenderCommand,
    settings: &impl SettingsSource,
) -> Result<()> {
    let language = language.unwrap_or_else(|| settings.load().language);
    let document = ModalDocument::new(
        reminder.into(),
        texts_for(&language),
        CONFIRM_COUNTDOWN.as_secs(),
    );
    let html = document.html();

    match output {
        Some(path) => {
            std::fs::write(&path, html).with_context(|| format!("Failed to write {path:?}"))?;
            info!("Rendered {reminder} reminder into {path:?}");
            println!("{}", path.display());
        }
        None => print!("{html}"),
    }
    Ok(())
}
