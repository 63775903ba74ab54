//! Terminal rendering of the host: information messages and reminder modals drawn with ANSI
//! colours, and a stdin reader feeding [HostCommand]s.

use std::{
    io::{self, BufRead, Write},
    thread,
};

use ansi_term::{Colour, Style};
use anyhow::Result;
use tokio::sync::mpsc::{self, Receiver};
use tracing::{debug, error};

use super::{commands::HostCommand, Notifier};
use crate::reminder::{ModalDocument, ModalSurface};

const BANNER_WIDTH: usize = 60;

pub struct TerminalUi<W: Write> {
    out: W,
    colours: bool,
    document: Option<ModalDocument>,
}

impl TerminalUi<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout(), true)
    }
}

impl<W: Write> TerminalUi<W> {
    pub fn new(out: W, colours: bool) -> Self {
        Self {
            out,
            colours,
            document: None,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn paint(&self, style: Style, text: &str) -> String {
        if self.colours {
            style.paint(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn rule(&self) -> String {
        self.paint(Colour::Purple.normal(), &"━".repeat(BANNER_WIDTH))
    }

    fn draw_modal(&mut self) -> Result<()> {
        let Some(document) = self.document.clone() else {
            return Ok(());
        };
        let rule = self.rule();
        let heading = self.paint(Colour::Purple.bold(), document.texts.modal_heading);
        let title = self.paint(Style::new().bold(), document.title());
        let button = self.paint(Style::new().dimmed(), &format!("[ {} ]", document.button()));
        writeln!(self.out)?;
        writeln!(self.out, "{rule}")?;
        writeln!(self.out, "  {heading}")?;
        writeln!(self.out)?;
        writeln!(self.out, "  {title}")?;
        writeln!(self.out, "  {}", document.message())?;
        writeln!(self.out)?;
        writeln!(self.out, "  {button}")?;
        writeln!(self.out, "{rule}")?;
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write> Notifier for TerminalUi<W> {
    fn show_information(&mut self, message: &str) -> Result<()> {
        let marker = self.paint(Colour::Cyan.bold(), "ℹ");
        writeln!(self.out, "{marker} {message}")?;
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write> ModalSurface for TerminalUi<W> {
    fn open(&mut self, document: &ModalDocument) -> Result<()> {
        self.document = Some(document.clone());
        self.draw_modal()?;
        self.show_countdown(document.countdown_secs)
    }

    fn show_countdown(&mut self, seconds_left: u64) -> Result<()> {
        let Some(texts) = self.document.as_ref().map(|d| d.texts) else {
            return Ok(());
        };
        let line = self.paint(
            Colour::Fixed(245).normal(),
            &format!(
                "{} {seconds_left} {}",
                texts.wait_seconds, texts.seconds_suffix
            ),
        );
        writeln!(self.out, "  {line}")?;
        self.out.flush()?;
        Ok(())
    }

    fn enable_confirm(&mut self) -> Result<()> {
        let Some(document) = self.document.clone() else {
            return Ok(());
        };
        let button = self.paint(
            Colour::White.on(Colour::Purple).bold(),
            &format!(" {} ", document.button()),
        );
        writeln!(self.out, "  {button}  {}", document.texts.confirm_hint)?;
        self.out.flush()?;
        Ok(())
    }

    fn reveal(&mut self) -> Result<()> {
        let Some(hint) = self.document.as_ref().map(|d| d.texts.blocking_hint) else {
            return Ok(());
        };
        let hint = self.paint(Colour::Black.on(Colour::Yellow), &format!(" ⚠ {hint} "));
        writeln!(self.out, "{hint}")?;
        self.draw_modal()
    }

    fn close(&mut self) -> Result<()> {
        if self.document.take().is_some() {
            let rule = self.rule();
            writeln!(self.out, "{rule}")?;
            self.out.flush()?;
        }
        Ok(())
    }
}

/// Reads stdin on a dedicated thread so a pending read never holds up runtime shutdown.
pub fn spawn_stdin_reader() -> Receiver<HostCommand> {
    let (tx, rx) = mpsc::channel(16);
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    let command = HostCommand::parse(&line);
                    debug!("Read command {}", command.name());
                    if tx.blocking_send(command).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    error!("Failed to read stdin {e:?}");
                    break;
                }
            }
        }
    });
    rx
}
