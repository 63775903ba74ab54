//! Presents elapsed reminders as modals. A modal keeps its confirm button disabled for a short
//! countdown; confirming closes it and lets the host re-arm the matching timer.

pub mod markup;

use std::{collections::VecDeque, time::Duration};

use anyhow::Result;
use serde::Deserialize;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::{
    i18n::{texts_for, LanguageTexts},
    settings::Settings,
    timer::ReminderKind,
};

/// Time the confirm control stays disabled after a modal opens.
pub const CONFIRM_COUNTDOWN: Duration = Duration::from_secs(3);

/// Message sent by the modal surface back to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(tag = "command", rename_all = "lowercase")]
pub enum SurfaceMessage {
    Confirm,
}

/// Everything a surface needs to draw one reminder.
#[derive(Debug, Clone)]
pub struct ModalDocument {
    pub kind: ReminderKind,
    pub texts: &'static LanguageTexts,
    pub countdown_secs: u64,
}

impl ModalDocument {
    pub fn new(kind: ReminderKind, texts: &'static LanguageTexts, countdown_secs: u64) -> Self {
        Self {
            kind,
            texts,
            countdown_secs,
        }
    }

    pub fn title(&self) -> &'static str {
        match self.kind {
            ReminderKind::Sit => self.texts.sit_reminder_title,
            ReminderKind::Drink => self.texts.drink_reminder_title,
        }
    }

    pub fn message(&self) -> &'static str {
        match self.kind {
            ReminderKind::Sit => self.texts.sit_reminder_message,
            ReminderKind::Drink => self.texts.drink_reminder_message,
        }
    }

    pub fn button(&self) -> &'static str {
        match self.kind {
            ReminderKind::Sit => self.texts.sit_reminder_button,
            ReminderKind::Drink => self.texts.drink_reminder_button,
        }
    }

    pub fn html(&self) -> String {
        markup::render_document(self)
    }
}

/// Host side rendering of reminder modals.
pub trait ModalSurface {
    fn open(&mut self, document: &ModalDocument) -> Result<()>;

    fn show_countdown(&mut self, seconds_left: u64) -> Result<()>;

    fn enable_confirm(&mut self) -> Result<()>;

    /// Brings the open modal back in front after the user tried to do something else.
    fn reveal(&mut self) -> Result<()>;

    fn close(&mut self) -> Result<()>;
}

#[derive(Debug)]
struct OpenModal {
    document: ModalDocument,
    opened_at: Instant,
    seconds_shown: u64,
    confirm_enabled: bool,
}

/// Keeps track of the open modal and of reminders waiting for it to close.
pub struct ReminderPresenter {
    countdown: Duration,
    open: Option<OpenModal>,
    queue: VecDeque<ReminderKind>,
}

impl Default for ReminderPresenter {
    fn default() -> Self {
        Self::new(CONFIRM_COUNTDOWN)
    }
}

impl ReminderPresenter {
    pub fn new(countdown: Duration) -> Self {
        Self {
            countdown,
            open: None,
            queue: VecDeque::new(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    pub fn open_kind(&self) -> Option<ReminderKind> {
        self.open.as_ref().map(|m| m.document.kind)
    }

    pub fn queued(&self) -> impl Iterator<Item = ReminderKind> + '_ {
        self.queue.iter().copied()
    }

    /// Shows the reminder right away, or queues it behind the open modal. A reminder already open
    /// or queued is not added twice.
    pub fn request(
        &mut self,
        kind: ReminderKind,
        settings: &Settings,
        surface: &mut impl ModalSurface,
    ) -> Result<()> {
        if self.open_kind() == Some(kind) || self.queue.contains(&kind) {
            debug!("{kind} reminder is already pending");
            return Ok(());
        }
        if self.is_open() {
            debug!("Queueing {kind} reminder behind the open modal");
            self.queue.push_back(kind);
            return Ok(());
        }
        self.show(kind, settings, surface)
    }

    pub fn show_sit_reminder(
        &mut self,
        settings: &Settings,
        surface: &mut impl ModalSurface,
    ) -> Result<()> {
        self.request(ReminderKind::Sit, settings, surface)
    }

    pub fn show_drink_reminder(
        &mut self,
        settings: &Settings,
        surface: &mut impl ModalSurface,
    ) -> Result<()> {
        self.request(ReminderKind::Drink, settings, surface)
    }

    fn show(
        &mut self,
        kind: ReminderKind,
        settings: &Settings,
        surface: &mut impl ModalSurface,
    ) -> Result<()> {
        let seconds = self.countdown.as_secs();
        let document = ModalDocument::new(kind, texts_for(&settings.language), seconds);
        surface.open(&document)?;
        info!("Showing {kind} reminder");
        self.open = Some(OpenModal {
            document,
            opened_at: Instant::now(),
            seconds_shown: seconds,
            confirm_enabled: false,
        });
        if seconds == 0 {
            self.tick(surface)?;
        }
        Ok(())
    }

    /// Moment the countdown display has to change next, if a countdown is running.
    pub fn next_tick(&self) -> Option<Instant> {
        let open = self.open.as_ref().filter(|m| !m.confirm_enabled)?;
        let total = self.countdown.as_secs();
        Some(open.opened_at + Duration::from_secs(total - open.seconds_shown + 1))
    }

    /// Advances the countdown of the open modal to the current time.
    pub fn tick(&mut self, surface: &mut impl ModalSurface) -> Result<()> {
        let total = self.countdown.as_secs();
        let Some(open) = self.open.as_mut().filter(|m| !m.confirm_enabled) else {
            return Ok(());
        };
        let left = total.saturating_sub(open.opened_at.elapsed().as_secs());
        if left >= open.seconds_shown && left > 0 {
            return Ok(());
        }
        open.seconds_shown = left;
        if left > 0 {
            surface.show_countdown(left)?;
        } else {
            open.confirm_enabled = true;
            surface.enable_confirm()?;
            debug!("{} reminder can be confirmed", open.document.kind);
        }
        Ok(())
    }

    /// Closes the open modal if its countdown is over. Returns the confirmed reminder; confirming
    /// too early is ignored.
    pub fn confirm(&mut self, surface: &mut impl ModalSurface) -> Result<Option<ReminderKind>> {
        let Some(open) = &self.open else {
            return Ok(None);
        };
        if !open.confirm_enabled {
            debug!("Ignoring early confirmation of {} reminder", open.document.kind);
            return Ok(None);
        }
        let kind = open.document.kind;
        surface.close()?;
        self.open = None;
        info!("{kind} reminder confirmed");
        Ok(Some(kind))
    }

    /// Opens the next queued reminder, if any.
    pub fn show_next(&mut self, settings: &Settings, surface: &mut impl ModalSurface) -> Result<()> {
        if self.is_open() {
            return Ok(());
        }
        match self.queue.pop_front() {
            Some(kind) => self.show(kind, settings, surface),
            None => Ok(()),
        }
    }

    pub fn reveal(&mut self, surface: &mut impl ModalSurface) -> Result<()> {
        if self.is_open() {
            surface.reveal()?;
        }
        Ok(())
    }

    /// Drops the open modal and the queue without confirming anything.
    pub fn dismiss(&mut self, surface: &mut impl ModalSurface) -> Result<()> {
        self.queue.clear();
        if self.open.take().is_some() {
            surface.close()?;
        }
        Ok(())
    }
}
