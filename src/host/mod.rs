//! The terminal host runs a reminder session: it wires the timer coordinator to the presenter,
//! executes user commands, swallows intercepted commands while a reminder is open and resets the
//! timers whenever the settings change.

pub mod commands;
pub mod interception;
pub mod shutdown;
pub mod terminal;

use std::{rc::Rc, sync::Arc};

use anyhow::Result;
use commands::{help_text, HostCommand, ACTIONS};
use interception::is_intercepted;
use tokio::{
    sync::mpsc::{self, Receiver, UnboundedReceiver},
    time::{sleep_until, Instant},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::{
    i18n::texts_for,
    reminder::{ModalSurface, ReminderPresenter, SurfaceMessage},
    settings::{Settings, SettingsSource},
    status::render_status,
    timer::{ReminderHandlers, ReminderKind, TimerCoordinator},
    utils::clock::Clock,
};

/// Short, non-blocking messages shown by the host.
pub trait Notifier {
    fn show_information(&mut self, message: &str) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct ReminderHost<U> {
    settings: Rc<dyn SettingsSource>,
    clock: Arc<dyn Clock>,
    coordinator: TimerCoordinator,
    presenter: ReminderPresenter,
    reminders: UnboundedReceiver<ReminderKind>,
    ui: U,
    last_settings: Settings,
}

impl<U: Notifier + ModalSurface> ReminderHost<U> {
    pub fn new(settings: Rc<dyn SettingsSource>, clock: Arc<dyn Clock>, ui: U) -> Self {
        let (sender, reminders) = mpsc::unbounded_channel();
        let handlers = {
            let sit = sender.clone();
            let drink = sender;
            ReminderHandlers::new(
                move || {
                    let _ = sit.send(ReminderKind::Sit);
                },
                move || {
                    let _ = drink.send(ReminderKind::Drink);
                },
            )
        };
        let coordinator =
            TimerCoordinator::new(Box::new(settings.clone()), clock.clone(), handlers);
        let last_settings = settings.load();
        Self {
            settings,
            clock,
            coordinator,
            presenter: ReminderPresenter::default(),
            reminders,
            ui,
            last_settings,
        }
    }

    pub fn coordinator(&self) -> &TimerCoordinator {
        &self.coordinator
    }

    pub fn presenter(&self) -> &ReminderPresenter {
        &self.presenter
    }

    /// Registers the actions and arms the timers.
    pub fn activate(&mut self) {
        info!("Health reminder activated, actions: {}", ACTIONS.join(", "));
        self.last_settings = self.settings.load();
        self.coordinator.start_timers();
    }

    /// Clears the timers. Remaining time is not kept.
    pub fn deactivate(&mut self) -> Result<()> {
        info!("Health reminder deactivated");
        self.coordinator.clear_all_timers();
        self.presenter.dismiss(&mut self.ui)
    }

    #[instrument(skip_all, fields(command = command.name()))]
    pub fn execute(&mut self, command: HostCommand) -> Result<Flow> {
        if self.presenter.is_open() && is_intercepted(&command) {
            debug!("Intercepted while a reminder is open");
            self.presenter.reveal(&mut self.ui)?;
            return Ok(Flow::Continue);
        }

        match command {
            HostCommand::ResetTimers => self.reset_all_timers()?,
            HostCommand::ShowStatus => self.show_current_status()?,
            HostCommand::Help => self.ui.show_information(&help_text())?,
            HostCommand::Quit => return Ok(Flow::Quit),
            HostCommand::Surface(SurfaceMessage::Confirm) => self.confirm()?,
            HostCommand::Execute(name) => {
                warn!("No handler for {name}");
                self.ui
                    .show_information(&format!("Command '{name}' not found"))?;
            }
            HostCommand::Type(_) => debug!("Nothing to type into"),
        }
        Ok(Flow::Continue)
    }

    /// Handler of the reset action.
    pub fn reset_all_timers(&mut self) -> Result<()> {
        self.coordinator.reset_all_timers();
        let settings = self.settings.load();
        self.ui
            .show_information(texts_for(&settings.language).reset_message)
    }

    /// Handler of the status action.
    pub fn show_current_status(&mut self) -> Result<()> {
        let settings = self.settings.load();
        let status = render_status(
            &settings,
            texts_for(&settings.language),
            &self.coordinator.snapshot(),
            self.clock.time(),
        );
        self.ui.show_information(&status)
    }

    /// Resets both timers if the reminder settings differ from the ones seen last. Returns
    /// whether a reset happened.
    pub fn on_settings_changed(&mut self) -> bool {
        let settings = self.settings.load();
        if settings == self.last_settings {
            debug!("Settings file changed without touching reminder settings");
            return false;
        }
        info!("Reminder settings changed, resetting timers");
        self.last_settings = settings;
        self.coordinator.reset_all_timers();
        true
    }

    pub fn on_reminder(&mut self, kind: ReminderKind) -> Result<()> {
        let settings = self.settings.load();
        self.presenter.request(kind, &settings, &mut self.ui)
    }

    pub fn tick(&mut self) -> Result<()> {
        self.presenter.tick(&mut self.ui)
    }

    fn confirm(&mut self) -> Result<()> {
        let Some(kind) = self.presenter.confirm(&mut self.ui)? else {
            return Ok(());
        };
        self.coordinator.reset_timer(kind);
        let settings = self.settings.load();
        self.ui
            .show_information(texts_for(&settings.language).confirm_message)?;
        self.presenter.show_next(&settings, &mut self.ui)
    }

    /// Runs a whole session: activation, the event loop and deactivation. The session ends on
    /// `quit`, when the input closes or when `shutdown` is cancelled.
    pub async fn run(
        &mut self,
        mut inputs: Receiver<HostCommand>,
        mut settings_changes: Receiver<()>,
        shutdown: CancellationToken,
    ) -> Result<()> {
        self.activate();
        let result = self
            .event_loop(&mut inputs, &mut settings_changes, &shutdown)
            .await;
        self.deactivate()?;
        result
    }

    async fn event_loop(
        &mut self,
        inputs: &mut Receiver<HostCommand>,
        settings_changes: &mut Receiver<()>,
        shutdown: &CancellationToken,
    ) -> Result<()> {
        loop {
            let tick_at = self.presenter.next_tick();
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("Shutting down session");
                    return Ok(());
                }
                Some(expiry) = self.coordinator.next_expiry() => {
                    self.coordinator.dispatch(expiry);
                }
                Some(kind) = self.reminders.recv() => self.on_reminder(kind)?,
                command = inputs.recv() => match command {
                    Some(command) => {
                        if self.execute(command)? == Flow::Quit {
                            return Ok(());
                        }
                    }
                    None => {
                        info!("Input closed");
                        return Ok(());
                    }
                },
                Some(()) = settings_changes.recv() => {
                    self.on_settings_changed();
                }
                _ = sleep_until(tick_at.unwrap_or_else(Instant::now)), if tick_at.is_some() => {
                    self.tick()?;
                }
            }
        }
    }
}
