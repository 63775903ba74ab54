//! Owns the two reminder timers. Each timer is either idle or armed with a single pending expiry.
//!
//! Armed timers are tokio tasks that only sleep and then post an [Expiry] back to the
//! coordinator. Callbacks run when the owner hands the expiry to [TimerCoordinator::dispatch], so
//! every state change happens on the owner's task.

use std::{fmt::Display, sync::Arc};

use chrono::{DateTime, Utc};
use tokio::{
    sync::mpsc::{self, UnboundedReceiver, UnboundedSender},
    task::JoinHandle,
};
use tracing::{debug, info};

use crate::{settings::SettingsSource, utils::clock::Clock};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReminderKind {
    Sit,
    Drink,
}

impl ReminderKind {
    pub const ALL: [ReminderKind; 2] = [ReminderKind::Sit, ReminderKind::Drink];
}

impl Display for ReminderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReminderKind::Sit => write!(f, "sit"),
            ReminderKind::Drink => write!(f, "drink"),
        }
    }
}

/// Identity of one arming of a timer. Every arm gets a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimerHandle(u64);

/// Message posted by an armed timer once its delay elapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expiry {
    pub kind: ReminderKind,
    pub handle: TimerHandle,
}

pub type ReminderCallback = Box<dyn FnMut()>;

/// Callbacks invoked when a timer fires.
pub struct ReminderHandlers {
    pub sit: ReminderCallback,
    pub drink: ReminderCallback,
}

impl ReminderHandlers {
    pub fn new(sit: impl FnMut() + 'static, drink: impl FnMut() + 'static) -> Self {
        Self {
            sit: Box::new(sit),
            drink: Box::new(drink),
        }
    }

    pub fn noop() -> Self {
        Self::new(|| {}, || {})
    }

    fn call(&mut self, kind: ReminderKind) {
        match kind {
            ReminderKind::Sit => (self.sit)(),
            ReminderKind::Drink => (self.drink)(),
        }
    }
}

struct PendingExpiry {
    handle: TimerHandle,
    task: JoinHandle<()>,
}

struct TimerSlot {
    pending: Option<PendingExpiry>,
    armed_at: DateTime<Utc>,
}

impl TimerSlot {
    fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(pending) => {
                pending.task.abort();
                true
            }
            None => false,
        }
    }
}

/// Moments the timers were last armed. Used for status display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerSnapshot {
    pub sit_armed_at: DateTime<Utc>,
    pub drink_armed_at: DateTime<Utc>,
}

impl TimerSnapshot {
    pub fn armed_at(&self, kind: ReminderKind) -> DateTime<Utc> {
        match kind {
            ReminderKind::Sit => self.sit_armed_at,
            ReminderKind::Drink => self.drink_armed_at,
        }
    }
}

pub struct TimerCoordinator {
    settings: Box<dyn SettingsSource>,
    clock: Arc<dyn Clock>,
    handlers: ReminderHandlers,
    sit: TimerSlot,
    drink: TimerSlot,
    next_handle: u64,
    expiry_sender: UnboundedSender<Expiry>,
    expiries: UnboundedReceiver<Expiry>,
}

impl TimerCoordinator {
    pub fn new(
        settings: Box<dyn SettingsSource>,
        clock: Arc<dyn Clock>,
        handlers: ReminderHandlers,
    ) -> Self {
        let (expiry_sender, expiries) = mpsc::unbounded_channel();
        let now = clock.time();
        Self {
            settings,
            clock,
            handlers,
            sit: TimerSlot {
                pending: None,
                armed_at: now,
            },
            drink: TimerSlot {
                pending: None,
                armed_at: now,
            },
            next_handle: 0,
            expiry_sender,
            expiries,
        }
    }

    fn slot_mut(&mut self, kind: ReminderKind) -> &mut TimerSlot {
        match kind {
            ReminderKind::Sit => &mut self.sit,
            ReminderKind::Drink => &mut self.drink,
        }
    }

    fn slot(&self, kind: ReminderKind) -> &TimerSlot {
        match kind {
            ReminderKind::Sit => &self.sit,
            ReminderKind::Drink => &self.drink,
        }
    }

    /// Arms every enabled timer according to the current settings.
    pub fn start_timers(&mut self) {
        let settings = self.settings.load();
        for kind in ReminderKind::ALL {
            self.start_timer(kind, settings.interval_for(kind));
        }
    }

    fn start_timer(&mut self, kind: ReminderKind, interval: Option<std::time::Duration>) {
        let cancelled = self.slot_mut(kind).cancel();
        let Some(interval) = interval else {
            if cancelled {
                debug!("{kind} reminder is disabled, cleared its pending expiry");
            } else {
                debug!("{kind} reminder is disabled, leaving it idle");
            }
            return;
        };

        self.next_handle += 1;
        let handle = TimerHandle(self.next_handle);
        let clock = self.clock.clone();
        let sender = self.expiry_sender.clone();
        let task = tokio::spawn(async move {
            clock.sleep(interval).await;
            // The receiver lives as long as the coordinator.
            let _ = sender.send(Expiry { kind, handle });
        });

        let armed_at = self.clock.time();
        let slot = self.slot_mut(kind);
        slot.pending = Some(PendingExpiry { handle, task });
        slot.armed_at = armed_at;
        info!(
            "Armed {kind} reminder for {} minutes",
            interval.as_secs() / 60
        );
    }

    fn clear_timer(&mut self, kind: ReminderKind) {
        if self.slot_mut(kind).cancel() {
            debug!("Cleared {kind} reminder");
        }
    }

    /// Cancels both timers. Calling it on idle timers does nothing.
    pub fn clear_all_timers(&mut self) {
        for kind in ReminderKind::ALL {
            self.clear_timer(kind);
        }
    }

    /// Clears both timers and starts them again with freshly loaded settings.
    pub fn reset_all_timers(&mut self) {
        self.clear_all_timers();
        self.start_timers();
    }

    /// Restarts a single timer, leaving the other one untouched.
    pub fn reset_timer(&mut self, kind: ReminderKind) {
        let settings = self.settings.load();
        self.clear_timer(kind);
        self.start_timer(kind, settings.interval_for(kind));
    }

    pub fn reset_sit_timer(&mut self) {
        self.reset_timer(ReminderKind::Sit);
    }

    pub fn reset_drink_timer(&mut self) {
        self.reset_timer(ReminderKind::Drink);
    }

    pub fn handle(&self, kind: ReminderKind) -> Option<TimerHandle> {
        self.slot(kind).pending.as_ref().map(|p| p.handle)
    }

    pub fn is_armed(&self, kind: ReminderKind) -> bool {
        self.slot(kind).pending.is_some()
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            sit_armed_at: self.sit.armed_at,
            drink_armed_at: self.drink.armed_at,
        }
    }

    /// Waits for the next timer to elapse. Never yields `None` while the coordinator is alive.
    pub async fn next_expiry(&mut self) -> Option<Expiry> {
        self.expiries.recv().await
    }

    /// Turns an elapsed timer idle and runs its callback. Expiries of timers that were cleared or
    /// re-armed in the meantime are dropped. Returns whether the callback ran.
    pub fn dispatch(&mut self, expiry: Expiry) -> bool {
        if self.handle(expiry.kind) != Some(expiry.handle) {
            debug!("Dropping stale {} expiry {:?}", expiry.kind, expiry.handle);
            return false;
        }
        self.slot_mut(expiry.kind).pending = None;
        info!("{} reminder is due", expiry.kind);
        self.handlers.call(expiry.kind);
        true
    }
}

impl Drop for TimerCoordinator {
    fn drop(&mut self) {
        self.clear_all_timers();
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, rc::Rc, sync::Arc, time::Duration};

    use chrono::{TimeZone, Utc};
    use tokio::time::{timeout, Instant};

    use super::*;
    use crate::{
        settings::{MockSettingsSource, Settings},
        utils::{
            clock::{DefaultClock, FixedClock},
            logging::TEST_LOGGING,
        },
    };

    const MINUTE: Duration = Duration::from_secs(60);

    fn settings_source(settings: Settings) -> Box<dyn SettingsSource> {
        let mut source = MockSettingsSource::new();
        source.expect_load().returning(move || settings.clone());
        Box::new(source)
    }

    struct Counters {
        sit: Rc<Cell<u32>>,
        drink: Rc<Cell<u32>>,
    }

    fn counting_coordinator(settings: Settings) -> (TimerCoordinator, Counters) {
        *TEST_LOGGING;
        let sit = Rc::new(Cell::new(0));
        let drink = Rc::new(Cell::new(0));
        let handlers = {
            let sit = sit.clone();
            let drink = drink.clone();
            ReminderHandlers::new(
                move || sit.set(sit.get() + 1),
                move || drink.set(drink.get() + 1),
            )
        };
        let coordinator =
            TimerCoordinator::new(settings_source(settings), Arc::new(DefaultClock), handlers);
        (coordinator, Counters { sit, drink })
    }

    fn assert_elapsed(started: Instant, expected: Duration) {
        let elapsed = started.elapsed();
        assert!(
            elapsed >= expected && elapsed < expected + Duration::from_secs(1),
            "expected {expected:?}, got {elapsed:?}"
        );
    }

    /// Delivers whatever expiry arrives within `limit`.
    async fn fire_next(coordinator: &mut TimerCoordinator, limit: Duration) -> Option<Expiry> {
        let expiry = timeout(limit, coordinator.next_expiry()).await.ok()??;
        coordinator.dispatch(expiry);
        Some(expiry)
    }

    #[tokio::test(start_paused = true)]
    async fn start_timers_fires_each_reminder_after_its_interval() {
        let (mut coordinator, counters) = counting_coordinator(Settings::default());
        let started = Instant::now();
        coordinator.start_timers();
        assert!(coordinator.is_armed(ReminderKind::Sit));
        assert!(coordinator.is_armed(ReminderKind::Drink));

        let first = fire_next(&mut coordinator, 120 * MINUTE).await.unwrap();
        assert_eq!(first.kind, ReminderKind::Drink);
        assert_elapsed(started, 45 * MINUTE);
        assert_eq!(counters.drink.get(), 1);
        assert!(!coordinator.is_armed(ReminderKind::Drink));

        let second = fire_next(&mut coordinator, 120 * MINUTE).await.unwrap();
        assert_eq!(second.kind, ReminderKind::Sit);
        assert_elapsed(started, 60 * MINUTE);
        assert_eq!(counters.sit.get(), 1);
        assert!(!coordinator.is_armed(ReminderKind::Sit));
    }

    #[tokio::test(start_paused = true)]
    async fn start_timers_arms_only_enabled_subset() {
        let combinations = [(true, true), (true, false), (false, true), (false, false)];
        for (sit_enabled, drink_enabled) in combinations {
            let (mut coordinator, _) = counting_coordinator(Settings {
                sit_interval_minutes: 7,
                drink_interval_minutes: 3,
                sit_enabled,
                drink_enabled,
                ..Settings::default()
            });
            coordinator.start_timers();
            assert_eq!(coordinator.is_armed(ReminderKind::Sit), sit_enabled);
            assert_eq!(coordinator.is_armed(ReminderKind::Drink), drink_enabled);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn disabled_timers_never_fire() {
        let (mut coordinator, counters) = counting_coordinator(Settings {
            sit_enabled: false,
            drink_enabled: false,
            ..Settings::default()
        });
        coordinator.start_timers();
        assert_eq!(coordinator.handle(ReminderKind::Sit), None);
        assert_eq!(coordinator.handle(ReminderKind::Drink), None);

        assert!(fire_next(&mut coordinator, 120 * MINUTE).await.is_none());
        assert_eq!(counters.sit.get(), 0);
        assert_eq!(counters.drink.get(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn non_positive_interval_is_never_armed() {
        let (mut coordinator, counters) = counting_coordinator(Settings {
            sit_interval_minutes: 0,
            drink_interval_minutes: -10,
            ..Settings::default()
        });
        coordinator.start_timers();
        assert!(!coordinator.is_armed(ReminderKind::Sit));
        assert!(!coordinator.is_armed(ReminderKind::Drink));
        assert!(fire_next(&mut coordinator, 10 * MINUTE).await.is_none());
        assert_eq!(counters.sit.get() + counters.drink.get(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn start_timers_idles_a_timer_disabled_since_it_was_armed() {
        *TEST_LOGGING;
        let mut source = MockSettingsSource::new();
        let mut sequence = mockall::Sequence::new();
        source
            .expect_load()
            .times(1)
            .in_sequence(&mut sequence)
            .returning(Settings::default);
        source
            .expect_load()
            .times(1)
            .in_sequence(&mut sequence)
            .returning(|| Settings {
                drink_enabled: false,
                ..Settings::default()
            });
        let drinks = Rc::new(Cell::new(0));
        let handlers = {
            let drinks = drinks.clone();
            ReminderHandlers::new(|| {}, move || drinks.set(drinks.get() + 1))
        };
        let mut coordinator =
            TimerCoordinator::new(Box::new(source), Arc::new(DefaultClock), handlers);

        coordinator.start_timers();
        assert!(coordinator.is_armed(ReminderKind::Drink));
        coordinator.start_timers();
        assert!(!coordinator.is_armed(ReminderKind::Drink));
        assert!(coordinator.is_armed(ReminderKind::Sit));

        while let Some(expiry) = fire_next(&mut coordinator, 120 * MINUTE).await {
            assert_eq!(expiry.kind, ReminderKind::Sit);
        }
        assert_eq!(drinks.get(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn huge_interval_arms_without_firing() {
        let (mut coordinator, counters) = counting_coordinator(Settings {
            sit_interval_minutes: i64::MAX,
            drink_enabled: false,
            ..Settings::default()
        });
        coordinator.start_timers();
        assert!(coordinator.is_armed(ReminderKind::Sit));
        assert!(fire_next(&mut coordinator, 1000 * MINUTE).await.is_none());
        assert_eq!(counters.sit.get(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn clear_all_timers_cancels_pending_expiries() {
        let (mut coordinator, counters) = counting_coordinator(Settings::default());
        coordinator.start_timers();
        coordinator.clear_all_timers();
        assert_eq!(coordinator.handle(ReminderKind::Sit), None);
        assert_eq!(coordinator.handle(ReminderKind::Drink), None);

        // Clearing twice is harmless.
        coordinator.clear_all_timers();

        assert!(fire_next(&mut coordinator, 120 * MINUTE).await.is_none());
        assert_eq!(counters.sit.get(), 0);
        assert_eq!(counters.drink.get(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_all_timers_rearms_both() {
        let (mut coordinator, _) = counting_coordinator(Settings::default());
        coordinator.start_timers();
        let sit = coordinator.handle(ReminderKind::Sit);
        let drink = coordinator.handle(ReminderKind::Drink);

        coordinator.reset_all_timers();
        assert!(coordinator.handle(ReminderKind::Sit).is_some());
        assert!(coordinator.handle(ReminderKind::Drink).is_some());
        assert_ne!(coordinator.handle(ReminderKind::Sit), sit);
        assert_ne!(coordinator.handle(ReminderKind::Drink), drink);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_single_timer_leaves_other_untouched() {
        let (mut coordinator, _) = counting_coordinator(Settings::default());
        coordinator.start_timers();
        let sit = coordinator.handle(ReminderKind::Sit);
        let drink = coordinator.handle(ReminderKind::Drink);

        coordinator.reset_sit_timer();
        assert_ne!(coordinator.handle(ReminderKind::Sit), sit);
        assert_eq!(coordinator.handle(ReminderKind::Drink), drink);

        let sit = coordinator.handle(ReminderKind::Sit);
        coordinator.reset_drink_timer();
        assert_eq!(coordinator.handle(ReminderKind::Sit), sit);
        assert_ne!(coordinator.handle(ReminderKind::Drink), drink);
    }

    #[tokio::test(start_paused = true)]
    async fn rearming_restarts_the_delay() {
        let (mut coordinator, counters) = counting_coordinator(Settings {
            drink_enabled: false,
            ..Settings::default()
        });
        let started = Instant::now();
        coordinator.start_timers();
        tokio::time::sleep(30 * MINUTE).await;
        coordinator.reset_sit_timer();

        let expiry = fire_next(&mut coordinator, 120 * MINUTE).await.unwrap();
        assert_eq!(expiry.kind, ReminderKind::Sit);
        assert_elapsed(started, 90 * MINUTE);
        assert_eq!(counters.sit.get(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_expiry_is_dropped() {
        let (mut coordinator, counters) = counting_coordinator(Settings::default());
        coordinator.start_timers();
        let stale = Expiry {
            kind: ReminderKind::Sit,
            handle: coordinator.handle(ReminderKind::Sit).unwrap(),
        };
        coordinator.reset_sit_timer();

        assert!(!coordinator.dispatch(stale));
        assert_eq!(counters.sit.get(), 0);
        assert!(coordinator.is_armed(ReminderKind::Sit));
    }

    #[tokio::test(start_paused = true)]
    async fn arming_records_clock_time() {
        let moment = Utc.with_ymd_and_hms(2023, 1, 1, 12, 0, 0).unwrap();
        let mut coordinator = TimerCoordinator::new(
            settings_source(Settings::default()),
            Arc::new(FixedClock(moment)),
            ReminderHandlers::noop(),
        );
        coordinator.start_timers();
        let snapshot = coordinator.snapshot();
        assert_eq!(snapshot.armed_at(ReminderKind::Sit), moment);
        assert_eq!(snapshot.armed_at(ReminderKind::Drink), moment);
    }

    #[tokio::test(start_paused = true)]
    async fn settings_are_read_on_every_start() {
        *TEST_LOGGING;
        let mut source = MockSettingsSource::new();
        let mut sequence = mockall::Sequence::new();
        source
            .expect_load()
            .times(1)
            .in_sequence(&mut sequence)
            .returning(Settings::default);
        source
            .expect_load()
            .times(1)
            .in_sequence(&mut sequence)
            .returning(|| Settings {
                sit_enabled: false,
                ..Settings::default()
            });
        let mut coordinator = TimerCoordinator::new(
            Box::new(source),
            Arc::new(DefaultClock),
            ReminderHandlers::noop(),
        );

        coordinator.start_timers();
        assert!(coordinator.is_armed(ReminderKind::Sit));
        coordinator.reset_all_timers();
        assert!(!coordinator.is_armed(ReminderKind::Sit));
        assert!(coordinator.is_armed(ReminderKind::Drink));
    }
}
