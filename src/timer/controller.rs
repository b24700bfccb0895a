//! Session controller.
//!
//! Orchestrates the countdown, the mode sequencer, the notification
//! dispatcher and the settings store. It is the only writer of
//! [`TimerState`].
//!
//! All time-driven behavior goes through an injected [`Scheduler`]:
//! - `Tick` every [`TICK_PERIOD`] while running
//! - `AutoStart` [`AUTO_START_DELAY`] after a completion, when enabled
//! - `BannerDismiss` after the banner duration
//!
//! Every public operation is total. Rejections are logged no-ops.

use tokio::time::Duration;
use tracing::{debug, info, warn};

use super::countdown::TickOutcome;
use super::scheduler::{ScheduledAction, Scheduler, Wakeup};
use super::sequencer;
use crate::notification::{Banner, NotificationDispatcher, NotificationSink};
use crate::settings::SettingsStore;
use crate::types::{SessionMode, Settings, SettingsPatch, TimerState};

/// Time between two countdown ticks.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Delay between a completion and the automatic start of the next session.
pub const AUTO_START_DELAY: Duration = Duration::from_secs(1);

/// Drives one interval timer.
pub struct SessionController<S: Scheduler> {
    state: TimerState,
    settings: Settings,
    store: SettingsStore,
    scheduler: S,
    dispatcher: NotificationDispatcher,
}

impl<S: Scheduler> SessionController<S> {
    /// Creates a controller with settings loaded from `store`.
    ///
    /// The timer starts stopped, in `Work`, at the full work duration.
    pub fn new(store: SettingsStore, scheduler: S, sink: Box<dyn NotificationSink + Send>) -> Self {
        let settings = store.load();
        info!(?settings, "Settings loaded");

        Self {
            state: TimerState::new(&settings),
            settings,
            store,
            scheduler,
            dispatcher: NotificationDispatcher::new(sink),
        }
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    /// Returns the live timer state.
    pub fn state(&self) -> &TimerState {
        &self.state
    }

    /// Returns the settings in effect.
    pub fn settings(&self) -> Settings {
        self.settings
    }

    /// Returns the completion banner currently on screen.
    pub fn active_banner(&self) -> Option<&Banner> {
        self.dispatcher.active_banner()
    }

    /// Returns the scheduler.
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    // ------------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------------

    /// Starts the countdown if there is time left.
    pub fn start(&mut self) {
        self.scheduler.cancel(ScheduledAction::AutoStart);
        self.start_countdown();
    }

    /// Stops the countdown. Idempotent.
    pub fn pause(&mut self) {
        self.scheduler.cancel(ScheduledAction::AutoStart);
        self.stop_countdown();
    }

    /// Stops and rewinds the current session to its full duration.
    ///
    /// The completed work-session count is kept.
    pub fn reset(&mut self) {
        self.scheduler.cancel(ScheduledAction::AutoStart);
        self.stop_countdown();
        self.load_duration();
    }

    /// Zeroes the completed work-session count and returns to a fresh,
    /// stopped work session.
    pub fn reset_session_count(&mut self) {
        self.scheduler.cancel(ScheduledAction::AutoStart);
        self.stop_countdown();
        self.state.completed_work_sessions = 0;
        self.state.mode = SessionMode::Work;
        self.load_duration();
        info!("Session count reset");
    }

    /// Switches to `target` manually.
    ///
    /// Always stops the countdown and loads the full duration of `target`;
    /// the completed work-session count is never touched.
    pub fn switch_mode(&mut self, target: SessionMode) {
        self.scheduler.cancel(ScheduledAction::AutoStart);
        self.stop_countdown();
        self.state.mode = target;
        self.load_duration();
        info!(mode = %target, "Switched mode");
    }

    /// Advances the countdown by one tick.
    pub fn on_tick(&mut self) {
        match self.state.countdown.tick() {
            TickOutcome::Idle => {
                // A tick source without a running countdown has no purpose.
                self.scheduler.cancel(ScheduledAction::Tick);
            }
            TickOutcome::Ticked { remaining_seconds } => {
                if remaining_seconds % 60 == 0 {
                    debug!(remaining_seconds, mode = %self.state.mode, "Tick");
                }
            }
            TickOutcome::Completed => {
                self.scheduler.cancel(ScheduledAction::Tick);
                self.complete_session();
            }
        }
    }

    /// Validates and persists new settings.
    ///
    /// When stopped, the current session is rewound to the (possibly new)
    /// duration right away. A running session keeps counting and picks the
    /// change up on the next reset or mode change.
    pub fn apply_settings(&mut self, settings: Settings) -> Settings {
        self.settings = self.store.apply(settings);

        if !self.state.is_running() {
            self.load_duration();
        }

        self.settings
    }

    /// Merges a partial update over the current settings and applies it.
    pub fn apply_patch(&mut self, patch: &SettingsPatch) -> Settings {
        let merged = self.settings.merge(patch);
        self.apply_settings(merged)
    }

    /// Dispatches a scheduler wakeup. Stale wakeups are ignored.
    pub fn handle_wakeup(&mut self, wakeup: Wakeup) {
        if !self.scheduler.acknowledge(wakeup) {
            debug!(?wakeup, "Ignoring stale wakeup");
            return;
        }

        match wakeup.action {
            ScheduledAction::Tick => self.on_tick(),
            ScheduledAction::AutoStart => {
                debug!(mode = %self.state.mode, "Auto-starting session");
                self.start_countdown();
            }
            ScheduledAction::BannerDismiss => self.dispatcher.dismiss(),
        }
    }

    /// Cancels every pending callback and stops the countdown.
    pub fn shutdown(&mut self) {
        self.scheduler.cancel_all();
        self.state.countdown.pause();
        self.dispatcher.dismiss();
        debug!("Session controller shut down");
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    fn start_countdown(&mut self) {
        if self.state.is_running() {
            return;
        }
        if self.state.countdown.start() {
            self.scheduler
                .schedule_repeating(ScheduledAction::Tick, TICK_PERIOD);
            info!(
                mode = %self.state.mode,
                remaining_seconds = self.state.remaining_seconds(),
                "Countdown started"
            );
        }
    }

    fn stop_countdown(&mut self) {
        self.scheduler.cancel(ScheduledAction::Tick);
        if self.state.countdown.pause() {
            info!(
                remaining_seconds = self.state.remaining_seconds(),
                "Countdown paused"
            );
        }
    }

    /// Loads the configured duration of the current mode into the countdown.
    fn load_duration(&mut self) {
        let seconds = self.settings.duration_secs(self.state.mode);
        if let Err(e) = self.state.countdown.set_duration(seconds) {
            warn!("{}", e);
        }
    }

    fn complete_session(&mut self) {
        let transition = sequencer::complete(
            self.state.mode,
            self.state.completed_work_sessions,
            self.settings.long_break_interval,
        );
        self.state.mode = transition.next;
        self.state.completed_work_sessions = transition.completed_work_sessions;

        info!(
            completed = %transition.completed,
            next = %transition.next,
            completed_work_sessions = transition.completed_work_sessions,
            "Session complete"
        );

        self.dispatcher.notify_complete(
            transition.completed,
            transition.next,
            self.settings.sound_enabled,
            &mut self.scheduler,
        );

        self.load_duration();

        if self.settings.auto_starts(transition.next) {
            self.scheduler
                .schedule_once(ScheduledAction::AutoStart, AUTO_START_DELAY);
        }
    }
}

impl<S: Scheduler> Drop for SessionController<S> {
    fn drop(&mut self) {
        self.scheduler.cancel_all();
    }
}

impl<S: Scheduler> std::fmt::Debug for SessionController<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("state", &self.state)
            .field("settings", &self.settings)
            .field("dispatcher", &self.dispatcher)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
