//! Completion notifications.
//!
//! When a session completes, the [`NotificationDispatcher`] shows a banner
//! that dismisses itself after [`BANNER_DURATION`] and, if sound is enabled,
//! plays a short synthesized cue. Where those end up is decided by a
//! [`NotificationSink`]:
//!
//! - [`TerminalSink`]: prints to stdout and plays through rodio
//! - [`SilentSink`]: logs the banner, drops the cue
//! - [`MockNotificationSink`]: records everything for tests
//!
//! Audio failures are logged and swallowed. They never suppress the banner
//! and never reach the session controller.

mod banner;
mod terminal;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::{debug, warn};

pub use self::banner::Banner;
pub use self::terminal::{SilentSink, TerminalSink};

use crate::sound::{SoundError, ToneSequence};
use crate::timer::{ScheduledAction, Scheduler};
use crate::types::SessionMode;

/// How long a completion banner stays visible.
pub const BANNER_DURATION: Duration = Duration::from_secs(3);

// ============================================================================
// NotificationSink
// ============================================================================

/// Destination for banners and audible cues.
pub trait NotificationSink {
    /// Displays a banner, replacing any banner already shown.
    fn show_banner(&self, banner: &Banner);

    /// Removes a banner previously shown.
    fn dismiss_banner(&self, banner: &Banner);

    /// Plays an audible cue.
    ///
    /// # Errors
    ///
    /// Returns an error if the environment cannot play sound.
    fn play_cue(&self, cue: &ToneSequence) -> Result<(), SoundError>;
}

// ============================================================================
// NotificationDispatcher
// ============================================================================

/// Emits completion banners and cues through a sink.
pub struct NotificationDispatcher {
    sink: Box<dyn NotificationSink + Send>,
    active: Option<Banner>,
}

impl NotificationDispatcher {
    /// Creates a dispatcher writing to `sink`.
    pub fn new(sink: Box<dyn NotificationSink + Send>) -> Self {
        Self { sink, active: None }
    }

    /// Announces that a `completed` session ended and the timer moved to `next`.
    ///
    /// The banner is always shown. Its dismissal is (re)scheduled on
    /// `scheduler`, so back-to-back completions extend the banner instead of
    /// stacking dismissals.
    pub fn notify_complete<S: Scheduler + ?Sized>(
        &mut self,
        completed: SessionMode,
        next: SessionMode,
        sound_enabled: bool,
        scheduler: &mut S,
    ) {
        let banner = Banner::for_completion(completed, next);
        self.sink.show_banner(&banner);
        self.active = Some(banner);
        scheduler.schedule_once(ScheduledAction::BannerDismiss, BANNER_DURATION);

        if sound_enabled {
            if let Err(e) = self.sink.play_cue(&ToneSequence::for_completion(completed)) {
                warn!("Completion cue unavailable: {}", e);
            }
        }
    }

    /// Hides the active banner, if any.
    pub fn dismiss(&mut self) {
        if let Some(banner) = self.active.take() {
            debug!("Dismissing banner: {}", banner.title);
            self.sink.dismiss_banner(&banner);
        }
    }

    /// Returns the banner currently on screen.
    pub fn active_banner(&self) -> Option<&Banner> {
        self.active.as_ref()
    }
}

impl std::fmt::Debug for NotificationDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationDispatcher")
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// MockNotificationSink
// ============================================================================

/// Something a [`MockNotificationSink`] received.
#[derive(Debug, Clone, PartialEq)]
pub enum SinkEvent {
    /// A banner was shown
    Shown(Banner),
    /// A banner was dismissed
    Dismissed(Banner),
    /// A cue was played
    Cue(ToneSequence),
}

#[derive(Debug, Default)]
struct MockState {
    events: Vec<SinkEvent>,
    fail_cues: bool,
}

/// Mock sink for testing.
///
/// Clones share the same record, so a test can keep one clone and hand the
/// other to the dispatcher.
#[derive(Debug, Clone, Default)]
pub struct MockNotificationSink {
    state: Arc<Mutex<MockState>>,
}

impl MockNotificationSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent cue fail like an unsupported audio environment.
    pub fn set_fail_cues(&self, fail: bool) {
        self.state.lock().unwrap().fail_cues = fail;
    }

    #[must_use]
    pub fn events(&self) -> Vec<SinkEvent> {
        self.state.lock().unwrap().events.clone()
    }

    #[must_use]
    pub fn shown_banners(&self) -> Vec<Banner> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                SinkEvent::Shown(banner) => Some(banner),
                _ => None,
            })
            .collect()
    }

    #[must_use]
    pub fn dismissed_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|event| matches!(event, SinkEvent::Dismissed(_)))
            .count()
    }

    #[must_use]
    pub fn cue_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|event| matches!(event, SinkEvent::Cue(_)))
            .count()
    }

    pub fn clear(&self) {
        self.state.lock().unwrap().events.clear();
    }
}

impl NotificationSink for MockNotificationSink {
    fn show_banner(&self, banner: &Banner) {
        self.state
            .lock()
            .unwrap()
            .events
            .push(SinkEvent::Shown(banner.clone()));
    }

    fn dismiss_banner(&self, banner: &Banner) {
        self.state
            .lock()
            .unwrap()
            .events
            .push(SinkEvent::Dismissed(banner.clone()));
    }

    fn play_cue(&self, cue: &ToneSequence) -> Result<(), SoundError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_cues {
            return Err(SoundError::DeviceNotAvailable("Mock failure".to_string()));
        }
        state.events.push(SinkEvent::Cue(cue.clone()));
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::ManualScheduler;

    fn create_dispatcher() -> (NotificationDispatcher, MockNotificationSink) {
        let sink = MockNotificationSink::new();
        let dispatcher = NotificationDispatcher::new(Box::new(sink.clone()));
        (dispatcher, sink)
    }

    #[test]
    fn test_notify_complete_shows_banner_and_plays_cue() {
        let (mut dispatcher, sink) = create_dispatcher();
        let mut scheduler = ManualScheduler::new();

        dispatcher.notify_complete(
            SessionMode::Work,
            SessionMode::ShortBreak,
            true,
            &mut scheduler,
        );

        assert_eq!(sink.shown_banners().len(), 1);
        assert_eq!(sink.cue_count(), 1);
        assert_eq!(
            sink.events()[1],
            SinkEvent::Cue(ToneSequence::rising_sweep())
        );
        assert_eq!(
            dispatcher.active_banner().map(|b| b.completed),
            Some(SessionMode::Work)
        );
        assert_eq!(
            scheduler.delay_of(ScheduledAction::BannerDismiss),
            Some(BANNER_DURATION)
        );
    }

    #[test]
    fn test_notify_complete_without_sound() {
        let (mut dispatcher, sink) = create_dispatcher();
        let mut scheduler = ManualScheduler::new();

        dispatcher.notify_complete(
            SessionMode::ShortBreak,
            SessionMode::Work,
            false,
            &mut scheduler,
        );

        assert_eq!(sink.shown_banners().len(), 1);
        assert_eq!(sink.cue_count(), 0);
    }

    #[test]
    fn test_cue_failure_does_not_block_banner() {
        let (mut dispatcher, sink) = create_dispatcher();
        sink.set_fail_cues(true);
        let mut scheduler = ManualScheduler::new();

        dispatcher.notify_complete(
            SessionMode::Work,
            SessionMode::ShortBreak,
            true,
            &mut scheduler,
        );

        assert_eq!(sink.shown_banners().len(), 1);
        assert!(dispatcher.active_banner().is_some());
        assert!(scheduler.is_scheduled(ScheduledAction::BannerDismiss));
    }

    #[test]
    fn test_back_to_back_completions_reset_dismissal() {
        let (mut dispatcher, sink) = create_dispatcher();
        let mut scheduler = ManualScheduler::new();

        dispatcher.notify_complete(
            SessionMode::Work,
            SessionMode::ShortBreak,
            false,
            &mut scheduler,
        );
        let first = scheduler.pending(ScheduledAction::BannerDismiss).unwrap();

        dispatcher.notify_complete(
            SessionMode::ShortBreak,
            SessionMode::Work,
            false,
            &mut scheduler,
        );

        // The first dismissal is stale; only one is pending.
        assert!(!scheduler.acknowledge(first));
        assert!(scheduler.is_scheduled(ScheduledAction::BannerDismiss));
        assert_eq!(
            dispatcher.active_banner().map(|b| b.completed),
            Some(SessionMode::ShortBreak)
        );
        assert_eq!(sink.shown_banners().len(), 2);
    }

    #[test]
    fn test_dismiss_is_idempotent() {
        let (mut dispatcher, sink) = create_dispatcher();
        let mut scheduler = ManualScheduler::new();

        dispatcher.notify_complete(
            SessionMode::Work,
            SessionMode::ShortBreak,
            false,
            &mut scheduler,
        );
        dispatcher.dismiss();
        dispatcher.dismiss();

        assert!(dispatcher.active_banner().is_none());
        assert_eq!(sink.dismissed_count(), 1);
    }

    #[test]
    fn test_mock_sink_clear() {
        let sink = MockNotificationSink::new();
        sink.show_banner(&Banner::for_completion(
            SessionMode::Work,
            SessionMode::ShortBreak,
        ));
        sink.clear();
        assert!(sink.events().is_empty());
    }
}
