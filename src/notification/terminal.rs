//! Notification sinks for terminal and headless environments.

use tracing::{debug, info};

use super::{Banner, NotificationSink};
use crate::sound::{SoundError, SoundPlayer, ToneSequence};

/// Prints banners to stdout and plays cues through a [`SoundPlayer`].
///
/// Without a player every cue fails with [`SoundError::DeviceNotAvailable`],
/// which the dispatcher logs and ignores.
pub struct TerminalSink {
    player: Option<Box<dyn SoundPlayer + Send>>,
}

impl TerminalSink {
    /// Creates a sink with an optional sound player.
    pub fn new(player: Option<Box<dyn SoundPlayer + Send>>) -> Self {
        Self { player }
    }

    /// Returns true if a sound player is attached.
    pub fn has_audio(&self) -> bool {
        self.player.is_some()
    }
}

impl NotificationSink for TerminalSink {
    fn show_banner(&self, banner: &Banner) {
        println!("* {} - {}", banner.title, banner.message);
    }

    fn dismiss_banner(&self, banner: &Banner) {
        debug!("Banner dismissed: {}", banner.title);
    }

    fn play_cue(&self, cue: &ToneSequence) -> Result<(), SoundError> {
        match &self.player {
            Some(player) => player.play(cue),
            None => Err(SoundError::DeviceNotAvailable(
                "no audio output configured".to_string(),
            )),
        }
    }
}

/// Visual-only sink: banners go to the log, cues are dropped.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentSink;

impl NotificationSink for SilentSink {
    fn show_banner(&self, banner: &Banner) {
        info!("{}: {}", banner.title, banner.message);
    }

    fn dismiss_banner(&self, _banner: &Banner) {}

    fn play_cue(&self, _cue: &ToneSequence) -> Result<(), SoundError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sound::MockSoundPlayer;
    use crate::types::SessionMode;

    #[test]
    fn test_terminal_sink_without_player_reports_device_error() {
        let sink = TerminalSink::new(None);
        assert!(!sink.has_audio());

        let result = sink.play_cue(&ToneSequence::rising_sweep());
        assert!(matches!(result, Err(SoundError::DeviceNotAvailable(_))));
    }

    #[test]
    fn test_terminal_sink_delegates_to_player() {
        let sink = TerminalSink::new(Some(Box::new(MockSoundPlayer::new())));
        assert!(sink.has_audio());
        assert!(sink.play_cue(&ToneSequence::rising_sweep()).is_ok());
    }

    #[test]
    fn test_terminal_sink_propagates_player_failure() {
        let player = MockSoundPlayer::new();
        player.set_should_fail(true);
        let sink = TerminalSink::new(Some(Box::new(player)));

        assert!(sink.play_cue(&ToneSequence::rising_sweep()).is_err());
    }

    #[test]
    fn test_silent_sink_never_fails() {
        let sink = SilentSink;
        let banner = Banner::for_completion(SessionMode::Work, SessionMode::ShortBreak);
        sink.show_banner(&banner);
        sink.dismiss_banner(&banner);
        assert!(sink.play_cue(&ToneSequence::rising_sweep()).is_ok());
    }
}
