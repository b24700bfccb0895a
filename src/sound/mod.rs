//! Sound playback for completion cues.
//!
//! This module provides audio notification capabilities, including:
//!
//! - Synthesized three-tone cues (no sound files involved)
//! - Non-blocking audio playback
//! - Graceful degradation when audio is unavailable
//!
//! # Usage
//!
//! ```rust,no_run
//! use stayontask::sound::{RodioSoundPlayer, ToneSequence};
//!
//! // Create a player (may fail if no audio device)
//! let player = RodioSoundPlayer::new().expect("audio init");
//!
//! // Play the work-complete sweep
//! player.play(&ToneSequence::rising_sweep()).expect("playback failed");
//! ```

mod cue;
mod error;
mod player;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

pub use cue::{Tone, ToneSequence};
pub use error::SoundError;
pub use player::{try_create_player, RodioSoundPlayer};

/// Something that can play a [`ToneSequence`].
///
/// Whether a cue should play at all is decided upstream by the
/// `soundEnabled` setting; a player only plays.
pub trait SoundPlayer {
    /// Starts playing `cue` without blocking.
    ///
    /// # Errors
    ///
    /// Returns an error if playback cannot be started.
    fn play(&self, cue: &ToneSequence) -> Result<(), SoundError>;
}

impl SoundPlayer for RodioSoundPlayer {
    fn play(&self, cue: &ToneSequence) -> Result<(), SoundError> {
        RodioSoundPlayer::play(self, cue)
    }
}

/// Shared players, so a caller can keep a handle to a player it hands off.
impl<P: SoundPlayer + ?Sized> SoundPlayer for Arc<P> {
    fn play(&self, cue: &ToneSequence) -> Result<(), SoundError> {
        (**self).play(cue)
    }
}

/// Mock sound player for testing.
#[derive(Debug, Default)]
pub struct MockSoundPlayer {
    play_calls: Mutex<Vec<ToneSequence>>,
    should_fail: AtomicBool,
}

impl MockSoundPlayer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    #[must_use]
    pub fn play_count(&self) -> usize {
        self.play_calls.lock().unwrap().len()
    }

    #[must_use]
    pub fn get_play_calls(&self) -> Vec<ToneSequence> {
        self.play_calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.play_calls.lock().unwrap().clear();
    }
}

impl SoundPlayer for MockSoundPlayer {
    fn play(&self, cue: &ToneSequence) -> Result<(), SoundError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(SoundError::PlaybackError("Mock failure".to_string()));
        }
        self.play_calls.lock().unwrap().push(cue.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_records_plays() {
        let player = MockSoundPlayer::new();
        player.play(&ToneSequence::rising_sweep()).unwrap();
        player.play(&ToneSequence::falling_sweep()).unwrap();

        assert_eq!(player.play_count(), 2);
        assert_eq!(player.get_play_calls()[1], ToneSequence::falling_sweep());

        player.clear_calls();
        assert_eq!(player.play_count(), 0);
    }

    #[test]
    fn test_mock_failure() {
        let player = MockSoundPlayer::new();
        player.set_should_fail(true);

        let result = player.play(&ToneSequence::rising_sweep());
        assert!(matches!(result, Err(SoundError::PlaybackError(_))));
        assert_eq!(player.play_count(), 0);
    }

    #[test]
    fn test_shared_player_records_through_arc() {
        let player = Arc::new(MockSoundPlayer::new());
        let boxed: Box<dyn SoundPlayer + Send> = Box::new(Arc::clone(&player));

        boxed.play(&ToneSequence::rising_sweep()).unwrap();

        assert_eq!(player.play_count(), 1);
    }
}
