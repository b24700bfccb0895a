//! Sound player implementation using rodio.
//!
//! Cues are synthesized from sine waves and rendered on a short-lived
//! background thread, so `play` never blocks the timer.

use std::thread;

use rodio::source::SineWave;
use rodio::{OutputStream, Sink, Source};
use tracing::{debug, warn};

use super::cue::ToneSequence;
use super::error::SoundError;

/// A sound player that uses rodio for audio playback.
///
/// The output stream is opened per cue on the playback thread, so the
/// player holds no audio handles and can be shared freely.
#[derive(Debug)]
pub struct RodioSoundPlayer {
    _private: (),
}

impl RodioSoundPlayer {
    /// Creates a player after checking that an output device exists.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::DeviceNotAvailable` if no audio output device
    /// is available.
    pub fn new() -> Result<Self, SoundError> {
        let (stream, _handle) = OutputStream::try_default()
            .map_err(|e| SoundError::DeviceNotAvailable(e.to_string()))?;
        drop(stream);

        debug!("Audio output device detected");
        Ok(Self { _private: () })
    }

    /// Plays a cue in the background.
    ///
    /// Device failures on the playback thread are logged, not returned.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::PlaybackError` if the playback thread cannot be
    /// spawned.
    pub fn play(&self, cue: &ToneSequence) -> Result<(), SoundError> {
        let cue = cue.clone();
        thread::Builder::new()
            .name("stayontask-cue".to_string())
            .spawn(move || {
                if let Err(e) = render(&cue) {
                    warn!("Failed to play completion cue: {} ({})", e, e.suggestion());
                }
            })
            .map_err(|e| SoundError::PlaybackError(e.to_string()))?;

        debug!("Cue playback started");
        Ok(())
    }
}

/// Opens the default output and plays `cue` to the end.
fn render(cue: &ToneSequence) -> Result<(), SoundError> {
    let (_stream, handle) = OutputStream::try_default()
        .map_err(|e| SoundError::DeviceNotAvailable(e.to_string()))?;
    let sink = Sink::try_new(&handle).map_err(|e| SoundError::StreamError(e.to_string()))?;

    for tone in cue.tones() {
        sink.append(
            SineWave::new(tone.frequency_hz)
                .take_duration(tone.duration)
                .amplify(cue.volume()),
        );
    }

    sink.sleep_until_end();
    Ok(())
}

/// Creates a sound player, returning None if audio is unavailable.
///
/// If audio initialization fails, a warning is logged and None is returned.
#[must_use]
pub fn try_create_player() -> Option<RodioSoundPlayer> {
    match RodioSoundPlayer::new() {
        Ok(player) => Some(player),
        Err(e) => {
            warn!("Audio not available, sound disabled: {}", e);
            None
        }
    }
}
