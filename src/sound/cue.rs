//! Synthesized completion cues.
//!
//! The cue is a short sweep of three sine tones. Work completion sweeps up,
//! break completion sweeps down.

use std::time::Duration;

use crate::types::SessionMode;

/// C5
const TONE_LOW_HZ: f32 = 523.25;
/// E5
const TONE_MID_HZ: f32 = 659.25;
/// G5
const TONE_HIGH_HZ: f32 = 783.99;

/// Length of each tone in the sweep.
const TONE_DURATION: Duration = Duration::from_millis(150);

/// Output amplitude applied to every tone.
const DEFAULT_VOLUME: f32 = 0.3;

/// A single sine tone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    /// Frequency in hertz
    pub frequency_hz: f32,
    /// How long the tone plays
    pub duration: Duration,
}

/// A sequence of tones played back to back.
#[derive(Debug, Clone, PartialEq)]
pub struct ToneSequence {
    tones: Vec<Tone>,
    volume: f32,
}

impl ToneSequence {
    /// Creates a sequence from explicit tones.
    pub fn new(tones: Vec<Tone>) -> Self {
        Self {
            tones,
            volume: DEFAULT_VOLUME,
        }
    }

    /// Three ascending tones.
    pub fn rising_sweep() -> Self {
        Self::from_frequencies(&[TONE_LOW_HZ, TONE_MID_HZ, TONE_HIGH_HZ])
    }

    /// Three descending tones.
    pub fn falling_sweep() -> Self {
        Self::from_frequencies(&[TONE_HIGH_HZ, TONE_MID_HZ, TONE_LOW_HZ])
    }

    /// The cue played when a session of `completed` mode ends.
    pub fn for_completion(completed: SessionMode) -> Self {
        if completed.is_break() {
            Self::falling_sweep()
        } else {
            Self::rising_sweep()
        }
    }

    fn from_frequencies(frequencies: &[f32]) -> Self {
        Self::new(
            frequencies
                .iter()
                .map(|&frequency_hz| Tone {
                    frequency_hz,
                    duration: TONE_DURATION,
                })
                .collect(),
        )
    }

    /// Sets the playback volume (clamped to `0.0..=1.0`).
    #[must_use]
    pub fn with_volume(mut self, volume: f32) -> Self {
        self.volume = volume.clamp(0.0, 1.0);
        self
    }

    /// Returns the tones in playback order.
    pub fn tones(&self) -> &[Tone] {
        &self.tones
    }

    /// Returns the playback volume.
    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Returns the total playback time.
    pub fn total_duration(&self) -> Duration {
        self.tones.iter().map(|tone| tone.duration).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rising_sweep_has_three_ascending_tones() {
        let cue = ToneSequence::rising_sweep();
        let freqs: Vec<f32> = cue.tones().iter().map(|t| t.frequency_hz).collect();

        assert_eq!(freqs.len(), 3);
        assert!(freqs.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_falling_sweep_is_reverse_of_rising() {
        let mut rising = ToneSequence::rising_sweep().tones().to_vec();
        rising.reverse();
        assert_eq!(ToneSequence::falling_sweep().tones(), rising.as_slice());
    }

    #[test]
    fn test_for_completion() {
        assert_eq!(
            ToneSequence::for_completion(SessionMode::Work),
            ToneSequence::rising_sweep()
        );
        assert_eq!(
            ToneSequence::for_completion(SessionMode::LongBreak),
            ToneSequence::falling_sweep()
        );
    }

    #[test]
    fn test_total_duration() {
        assert_eq!(
            ToneSequence::rising_sweep().total_duration(),
            Duration::from_millis(450)
        );
    }

    #[test]
    fn test_volume_is_clamped() {
        assert_eq!(ToneSequence::rising_sweep().with_volume(4.0).volume(), 1.0);
        assert_eq!(ToneSequence::rising_sweep().with_volume(-1.0).volume(), 0.0);
    }
}
