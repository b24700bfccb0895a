//! Countdown engine.
//!
//! Owns the seconds remaining in the current session and the running flag.
//! It is tick-count driven: one call to [`Countdown::tick`] is one second of
//! countdown, regardless of how much wall-clock time actually passed.

use thiserror::Error;

/// Errors raised by the countdown engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CountdownError {
    /// The duration cannot be replaced while the countdown is running.
    #[error("cannot set duration to {requested}s while the countdown is running")]
    Running {
        /// The rejected duration in seconds
        requested: u32,
    },
}

/// Result of a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The countdown was not running, nothing changed
    Idle,
    /// One second elapsed
    Ticked {
        /// Seconds left after this tick
        remaining_seconds: u32,
    },
    /// The countdown reached zero and stopped
    Completed,
}

/// Seconds remaining and the running flag of one session.
///
/// Invariant: `running` is false whenever `remaining_seconds == 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    remaining_seconds: u32,
    running: bool,
}

impl Countdown {
    /// Creates a stopped countdown of `seconds`.
    pub fn new(seconds: u32) -> Self {
        Self {
            remaining_seconds: seconds,
            running: false,
        }
    }

    /// Returns the seconds left.
    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    /// Returns true while the countdown is advancing.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Starts the countdown. Returns false (and does nothing) at zero.
    pub fn start(&mut self) -> bool {
        if self.remaining_seconds == 0 {
            return false;
        }
        self.running = true;
        true
    }

    /// Stops the countdown. Returns true if it was running.
    pub fn pause(&mut self) -> bool {
        std::mem::replace(&mut self.running, false)
    }

    /// Advances the countdown by one second.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.running || self.remaining_seconds == 0 {
            return TickOutcome::Idle;
        }

        self.remaining_seconds -= 1;
        if self.remaining_seconds == 0 {
            self.running = false;
            TickOutcome::Completed
        } else {
            TickOutcome::Ticked {
                remaining_seconds: self.remaining_seconds,
            }
        }
    }

    /// Overwrites the remaining time. Only allowed while stopped.
    ///
    /// # Errors
    ///
    /// Returns [`CountdownError::Running`] if the countdown is running; the
    /// remaining time is left untouched.
    pub fn set_duration(&mut self, seconds: u32) -> Result<(), CountdownError> {
        if self.running {
            return Err(CountdownError::Running { requested: seconds });
        }
        self.remaining_seconds = seconds;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_stopped() {
        let countdown = Countdown::new(60);
        assert_eq!(countdown.remaining_seconds(), 60);
        assert!(!countdown.is_running());
    }

    #[test]
    fn test_tick_while_stopped_is_idle() {
        let mut countdown = Countdown::new(60);
        assert_eq!(countdown.tick(), TickOutcome::Idle);
        assert_eq!(countdown.remaining_seconds(), 60);
    }

    #[test]
    fn test_tick_decrements() {
        let mut countdown = Countdown::new(60);
        countdown.start();

        assert_eq!(
            countdown.tick(),
            TickOutcome::Ticked {
                remaining_seconds: 59
            }
        );
        assert!(countdown.is_running());
    }

    #[test]
    fn test_tick_to_zero_completes_and_stops() {
        let mut countdown = Countdown::new(2);
        countdown.start();

        countdown.tick();
        assert_eq!(countdown.tick(), TickOutcome::Completed);
        assert_eq!(countdown.remaining_seconds(), 0);
        assert!(!countdown.is_running());

        // Completion is signalled exactly once
        assert_eq!(countdown.tick(), TickOutcome::Idle);
    }

    #[test]
    fn test_start_at_zero_is_noop() {
        let mut countdown = Countdown::new(0);
        assert!(!countdown.start());
        assert!(!countdown.start());
        assert!(!countdown.is_running());
    }

    #[test]
    fn test_pause_is_idempotent() {
        let mut countdown = Countdown::new(10);
        countdown.start();

        assert!(countdown.pause());
        assert!(!countdown.pause());
        assert!(!countdown.is_running());
        assert_eq!(countdown.remaining_seconds(), 10);
    }

    #[test]
    fn test_set_duration_while_stopped() {
        let mut countdown = Countdown::new(10);
        assert!(countdown.set_duration(300).is_ok());
        assert_eq!(countdown.remaining_seconds(), 300);
    }

    #[test]
    fn test_set_duration_while_running_is_rejected() {
        let mut countdown = Countdown::new(10);
        countdown.start();

        let result = countdown.set_duration(300);

        assert_eq!(result, Err(CountdownError::Running { requested: 300 }));
        assert_eq!(countdown.remaining_seconds(), 10);
        assert!(countdown.is_running());
    }
}
