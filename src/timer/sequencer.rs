//! Mode sequencer.
//!
//! A finite-state machine over [`SessionMode`] that decides which mode
//! follows a completed session.
//!
//! ```text
//!            completed % interval != 0
//!   ┌──────┐ ─────────────────────────▶ ┌────────────┐
//!   │ Work │                            │ ShortBreak │
//!   └──────┘ ◀───────────────────────── └────────────┘
//!     │  ▲
//!     │  │ completed % interval == 0    ┌───────────┐
//!     │  └───────────────────────────── │ LongBreak │
//!     └───────────────────────────────▶ └───────────┘
//! ```
//!
//! The counter is incremented before the check, so with an interval of
//! four the 4th, 8th, 12th... completed work session leads to a long break.

use crate::types::SessionMode;

/// The outcome of completing a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// The mode that was completed
    pub completed: SessionMode,
    /// The mode to enter next
    pub next: SessionMode,
    /// The work-session counter after the transition
    pub completed_work_sessions: u32,
}

/// Computes the transition that follows completing `mode`.
///
/// `long_break_interval` values below 1 are treated as 1.
pub fn complete(
    mode: SessionMode,
    completed_work_sessions: u32,
    long_break_interval: u32,
) -> Transition {
    match mode {
        SessionMode::Work => Transition {
            completed: mode,
            next: if long_break_is_next(completed_work_sessions, long_break_interval) {
                SessionMode::LongBreak
            } else {
                SessionMode::ShortBreak
            },
            completed_work_sessions: completed_work_sessions.saturating_add(1),
        },
        SessionMode::ShortBreak | SessionMode::LongBreak => Transition {
            completed: mode,
            next: SessionMode::Work,
            completed_work_sessions,
        },
    }
}

/// Returns true if the next completed work session will be followed by a long break.
///
/// `long_break_interval` values below 1 are treated as 1.
pub fn long_break_is_next(completed_work_sessions: u32, long_break_interval: u32) -> bool {
    completed_work_sessions.saturating_add(1) % long_break_interval.max(1) == 0
}
