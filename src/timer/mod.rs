//! Interval timer.
//!
//! - [`countdown`]: the seconds counter and its running flag
//! - [`sequencer`]: which mode follows a completed session
//! - [`scheduler`]: delayed and repeating wakeups
//! - [`controller`]: ties the above to notifications and settings

mod controller;
mod countdown;
mod scheduler;
mod sequencer;

pub use self::controller::{SessionController, AUTO_START_DELAY, TICK_PERIOD};
pub use self::countdown::{Countdown, CountdownError, TickOutcome};
pub use self::scheduler::{ManualScheduler, ScheduledAction, Scheduler, TokioScheduler, Wakeup};
pub use self::sequencer::{complete, long_break_is_next, Transition};
