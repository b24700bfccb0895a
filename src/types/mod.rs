//! Core data types for StayOnTask.
//!
//! This module defines the data structures used for:
//! - Session modes of the interval timer
//! - Timer settings with clamping rules
//! - Live timer state
//! - IPC request/response serialization

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::notification::Banner;
use crate::timer::Countdown;

// ============================================================================
// SessionMode
// ============================================================================

/// The kind of session the timer is counting down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionMode {
    /// Focused work session
    #[default]
    Work,
    /// Short break between work sessions
    ShortBreak,
    /// Long break after every `long_break_interval` work sessions
    LongBreak,
}

impl SessionMode {
    /// All modes, in cycle order.
    pub const ALL: [SessionMode; 3] = [
        SessionMode::Work,
        SessionMode::ShortBreak,
        SessionMode::LongBreak,
    ];

    /// Returns the string representation of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionMode::Work => "work",
            SessionMode::ShortBreak => "short_break",
            SessionMode::LongBreak => "long_break",
        }
    }

    /// Returns a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            SessionMode::Work => "Work",
            SessionMode::ShortBreak => "Short break",
            SessionMode::LongBreak => "Long break",
        }
    }

    /// Returns true for either kind of break.
    pub fn is_break(&self) -> bool {
        matches!(self, SessionMode::ShortBreak | SessionMode::LongBreak)
    }
}

impl fmt::Display for SessionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "work" | "focus" => Ok(SessionMode::Work),
            "short_break" | "short" | "break" => Ok(SessionMode::ShortBreak),
            "long_break" | "long" => Ok(SessionMode::LongBreak),
            other => Err(format!(
                "unknown mode '{other}' (expected work, short-break or long-break)"
            )),
        }
    }
}

// ============================================================================
// Settings
// ============================================================================

/// Default work duration in minutes.
pub const DEFAULT_WORK_MINUTES: u32 = 25;
/// Default short break duration in minutes.
pub const DEFAULT_SHORT_BREAK_MINUTES: u32 = 5;
/// Default long break duration in minutes.
pub const DEFAULT_LONG_BREAK_MINUTES: u32 = 15;
/// Default number of work sessions between long breaks.
pub const DEFAULT_LONG_BREAK_INTERVAL: u32 = 4;

/// Smallest accepted duration, in minutes.
pub const MIN_DURATION_MINUTES: u32 = 1;
/// Smallest accepted long-break interval.
pub const MIN_LONG_BREAK_INTERVAL: u32 = 2;

/// Configurable durations and behavior flags of the interval timer.
///
/// A `Settings` value handed out by the settings store always satisfies
/// its invariants: every duration is at least one minute and the long-break
/// interval is at least two. Use [`Settings::clamped`] to coerce arbitrary
/// input into that range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Work duration in minutes
    pub work_minutes: u32,
    /// Short break duration in minutes
    pub short_break_minutes: u32,
    /// Long break duration in minutes
    pub long_break_minutes: u32,
    /// Completed work sessions between long breaks
    pub long_break_interval: u32,
    /// Start breaks automatically when a work session completes
    pub auto_start_breaks: bool,
    /// Start work automatically when a break completes
    pub auto_start_work: bool,
    /// Play the audible cue on completion
    pub sound_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            work_minutes: DEFAULT_WORK_MINUTES,
            short_break_minutes: DEFAULT_SHORT_BREAK_MINUTES,
            long_break_minutes: DEFAULT_LONG_BREAK_MINUTES,
            long_break_interval: DEFAULT_LONG_BREAK_INTERVAL,
            auto_start_breaks: false,
            auto_start_work: false,
            sound_enabled: true,
        }
    }
}

impl Settings {
    /// Creates settings with the specified work duration.
    pub fn with_work_minutes(mut self, minutes: u32) -> Self {
        self.work_minutes = minutes;
        self
    }

    /// Creates settings with the specified short break duration.
    pub fn with_short_break_minutes(mut self, minutes: u32) -> Self {
        self.short_break_minutes = minutes;
        self
    }

    /// Creates settings with the specified long break duration.
    pub fn with_long_break_minutes(mut self, minutes: u32) -> Self {
        self.long_break_minutes = minutes;
        self
    }

    /// Creates settings with the specified long break interval.
    pub fn with_long_break_interval(mut self, interval: u32) -> Self {
        self.long_break_interval = interval;
        self
    }

    /// Returns the configured duration of `mode` in minutes.
    pub fn minutes_for(&self, mode: SessionMode) -> u32 {
        match mode {
            SessionMode::Work => self.work_minutes,
            SessionMode::ShortBreak => self.short_break_minutes,
            SessionMode::LongBreak => self.long_break_minutes,
        }
    }

    /// Returns the configured duration of `mode` in seconds.
    pub fn duration_secs(&self, mode: SessionMode) -> u32 {
        self.minutes_for(mode).saturating_mul(60)
    }

    /// Returns whether entering `mode` after a completion starts it automatically.
    pub fn auto_starts(&self, mode: SessionMode) -> bool {
        if mode.is_break() {
            self.auto_start_breaks
        } else {
            self.auto_start_work
        }
    }

    /// Coerces every field into its valid range.
    pub fn clamped(self) -> Self {
        Self {
            work_minutes: self.work_minutes.max(MIN_DURATION_MINUTES),
            short_break_minutes: self.short_break_minutes.max(MIN_DURATION_MINUTES),
            long_break_minutes: self.long_break_minutes.max(MIN_DURATION_MINUTES),
            long_break_interval: self.long_break_interval.max(MIN_LONG_BREAK_INTERVAL),
            ..self
        }
    }

    /// Applies a partial update on top of these settings and clamps the result.
    pub fn merge(self, patch: &SettingsPatch) -> Self {
        Self {
            work_minutes: patch
                .work_minutes
                .map_or(self.work_minutes, |v| clamp_to(v, MIN_DURATION_MINUTES)),
            short_break_minutes: patch
                .short_break_minutes
                .map_or(self.short_break_minutes, |v| clamp_to(v, MIN_DURATION_MINUTES)),
            long_break_minutes: patch
                .long_break_minutes
                .map_or(self.long_break_minutes, |v| clamp_to(v, MIN_DURATION_MINUTES)),
            long_break_interval: patch
                .long_break_interval
                .map_or(self.long_break_interval, |v| clamp_to(v, MIN_LONG_BREAK_INTERVAL)),
            auto_start_breaks: patch.auto_start_breaks.unwrap_or(self.auto_start_breaks),
            auto_start_work: patch.auto_start_work.unwrap_or(self.auto_start_work),
            sound_enabled: patch.sound_enabled.unwrap_or(self.sound_enabled),
        }
        .clamped()
    }
}

/// Clamps a signed value into `[min, u32::MAX]`.
pub(crate) fn clamp_to(value: i64, min: u32) -> u32 {
    u32::try_from(value.max(i64::from(min))).unwrap_or(u32::MAX)
}

/// A partial settings update, as received from the CLI or IPC.
///
/// Integer fields are signed so that out-of-range input (zero or negative)
/// can be clamped instead of rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_minutes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_break_minutes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_break_minutes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_break_interval: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_start_breaks: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_start_work: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sound_enabled: Option<bool>,
}

impl SettingsPatch {
    /// Returns true if the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

// ============================================================================
// TimerState
// ============================================================================

/// The live state of the interval timer.
///
/// Only the session controller mutates this; everything else reads it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerState {
    /// Current session mode
    pub(crate) mode: SessionMode,
    /// Countdown of the current session
    pub(crate) countdown: Countdown,
    /// Work sessions completed since the last count reset
    pub(crate) completed_work_sessions: u32,
}

impl TimerState {
    /// Creates the initial state: a stopped, full-length work session.
    pub fn new(settings: &Settings) -> Self {
        Self {
            mode: SessionMode::Work,
            countdown: Countdown::new(settings.duration_secs(SessionMode::Work)),
            completed_work_sessions: 0,
        }
    }

    /// Returns the current session mode.
    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    /// Returns the seconds left in the current session.
    pub fn remaining_seconds(&self) -> u32 {
        self.countdown.remaining_seconds()
    }

    /// Returns true while the countdown is advancing.
    pub fn is_running(&self) -> bool {
        self.countdown.is_running()
    }

    /// Returns the number of completed work sessions.
    pub fn completed_work_sessions(&self) -> u32 {
        self.completed_work_sessions
    }
}

// ============================================================================
// IPC Types
// ============================================================================

/// IPC request from client to daemon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum IpcRequest {
    /// Start (or continue) the countdown
    Start,
    /// Pause the countdown
    Pause,
    /// Restart the current session from its full duration
    Reset,
    /// Zero the work-session counter and return to a fresh work session
    ResetCount,
    /// Switch to another mode manually
    Switch {
        /// Target mode
        mode: SessionMode,
    },
    /// Query the current status
    Status,
    /// Query the current settings
    Settings,
    /// Apply a partial settings update
    ApplySettings {
        /// Fields to change
        #[serde(flatten)]
        patch: SettingsPatch,
    },
}

/// Response data for IPC responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseData {
    /// Current mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<SessionMode>,
    /// Remaining seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_seconds: Option<u32>,
    /// Whether the countdown is running
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_running: Option<bool>,
    /// Completed work sessions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_work_sessions: Option<u32>,
    /// Current settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<Settings>,
    /// Completion banner currently on screen
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner: Option<Banner>,
}

impl ResponseData {
    /// Creates response data from timer state.
    pub fn from_timer_state(state: &TimerState) -> Self {
        Self {
            mode: Some(state.mode()),
            remaining_seconds: Some(state.remaining_seconds()),
            is_running: Some(state.is_running()),
            completed_work_sessions: Some(state.completed_work_sessions()),
            ..Self::default()
        }
    }

    /// Attaches the current settings.
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Attaches the visible banner, if any.
    pub fn with_banner(mut self, banner: Option<Banner>) -> Self {
        self.banner = banner;
        self
    }
}

/// IPC response from daemon to client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpcResponse {
    /// Response status ("success" or "error")
    pub status: String,
    /// Human-readable message
    pub message: String,
    /// Optional response data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ResponseData>,
}

impl IpcResponse {
    /// Creates a success response.
    pub fn success(message: impl Into<String>, data: Option<ResponseData>) -> Self {
        Self {
            status: "success".to_string(),
            message: message.into(),
            data,
        }
    }

    /// Creates an error response.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
            data: None,
        }
    }

    /// Returns true if this is a success response.
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

// ============================================================================
// Tests
// ============================================================================
