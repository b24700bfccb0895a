//! Settings store.
//!
//! Loads and persists [`Settings`] through a flat [`KeyValueStore`]. Every
//! field lives under its own key as a decimal or boolean string:
//!
//! | key                  | field                  |
//! |----------------------|------------------------|
//! | `workDuration`       | `work_minutes`         |
//! | `shortBreakDuration` | `short_break_minutes`  |
//! | `longBreakDuration`  | `long_break_minutes`   |
//! | `longBreakInterval`  | `long_break_interval`  |
//! | `autoStartBreaks`    | `auto_start_breaks`    |
//! | `autoStartWork`      | `auto_start_work`      |
//! | `soundEnabled`       | `sound_enabled`        |
//!
//! A missing or unparseable key falls back to that field's default; a
//! parseable but out-of-range number is clamped. Neither ever fails the
//! whole record.

mod error;
mod store;

use tracing::{debug, warn};

pub use self::error::StorageError;
pub use self::store::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};
pub(crate) use self::store::write_atomic;

use crate::types::{clamp_to, Settings, MIN_DURATION_MINUTES, MIN_LONG_BREAK_INTERVAL};

/// Storage keys for each settings field.
pub mod keys {
    pub const WORK_DURATION: &str = "workDuration";
    pub const SHORT_BREAK_DURATION: &str = "shortBreakDuration";
    pub const LONG_BREAK_DURATION: &str = "longBreakDuration";
    pub const LONG_BREAK_INTERVAL: &str = "longBreakInterval";
    pub const AUTO_START_BREAKS: &str = "autoStartBreaks";
    pub const AUTO_START_WORK: &str = "autoStartWork";
    pub const SOUND_ENABLED: &str = "soundEnabled";
}

/// Owns the persisted settings record.
pub struct SettingsStore {
    kv: Box<dyn KeyValueStore + Send>,
}

impl SettingsStore {
    /// Creates a settings store on top of `kv`.
    pub fn new(kv: impl KeyValueStore + Send + 'static) -> Self {
        Self { kv: Box::new(kv) }
    }

    /// Returns the persisted settings, substituting defaults field by field.
    pub fn load(&self) -> Settings {
        let defaults = Settings::default();

        Settings {
            work_minutes: self.read_number(
                keys::WORK_DURATION,
                defaults.work_minutes,
                MIN_DURATION_MINUTES,
            ),
            short_break_minutes: self.read_number(
                keys::SHORT_BREAK_DURATION,
                defaults.short_break_minutes,
                MIN_DURATION_MINUTES,
            ),
            long_break_minutes: self.read_number(
                keys::LONG_BREAK_DURATION,
                defaults.long_break_minutes,
                MIN_DURATION_MINUTES,
            ),
            long_break_interval: self.read_number(
                keys::LONG_BREAK_INTERVAL,
                defaults.long_break_interval,
                MIN_LONG_BREAK_INTERVAL,
            ),
            auto_start_breaks: self.read_flag(keys::AUTO_START_BREAKS, defaults.auto_start_breaks),
            auto_start_work: self.read_flag(keys::AUTO_START_WORK, defaults.auto_start_work),
            sound_enabled: self.read_flag(keys::SOUND_ENABLED, defaults.sound_enabled),
        }
    }

    /// Clamps `settings`, persists the result as one batch and returns it.
    ///
    /// A failed write is logged; the clamped settings are returned either way.
    pub fn apply(&mut self, settings: Settings) -> Settings {
        let settings = settings.clamped();

        let entries = [
            (keys::WORK_DURATION, settings.work_minutes.to_string()),
            (keys::SHORT_BREAK_DURATION, settings.short_break_minutes.to_string()),
            (keys::LONG_BREAK_DURATION, settings.long_break_minutes.to_string()),
            (keys::LONG_BREAK_INTERVAL, settings.long_break_interval.to_string()),
            (keys::AUTO_START_BREAKS, settings.auto_start_breaks.to_string()),
            (keys::AUTO_START_WORK, settings.auto_start_work.to_string()),
            (keys::SOUND_ENABLED, settings.sound_enabled.to_string()),
        ];

        match self.kv.set_many(&entries) {
            Ok(()) => debug!(?settings, "Settings persisted"),
            Err(e) => warn!("Failed to persist settings: {}", e),
        }

        settings
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.kv.get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!("Failed to read setting '{}': {}", key, e);
                None
            }
        }
    }

    fn read_number(&self, key: &str, default: u32, min: u32) -> u32 {
        let Some(raw) = self.read(key) else {
            return default;
        };

        match raw.trim().parse::<i64>() {
            Ok(value) => clamp_to(value, min),
            Err(_) => {
                debug!("Ignoring unparseable setting {}={:?}", key, raw);
                default
            }
        }
    }

    fn read_flag(&self, key: &str, default: bool) -> bool {
        let Some(raw) = self.read(key) else {
            return default;
        };

        match raw.trim().to_ascii_lowercase().as_str() {
            "true" => true,
            "false" => false,
            _ => {
                debug!("Ignoring unparseable setting {}={:?}", key, raw);
                default
            }
        }
    }
}

impl std::fmt::Debug for SettingsStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsStore").finish_non_exhaustive()
    }
}
