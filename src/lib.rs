//! stayontask library
//!
//! A task list with a kanban board, and a work/break interval timer that
//! runs in a small daemon. It includes:
//! - Session controller, countdown, mode sequencer and schedulers
//! - Settings persisted in a flat key-value file
//! - Completion banners and synthesized audio cues
//! - IPC server/client for daemon-CLI communication
//! - Task store and kanban board
//! - CLI command parsing and display utilities

pub mod cli;
pub mod daemon;
pub mod notification;
pub mod paths;
pub mod settings;
pub mod sound;
pub mod tasks;
pub mod timer;
pub mod types;

// Re-export commonly used types for convenience
pub use types::{
    IpcRequest, IpcResponse, ResponseData, SessionMode, Settings, SettingsPatch, TimerState,
};

pub use notification::{
    Banner, MockNotificationSink, NotificationDispatcher, NotificationSink, SilentSink,
    TerminalSink,
};

pub use settings::{
    FileKeyValueStore, KeyValueStore, MemoryKeyValueStore, SettingsStore, StorageError,
};

pub use sound::{MockSoundPlayer, RodioSoundPlayer, SoundError, SoundPlayer, ToneSequence};

pub use tasks::{
    apply_drop, Board, JsonTaskStore, MemoryTaskStore, NewTask, Priority, Task, TaskError,
    TaskStatus, TaskStore,
};

pub use timer::{ManualScheduler, ScheduledAction, Scheduler, SessionController, TokioScheduler};
