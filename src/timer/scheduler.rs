//! Schedulers for ticks and delayed actions.
//!
//! The session controller never sleeps or spawns anything itself. It asks a
//! [`Scheduler`] to deliver a [`Wakeup`] later and reacts when one arrives.
//! Every schedule carries a generation number; a wakeup whose generation no
//! longer matches (because the action was cancelled or replaced) is stale and
//! is rejected by [`Scheduler::acknowledge`].
//!
//! - [`TokioScheduler`]: real timers backed by tokio tasks
//! - [`ManualScheduler`]: records schedules so tests can fire them by hand

use std::collections::HashMap;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, sleep, Duration, Instant, MissedTickBehavior};
use tracing::debug;

// ============================================================================
// ScheduledAction / Wakeup
// ============================================================================

/// The callbacks the session controller can have pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScheduledAction {
    /// Periodic countdown tick
    Tick,
    /// Delayed start of the next session
    AutoStart,
    /// Self-dismissal of the completion banner
    BannerDismiss,
}

/// A fired callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wakeup {
    /// Which action fired
    pub action: ScheduledAction,
    /// Generation of the schedule that produced it
    pub generation: u64,
}

// ============================================================================
// Scheduler
// ============================================================================

/// Source of ticks and delayed callbacks.
///
/// Scheduling an action that is already pending replaces it, so there is at
/// most one pending callback per [`ScheduledAction`].
pub trait Scheduler {
    /// Fires `action` every `period`, first after one period.
    fn schedule_repeating(&mut self, action: ScheduledAction, period: Duration);

    /// Fires `action` once after `delay`.
    fn schedule_once(&mut self, action: ScheduledAction, delay: Duration);

    /// Cancels `action` if pending.
    fn cancel(&mut self, action: ScheduledAction);

    /// Cancels every pending action.
    fn cancel_all(&mut self);

    /// Returns true if `action` is pending.
    fn is_scheduled(&self, action: ScheduledAction) -> bool;

    /// Accepts a fired wakeup.
    ///
    /// Returns false for stale wakeups. One-shot actions stop being pending
    /// once acknowledged.
    fn acknowledge(&mut self, wakeup: Wakeup) -> bool;
}

/// Generation bookkeeping shared by the scheduler implementations.
#[derive(Debug, Default)]
struct ScheduleTable {
    next_generation: u64,
    entries: HashMap<ScheduledAction, Entry>,
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    generation: u64,
    repeating: bool,
    period: Duration,
}

impl ScheduleTable {
    fn insert(&mut self, action: ScheduledAction, repeating: bool, period: Duration) -> Wakeup {
        self.next_generation += 1;
        let generation = self.next_generation;
        self.entries.insert(
            action,
            Entry {
                generation,
                repeating,
                period,
            },
        );
        Wakeup { action, generation }
    }

    fn remove(&mut self, action: ScheduledAction) -> bool {
        self.entries.remove(&action).is_some()
    }

    fn clear(&mut self) {
        self.entries.clear();
    }

    fn contains(&self, action: ScheduledAction) -> bool {
        self.entries.contains_key(&action)
    }

    fn get(&self, action: ScheduledAction) -> Option<&Entry> {
        self.entries.get(&action)
    }

    fn acknowledge(&mut self, wakeup: Wakeup) -> bool {
        match self.entries.get(&wakeup.action) {
            Some(entry) if entry.generation == wakeup.generation => {
                if !entry.repeating {
                    self.entries.remove(&wakeup.action);
                }
                true
            }
            _ => false,
        }
    }
}

// ============================================================================
// TokioScheduler
// ============================================================================

/// Scheduler backed by tokio tasks.
///
/// Wakeups are delivered on the receiver returned by [`TokioScheduler::new`].
/// Dropping the scheduler aborts every pending task.
///
/// Scheduling must happen inside a tokio runtime.
#[derive(Debug)]
pub struct TokioScheduler {
    table: ScheduleTable,
    handles: HashMap<ScheduledAction, JoinHandle<()>>,
    wakeup_tx: mpsc::UnboundedSender<Wakeup>,
}

impl TokioScheduler {
    /// Creates a scheduler and the channel its wakeups arrive on.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Wakeup>) {
        let (wakeup_tx, wakeup_rx) = mpsc::unbounded_channel();
        let scheduler = Self {
            table: ScheduleTable::default(),
            handles: HashMap::new(),
            wakeup_tx,
        };
        (scheduler, wakeup_rx)
    }

    fn abort(&mut self, action: ScheduledAction) {
        if let Some(handle) = self.handles.remove(&action) {
            handle.abort();
        }
    }
}

impl Scheduler for TokioScheduler {
    fn schedule_repeating(&mut self, action: ScheduledAction, period: Duration) {
        self.abort(action);
        let wakeup = self.table.insert(action, true, period);
        let tx = self.wakeup_tx.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                if tx.send(wakeup).is_err() {
                    break;
                }
            }
        });

        debug!(?action, generation = wakeup.generation, "Scheduled repeating action");
        self.handles.insert(action, handle);
    }

    fn schedule_once(&mut self, action: ScheduledAction, delay: Duration) {
        self.abort(action);
        let wakeup = self.table.insert(action, false, delay);
        let tx = self.wakeup_tx.clone();

        let handle = tokio::spawn(async move {
            sleep(delay).await;
            let _ = tx.send(wakeup);
        });

        debug!(?action, generation = wakeup.generation, "Scheduled one-shot action");
        self.handles.insert(action, handle);
    }

    fn cancel(&mut self, action: ScheduledAction) {
        self.abort(action);
        if self.table.remove(action) {
            debug!(?action, "Cancelled action");
        }
    }

    fn cancel_all(&mut self) {
        for (_, handle) in self.handles.drain() {
            handle.abort();
        }
        self.table.clear();
    }

    fn is_scheduled(&self, action: ScheduledAction) -> bool {
        self.table.contains(action)
    }

    fn acknowledge(&mut self, wakeup: Wakeup) -> bool {
        let accepted = self.table.acknowledge(wakeup);
        if accepted && !self.table.contains(wakeup.action) {
            // One-shot finished; its task has already exited.
            self.handles.remove(&wakeup.action);
        }
        accepted
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

// ============================================================================
// ManualScheduler
// ============================================================================

/// Scheduler that never fires on its own.
///
/// Tests inspect what is pending and fire it explicitly with
/// [`ManualScheduler::pending`], which makes timer behavior deterministic.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    table: ScheduleTable,
    schedule_counts: HashMap<ScheduledAction, usize>,
}

impl ManualScheduler {
    /// Creates an empty manual scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the wakeup that `action` would deliver, if pending.
    pub fn pending(&self, action: ScheduledAction) -> Option<Wakeup> {
        self.table.get(action).map(|entry| Wakeup {
            action,
            generation: entry.generation,
        })
    }

    /// Returns the period or delay `action` was scheduled with.
    pub fn delay_of(&self, action: ScheduledAction) -> Option<Duration> {
        self.table.get(action).map(|entry| entry.period)
    }

    /// Returns how many times `action` has been scheduled in total.
    pub fn schedule_count(&self, action: ScheduledAction) -> usize {
        self.schedule_counts.get(&action).copied().unwrap_or(0)
    }

    fn record(&mut self, action: ScheduledAction) {
        *self.schedule_counts.entry(action).or_default() += 1;
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_repeating(&mut self, action: ScheduledAction, period: Duration) {
        self.record(action);
        self.table.insert(action, true, period);
    }

    fn schedule_once(&mut self, action: ScheduledAction, delay: Duration) {
        self.record(action);
        self.table.insert(action, false, delay);
    }

    fn cancel(&mut self, action: ScheduledAction) {
        self.table.remove(action);
    }

    fn cancel_all(&mut self) {
        self.table.clear();
    }

    fn is_scheduled(&self, action: ScheduledAction) -> bool {
        self.table.contains(action)
    }

    fn acknowledge(&mut self, wakeup: Wakeup) -> bool {
        self.table.acknowledge(wakeup)
    }
}

// ============================================================================
// Tests
// ============================================================================
