//! Display utilities for the stayontask CLI.
//!
//! Every `format_*` function returns the text; the matching `show_*`
//! prints it.

use std::fmt::Write as _;

use chrono::{Local, NaiveDate};

use crate::tasks::{Board, Priority, Task};
use crate::timer::long_break_is_next;
use crate::types::{IpcResponse, ResponseData, SessionMode, Settings};

// ============================================================================
// Display
// ============================================================================

/// Appended to tasks whose due date has passed.
const OVERDUE_MARKER: &str = " (overdue)";

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    // ------------------------------------------------------------------------
    // Timer
    // ------------------------------------------------------------------------

    /// Shows the outcome of a timer command.
    pub fn show_command_result(response: &IpcResponse) {
        print!("{}", Self::format_command_result(response));
    }

    pub fn format_command_result(response: &IpcResponse) -> String {
        let mut out = String::new();
        let running = response
            .data
            .as_ref()
            .and_then(|d| d.is_running)
            .unwrap_or(false);
        let prefix = if running { ">" } else { "||" };

        let _ = writeln!(out, "{} {}", prefix, response.message);
        if let Some(data) = &response.data {
            if let (Some(mode), Some(remaining)) = (data.mode, data.remaining_seconds) {
                let _ = writeln!(out, "  {} {}", mode.label(), Self::format_time(remaining));
            }
        }
        out
    }

    /// Shows the timer status.
    pub fn show_status(response: &IpcResponse) {
        print!("{}", Self::format_status(response));
    }

    pub fn format_status(response: &IpcResponse) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Timer status");
        let _ = writeln!(out, "------------");

        let Some(data) = &response.data else {
            let _ = writeln!(out, "No status available");
            return out;
        };

        Self::write_timer_lines(&mut out, data);

        if let Some(banner) = &data.banner {
            let _ = writeln!(out, "* {} - {}", banner.title, banner.message);
        }
        out
    }

    fn write_timer_lines(out: &mut String, data: &ResponseData) {
        if let Some(mode) = data.mode {
            let _ = writeln!(out, "Mode:      {}", mode.label());
        }
        if let Some(remaining) = data.remaining_seconds {
            let _ = writeln!(out, "Remaining: {}", Self::format_time(remaining));
        }
        if let Some(running) = data.is_running {
            let _ = writeln!(
                out,
                "State:     {}",
                if running { "running" } else { "paused" }
            );
        }
        if let Some(count) = data.completed_work_sessions {
            let _ = write!(out, "Completed: {}", count);
            if let Some(settings) = data.settings {
                let _ = write!(
                    out,
                    " (long break every {})",
                    settings.long_break_interval
                );
            }
            let _ = writeln!(out);

            if let Some(settings) = data.settings {
                let next_break = if long_break_is_next(count, settings.long_break_interval) {
                    SessionMode::LongBreak
                } else {
                    SessionMode::ShortBreak
                };
                let _ = writeln!(out, "Next break: {}", next_break.label());
            }
        }
    }

    /// Shows the timer settings.
    pub fn show_settings(settings: &Settings) {
        print!("{}", Self::format_settings(settings));
    }

    pub fn format_settings(settings: &Settings) -> String {
        let on_off = |b: bool| if b { "on" } else { "off" };
        let mut out = String::new();
        let _ = writeln!(out, "Work:               {} min", settings.work_minutes);
        let _ = writeln!(out, "Short break:        {} min", settings.short_break_minutes);
        let _ = writeln!(out, "Long break:         {} min", settings.long_break_minutes);
        let _ = writeln!(out, "Long break every:   {} sessions", settings.long_break_interval);
        let _ = writeln!(out, "Auto-start breaks:  {}", on_off(settings.auto_start_breaks));
        let _ = writeln!(out, "Auto-start work:    {}", on_off(settings.auto_start_work));
        let _ = writeln!(out, "Sound:              {}", on_off(settings.sound_enabled));
        out
    }

    // ------------------------------------------------------------------------
    // Tasks
    // ------------------------------------------------------------------------

    /// Shows a task list, one line per task.
    pub fn show_tasks(tasks: &[Task]) {
        print!("{}", Self::format_tasks(tasks, Self::today()));
    }

    pub fn format_tasks(tasks: &[Task], today: NaiveDate) -> String {
        if tasks.is_empty() {
            return "No tasks\n".to_string();
        }

        let mut out = String::new();
        for task in tasks {
            let _ = writeln!(out, "{}", Self::format_task_line(task, today));
        }
        out
    }

    /// One task as `id [status] priority title (category)`, plus the due date.
    pub fn format_task_line(task: &Task, today: NaiveDate) -> String {
        let mut line = format!(
            "{} [{}] {} {} ({})",
            task.short_id(),
            task.status.as_str(),
            Self::priority_marker(task.priority),
            task.title,
            task.category
        );
        if let Some(due) = task.due_date {
            let _ = write!(line, " due {}", due);
        }
        if task.is_overdue(today) {
            line.push_str(OVERDUE_MARKER);
        }
        line
    }

    /// Shows the kanban board, one section per column.
    pub fn show_board(board: &Board) {
        print!("{}", Self::format_board(board, Self::today()));
    }

    pub fn format_board(board: &Board, today: NaiveDate) -> String {
        let mut out = String::new();
        for column in board.columns() {
            let _ = writeln!(out, "== {} ({}) ==", column.title(), column.tasks.len());
            for task in &column.tasks {
                let _ = writeln!(
                    out,
                    "  {} {} {}{}",
                    task.short_id(),
                    Self::priority_marker(task.priority),
                    task.title,
                    if task.is_overdue(today) { OVERDUE_MARKER } else { "" }
                );
            }
        }
        if board.is_empty() {
            let _ = writeln!(out, "No tasks yet. Add one with 'stayontask task add <title>'");
        }
        out
    }

    /// Shows a one-line confirmation.
    pub fn show_success(message: &str) {
        println!("* {}", message);
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("error: {}", message);
    }

    fn priority_marker(priority: Priority) -> &'static str {
        match priority {
            Priority::High => "!!!",
            Priority::Medium => "!! ",
            Priority::Low => "!  ",
        }
    }

    /// The local calendar date, used to flag overdue tasks.
    pub fn today() -> NaiveDate {
        Local::now().date_naive()
    }

    /// Formats seconds as `MM:SS`.
    pub fn format_time(total_seconds: u32) -> String {
        format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
    }
}

// ============================================================================
// Tests
// ============================================================================
