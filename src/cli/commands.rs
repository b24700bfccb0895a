//! Command definitions for the stayontask CLI.
//!
//! Uses clap derive macro for argument parsing.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::tasks::{Priority, TaskStatus};
use crate::types::{SessionMode, SettingsPatch};

// ============================================================================
// CLI Structure
// ============================================================================

/// Tasks, a kanban board and a work/break interval timer
#[derive(Parser, Debug)]
#[command(
    name = "stayontask",
    version,
    about = "Tasks, a kanban board and a work/break interval timer",
    long_about = "Keeps a task list with a three-column kanban board, and runs a \
                  work/short-break/long-break interval timer in a background daemon.",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the timer daemon in the foreground
    Daemon(DaemonArgs),

    /// Start or continue the countdown
    Start,

    /// Pause the countdown
    Pause,

    /// Restart the current session from its full duration
    Reset,

    /// Zero the completed work-session count and go back to work
    ResetCount,

    /// Switch to another mode (stops the countdown)
    Switch {
        /// Target mode: work, short-break or long-break
        mode: SessionMode,
    },

    /// Show the timer status
    Status,

    /// Show or change timer settings
    Settings(SettingsArgs),

    /// Manage tasks
    #[command(subcommand)]
    Task(TaskCommand),

    /// Show the kanban board
    Board,

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ============================================================================
// Daemon Arguments
// ============================================================================

/// Arguments for the daemon command
#[derive(Args, Debug, Clone, Default)]
pub struct DaemonArgs {
    /// Log completions instead of printing them, and never play audio
    #[arg(long)]
    pub silent: bool,
}

// ============================================================================
// Settings Arguments
// ============================================================================

/// Arguments for the settings command.
///
/// Numbers are accepted as signed; zero or negative values are raised to
/// the minimum by the daemon.
#[derive(Args, Debug, Clone, Default)]
pub struct SettingsArgs {
    /// Work session length in minutes
    #[arg(long, allow_negative_numbers = true)]
    pub work: Option<i64>,

    /// Short break length in minutes
    #[arg(long, allow_negative_numbers = true)]
    pub short_break: Option<i64>,

    /// Long break length in minutes
    #[arg(long, allow_negative_numbers = true)]
    pub long_break: Option<i64>,

    /// Work sessions between long breaks
    #[arg(long, allow_negative_numbers = true)]
    pub interval: Option<i64>,

    /// Start breaks automatically
    #[arg(long, value_name = "BOOL")]
    pub auto_start_breaks: Option<bool>,

    /// Start work sessions automatically after a break
    #[arg(long, value_name = "BOOL")]
    pub auto_start_work: Option<bool>,

    /// Play a sound when a session completes
    #[arg(long, value_name = "BOOL")]
    pub sound: Option<bool>,
}

impl SettingsArgs {
    /// Converts the flags into a partial update.
    pub fn to_patch(&self) -> SettingsPatch {
        SettingsPatch {
            work_minutes: self.work,
            short_break_minutes: self.short_break,
            long_break_minutes: self.long_break,
            long_break_interval: self.interval,
            auto_start_breaks: self.auto_start_breaks,
            auto_start_work: self.auto_start_work,
            sound_enabled: self.sound,
        }
    }
}

// ============================================================================
// Task Commands
// ============================================================================

/// Task subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum TaskCommand {
    /// Add a task
    Add(TaskAddArgs),

    /// List tasks
    List {
        /// Only show tasks with this status
        #[arg(long)]
        status: Option<TaskStatus>,
    },

    /// Mark a task as done
    Done {
        /// Task id or unique id prefix
        id: String,
    },

    /// Move a task to a board column
    Move {
        /// Task id or unique id prefix
        id: String,
        /// Target column: todo, in-progress or done
        column: String,
    },

    /// Delete a task
    Remove {
        /// Task id or unique id prefix
        id: String,
    },
}

/// Arguments for adding a task
#[derive(Args, Debug, Clone)]
pub struct TaskAddArgs {
    /// Task title
    #[arg(value_parser = validate_title)]
    pub title: String,

    /// Longer description
    #[arg(short, long, default_value = "")]
    pub description: String,

    /// Priority: low, medium or high
    #[arg(short, long, default_value = "medium")]
    pub priority: Priority,

    /// Category label
    #[arg(short, long, default_value = crate::tasks::DEFAULT_CATEGORY)]
    pub category: String,

    /// Due date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_due_date)]
    pub due: Option<NaiveDate>,
}

// ============================================================================
// Validation Functions
// ============================================================================

/// Validates a task title.
///
/// - Must not be blank
/// - Must not exceed 200 characters
fn validate_title(s: &str) -> Result<String, String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err("title cannot be empty".to_string());
    }
    if trimmed.chars().count() > 200 {
        return Err("title must be 200 characters or fewer".to_string());
    }
    Ok(trimmed.to_string())
}

fn parse_due_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("expected YYYY-MM-DD: {}", e))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // ------------------------------------------------------------------------
    // Cli Tests
    // ------------------------------------------------------------------------

    mod cli_tests {
        use super::*;

        #[test]
        fn test_parse_no_args() {
            let cli = Cli::parse_from(["stayontask"]);
            assert!(cli.command.is_none());
            assert!(!cli.verbose);
        }

        #[test]
        fn test_parse_verbose_flag() {
            let cli = Cli::parse_from(["stayontask", "-v", "status"]);
            assert!(cli.verbose);
        }

        #[test]
        fn test_parse_timer_commands() {
            assert!(matches!(
                Cli::parse_from(["stayontask", "start"]).command,
                Some(Commands::Start)
            ));
            assert!(matches!(
                Cli::parse_from(["stayontask", "pause"]).command,
                Some(Commands::Pause)
            ));
            assert!(matches!(
                Cli::parse_from(["stayontask", "reset"]).command,
                Some(Commands::Reset)
            ));
            assert!(matches!(
                Cli::parse_from(["stayontask", "reset-count"]).command,
                Some(Commands::ResetCount)
            ));
        }

        #[test]
        fn test_parse_daemon_silent() {
            let cli = Cli::parse_from(["stayontask", "daemon", "--silent"]);
            match cli.command {
                Some(Commands::Daemon(args)) => assert!(args.silent),
                _ => panic!("Expected Daemon command"),
            }
        }

        #[test]
        fn test_parse_switch_mode() {
            let cli = Cli::parse_from(["stayontask", "switch", "short-break"]);
            match cli.command {
                Some(Commands::Switch { mode }) => assert_eq!(mode, SessionMode::ShortBreak),
                _ => panic!("Expected Switch command"),
            }
        }

        #[test]
        fn test_parse_switch_invalid_mode() {
            let result = Cli::try_parse_from(["stayontask", "switch", "nap"]);
            assert!(result.is_err());
        }

        #[test]
        fn test_parse_completions_zsh() {
            let cli = Cli::parse_from(["stayontask", "completions", "zsh"]);
            match cli.command {
                Some(Commands::Completions { shell }) => {
                    assert_eq!(shell, clap_complete::Shell::Zsh);
                }
                _ => panic!("Expected Completions command"),
            }
        }
    }

    // ------------------------------------------------------------------------
    // Settings Tests
    // ------------------------------------------------------------------------

    mod settings_args_tests {
        use super::*;

        #[test]
        fn test_no_flags_is_empty_patch() {
            let cli = Cli::parse_from(["stayontask", "settings"]);
            match cli.command {
                Some(Commands::Settings(args)) => assert!(args.to_patch().is_empty()),
                _ => panic!("Expected Settings command"),
            }
        }

        #[test]
        fn test_flags_map_to_patch() {
            let cli = Cli::parse_from([
                "stayontask",
                "settings",
                "--work",
                "50",
                "--interval",
                "-1",
                "--auto-start-breaks",
                "true",
                "--sound",
                "false",
            ]);
            match cli.command {
                Some(Commands::Settings(args)) => {
                    let patch = args.to_patch();
                    assert_eq!(patch.work_minutes, Some(50));
                    assert_eq!(patch.long_break_interval, Some(-1));
                    assert_eq!(patch.auto_start_breaks, Some(true));
                    assert_eq!(patch.sound_enabled, Some(false));
                    assert_eq!(patch.short_break_minutes, None);
                }
                _ => panic!("Expected Settings command"),
            }
        }

        #[test]
        fn test_invalid_bool_rejected() {
            let result = Cli::try_parse_from(["stayontask", "settings", "--sound", "loud"]);
            assert!(result.is_err());
        }
    }

    // ------------------------------------------------------------------------
    // Task Command Tests
    // ------------------------------------------------------------------------

    mod task_command_tests {
        use super::*;

        #[test]
        fn test_parse_task_add_defaults() {
            let cli = Cli::parse_from(["stayontask", "task", "add", "Write report"]);
            match cli.command {
                Some(Commands::Task(TaskCommand::Add(args))) => {
                    assert_eq!(args.title, "Write report");
                    assert_eq!(args.priority, Priority::Medium);
                    assert_eq!(args.category, "work");
                    assert!(args.description.is_empty());
                    assert!(args.due.is_none());
                }
                _ => panic!("Expected Task Add command"),
            }
        }

        #[test]
        fn test_parse_task_add_full() {
            let cli = Cli::parse_from([
                "stayontask",
                "task",
                "add",
                "Ship release",
                "--priority",
                "high",
                "--category",
                "personal",
                "--due",
                "2026-12-01",
                "-d",
                "tag and publish",
            ]);
            match cli.command {
                Some(Commands::Task(TaskCommand::Add(args))) => {
                    assert_eq!(args.priority, Priority::High);
                    assert_eq!(args.category, "personal");
                    assert_eq!(args.due, NaiveDate::from_ymd_opt(2026, 12, 1));
                    assert_eq!(args.description, "tag and publish");
                }
                _ => panic!("Expected Task Add command"),
            }
        }

        #[test]
        fn test_parse_task_add_blank_title_rejected() {
            let result = Cli::try_parse_from(["stayontask", "task", "add", "   "]);
            assert!(result.is_err());
        }

        #[test]
        fn test_parse_task_add_bad_due_date_rejected() {
            let result =
                Cli::try_parse_from(["stayontask", "task", "add", "x", "--due", "tomorrow"]);
            assert!(result.is_err());
        }

        #[test]
        fn test_parse_task_list_with_status() {
            let cli = Cli::parse_from(["stayontask", "task", "list", "--status", "in-progress"]);
            match cli.command {
                Some(Commands::Task(TaskCommand::List { status })) => {
                    assert_eq!(status, Some(TaskStatus::InProgress));
                }
                _ => panic!("Expected Task List command"),
            }
        }

        #[test]
        fn test_parse_task_move() {
            let cli = Cli::parse_from(["stayontask", "task", "move", "1a2b", "done"]);
            match cli.command {
                Some(Commands::Task(TaskCommand::Move { id, column })) => {
                    assert_eq!(id, "1a2b");
                    assert_eq!(column, "done");
                }
                _ => panic!("Expected Task Move command"),
            }
        }
    }
}
