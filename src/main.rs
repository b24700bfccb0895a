//! stayontask - tasks, a kanban board and a work/break interval timer
//!
//! The timer runs in `stayontask daemon`; every other timer command talks
//! to it over a Unix socket. Task commands read and write the task file
//! directly.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};

use stayontask::cli::{Cli, Commands, DaemonArgs, Display, IpcClient, TaskCommand};
use stayontask::notification::{NotificationSink, SilentSink, TerminalSink};
use stayontask::paths;
use stayontask::settings::{FileKeyValueStore, SettingsStore};
use stayontask::sound::{try_create_player, SoundPlayer};
use stayontask::tasks::{self, apply_drop, Board, JsonTaskStore, NewTask, TaskStatus, TaskStore};

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    if let Err(e) = execute(cli).await {
        Display::show_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
///
/// `RUST_LOG` wins; otherwise `--verbose` selects debug output.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Daemon(args)) => run_daemon(args).await?,
        Some(Commands::Start) => {
            let response = IpcClient::new()?.start().await?;
            Display::show_command_result(&response);
        }
        Some(Commands::Pause) => {
            let response = IpcClient::new()?.pause().await?;
            Display::show_command_result(&response);
        }
        Some(Commands::Reset) => {
            let response = IpcClient::new()?.reset().await?;
            Display::show_command_result(&response);
        }
        Some(Commands::ResetCount) => {
            let response = IpcClient::new()?.reset_count().await?;
            Display::show_command_result(&response);
        }
        Some(Commands::Switch { mode }) => {
            let response = IpcClient::new()?.switch(mode).await?;
            Display::show_command_result(&response);
        }
        Some(Commands::Status) => {
            let response = IpcClient::new()?.status().await?;
            Display::show_status(&response);
        }
        Some(Commands::Settings(args)) => {
            let response = IpcClient::new()?.settings(args.to_patch()).await?;
            if !response.message.is_empty() {
                Display::show_success(&response.message);
            }
            let settings = response
                .data
                .and_then(|d| d.settings)
                .context("The daemon did not report its settings")?;
            Display::show_settings(&settings);
        }
        Some(Commands::Task(command)) => run_task_command(command)?,
        Some(Commands::Board) => {
            let store = JsonTaskStore::new(paths::tasks_path()?);
            Display::show_board(&Board::load(&store)?);
        }
        Some(Commands::Completions { shell }) => {
            generate_completions(shell);
        }
        None => {
            Cli::command().print_help()?;
        }
    }

    Ok(())
}

/// Runs the timer daemon until Ctrl-C.
async fn run_daemon(args: DaemonArgs) -> Result<()> {
    let socket_path = paths::socket_path()?;
    let store = SettingsStore::new(FileKeyValueStore::new(paths::settings_path()?));

    let sink: Box<dyn NotificationSink + Send> = if args.silent {
        Box::new(SilentSink)
    } else {
        let player = try_create_player().map(|p| Box::new(p) as Box<dyn SoundPlayer + Send>);
        Box::new(TerminalSink::new(player))
    };

    println!("Starting stayontask daemon on {}", socket_path.display());

    stayontask::daemon::run(&socket_path, store, sink, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    })
    .await
}

/// Executes a task subcommand against the task file.
fn run_task_command(command: TaskCommand) -> Result<()> {
    let mut store = JsonTaskStore::new(paths::tasks_path()?);

    match command {
        TaskCommand::Add(args) => {
            let task = store.create(
                NewTask::new(args.title)
                    .with_description(args.description)
                    .with_priority(args.priority)
                    .with_category(args.category)
                    .with_due_date(args.due),
            )?;
            let line = Display::format_task_line(&task, Display::today());
            Display::show_success(&format!("Added {}", line));
        }
        TaskCommand::List { status } => {
            let tasks: Vec<_> = store
                .list()?
                .into_iter()
                .filter(|task| status.map_or(true, |s| task.status == s))
                .collect();
            Display::show_tasks(&tasks);
        }
        TaskCommand::Done { id } => {
            let id = tasks::resolve_id(&store, &id)?;
            if !store.update_status(id, TaskStatus::Done)? {
                anyhow::bail!("No task with id {}", id);
            }
            Display::show_success("Task marked as done");
        }
        TaskCommand::Move { id, column } => {
            if !tasks::COLUMN_IDS.contains(&column.as_str()) {
                anyhow::bail!(
                    "Unknown column '{}' (expected {})",
                    column,
                    tasks::COLUMN_IDS.join(", ")
                );
            }
            let id = tasks::resolve_id(&store, &id)?;
            if apply_drop(&mut store, id, &column)? {
                Display::show_success(&format!("Task moved to {}", column));
            } else {
                Display::show_success(&format!("Task already in {}", column));
            }
        }
        TaskCommand::Remove { id } => {
            let id = tasks::resolve_id(&store, &id)?;
            if !store.remove(id)? {
                anyhow::bail!("No task with id {}", id);
            }
            Display::show_success("Task removed");
        }
    }

    Ok(())
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================
