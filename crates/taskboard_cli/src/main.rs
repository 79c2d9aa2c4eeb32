mod cli;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use std::io::{self, BufRead};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use taskboard_core::api::TodoApi;
use taskboard_core::collection::Collection;
use taskboard_core::config;
use taskboard_core::editor::EditSession;
use taskboard_core::error::SyncError;
use taskboard_core::model::{
    ANSI_RESET, StatusColor, Task, TaskStatus, format_due_time_local, status_color,
};

fn status_label(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Pending => "pending",
        TaskStatus::InProgress => "in-progress",
        TaskStatus::Completed => "completed",
    }
}

fn status_badge(status: TaskStatus) -> String {
    format!(
        "{}{}{}",
        status_color(status).ansi(),
        status_label(status),
        ANSI_RESET
    )
}

fn print_tasks_plain(tasks: &[Task]) -> Result<(), SyncError> {
    for task in tasks {
        let due_local = format_due_time_local(&task.due_time)?;
        println!(
            "{} | {} | {} | {} | {}due {}{}",
            task.id,
            task.title,
            status_badge(task.status),
            task.description,
            StatusColor::Gray.ansi(),
            due_local,
            ANSI_RESET
        );
    }

    Ok(())
}

fn print_tasks_json(tasks: &[Task]) -> Result<(), SyncError> {
    let payload =
        serde_json::to_string(tasks).map_err(|err| SyncError::invalid_data(err.to_string()))?;
    println!("{payload}");
    Ok(())
}

fn print_task_json(task: &Task) -> Result<(), SyncError> {
    let payload =
        serde_json::to_string(task).map_err(|err| SyncError::invalid_data(err.to_string()))?;
    println!("{payload}");
    Ok(())
}

fn normalize_parse_error(err: clap::Error) -> SyncError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    SyncError::invalid_input(message)
}

fn split_command_line(line: &str) -> Result<Vec<String>, SyncError> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut escape = false;

    for ch in line.chars() {
        if escape {
            if ch != '"' && ch != '\\' {
                current.push('\\');
            }
            current.push(ch);
            escape = false;
            continue;
        }

        if in_quotes && ch == '\\' {
            escape = true;
            continue;
        }

        if ch == '"' {
            in_quotes = !in_quotes;
            continue;
        }

        if ch.is_whitespace() && !in_quotes {
            if !current.is_empty() {
                args.push(current.clone());
                current.clear();
            }
            continue;
        }

        current.push(ch);
    }

    if in_quotes {
        return Err(SyncError::invalid_input("unterminated quote in command"));
    }

    if !current.is_empty() {
        args.push(current);
    }

    Ok(args)
}

fn print_help() {
    let mut cmd = Cli::command();
    let help = cmd.render_help();
    println!("{help}");
}

async fn run_command(cli: Cli, collection: &Collection) -> Result<(), SyncError> {
    match cli.command {
        Command::List => {
            let tasks = collection.snapshot().await;
            if cli.json {
                print_tasks_json(&tasks)?;
            } else {
                print_tasks_plain(&tasks)?;
            }
        }
        Command::Add {
            title,
            description,
            status,
            due,
        } => {
            let draft = taskboard_core::model::TaskDraft {
                title,
                description,
                status,
                due_time: due,
            };
            let task = collection.create(&draft).await?;
            if cli.json {
                print_task_json(&task)?;
            } else {
                println!("Added task: {} ({})", task.title, task.id);
            }
        }
        Command::Status { id, new_status } => {
            let task = collection.change_status(&id, new_status).await?;
            if cli.json {
                print_task_json(&task)?;
            } else {
                println!(
                    "Updated status: {} ({}) -> {}",
                    task.title,
                    task.id,
                    status_badge(task.status)
                );
            }
        }
        Command::Edit {
            id,
            title,
            description,
            due,
        } => {
            let record = collection.get(&id).await?;
            let mut session = EditSession::open(&record);

            if title.is_none() && description.is_none() && due.is_none() {
                session.cancel();
                println!("No changes; edit cancelled");
                return Ok(());
            }

            if let Some(value) = title {
                session.set_title(&value);
            }
            if let Some(value) = description {
                session.set_description(&value);
            }
            if let Some(value) = due {
                session.set_due_time(&value);
            }

            let task = session.commit(collection).await?;
            if cli.json {
                print_task_json(&task)?;
            } else {
                println!("Updated task: {} ({})", task.title, task.id);
            }
        }
        Command::Delete { id } => {
            let task = collection.delete(&id).await?;
            if cli.json {
                print_task_json(&task)?;
            } else {
                println!("Deleted task: {} ({})", task.title, task.id);
            }
        }
        Command::Reload => {
            collection.load().await?;
            let count = collection.snapshot().await.len();
            if cli.json {
                println!("{}", serde_json::json!({ "loaded": count }));
            } else {
                println!("Reloaded {count} tasks");
            }
        }
    }

    Ok(())
}

/// The interactive shell is the CLI analog of the original single page:
/// the collection loads once, then every command patches the same local
/// sequence and `list` renders from it without re-fetching.
async fn run_interactive(collection: &Collection) -> Result<(), SyncError> {
    // A failed initial load is logged by the collection; start empty.
    let _ = collection.load().await;

    let mut input = String::new();
    let stdin = io::stdin();
    let mut stdin_lock = stdin.lock();

    loop {
        input.clear();
        let bytes = stdin_lock
            .read_line(&mut input)
            .map_err(|err| SyncError::invalid_data(err.to_string()))?;

        if bytes == 0 {
            break;
        }

        let line = input.trim();
        if line.is_empty() {
            continue;
        }

        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }

        if line == "help" || line == "?" {
            print_help();
            continue;
        }

        let args = match split_command_line(line) {
            Ok(args) => args,
            Err(err) => {
                eprintln!("ERROR: {err}");
                continue;
            }
        };

        if args.is_empty() {
            continue;
        }

        let mut argv = Vec::with_capacity(args.len() + 1);
        argv.push("taskboard".to_string());
        argv.extend(args);

        let cli = match Cli::try_parse_from(argv) {
            Ok(cli) => cli,
            Err(err) => {
                eprintln!("ERROR: {}", normalize_parse_error(err));
                continue;
            }
        };

        if let Err(err) = run_command(cli, collection).await {
            eprintln!("ERROR: {err}");
        }
    }

    Ok(())
}

fn build_collection() -> Result<Collection, SyncError> {
    let host = config::resolve_host()?;
    Ok(Collection::new(TodoApi::new(host)))
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args_os();
    args.next();
    let interactive = args.next().is_none();

    let collection = match build_collection() {
        Ok(collection) => collection,
        Err(err) => {
            eprintln!("ERROR: {err}");
            std::process::exit(1);
        }
    };

    if interactive {
        if let Err(err) = run_interactive(&collection).await {
            eprintln!("ERROR: {err}");
            std::process::exit(1);
        }
        return;
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            if matches!(
                err.kind(),
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion
            ) {
                print!("{err}");
                return;
            }
            eprintln!("ERROR: {}", normalize_parse_error(err));
            std::process::exit(1);
        }
    };

    // One-shot commands work against a freshly loaded sequence. `list`
    // tolerates a failed load (the failure is logged, the page renders
    // empty); mutations refuse to run against an unloaded sequence.
    if let Err(err) = collection.load().await
        && !matches!(cli.command, Command::List)
    {
        eprintln!("ERROR: {err}");
        std::process::exit(1);
    }

    if let Err(err) = run_command(cli, &collection).await {
        eprintln!("ERROR: {err}");
        std::process::exit(1);
    }
}
