use clap::{Parser, Subcommand};
use taskboard_core::model::TaskStatus;

#[derive(Parser, Debug)]
#[command(name = "taskboard", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List all tasks
    ///
    /// Example: taskboard list
    List,
    /// Add a new task
    ///
    /// Example: taskboard add "Buy milk" "2% from the corner shop" --due 2025-01-01T10:00
    Add {
        title: String,
        description: String,
        /// Initial status (pending, in-progress, completed)
        #[arg(long, default_value = "pending")]
        status: TaskStatus,
        /// Due time: local date-time like 2025-01-01T10:00, or RFC 3339
        #[arg(long)]
        due: String,
    },
    /// Change a task's status
    ///
    /// Example: taskboard status 1 completed
    Status {
        id: String,
        new_status: TaskStatus,
    },
    /// Edit a task's title, description, or due time
    ///
    /// Example: taskboard edit 1 --title "Buy organic milk"
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Due time: local date-time like 2025-01-01T10:00, or RFC 3339
        #[arg(long)]
        due: Option<String>,
    },
    /// Delete a task
    ///
    /// Example: taskboard delete 1
    Delete {
        id: String,
    },
    /// Re-fetch the collection from the service
    ///
    /// Example: taskboard reload
    Reload,
}
