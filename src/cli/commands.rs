use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::models::{parse_bool, parse_date, Priority, TaskField};
use crate::query::PriorityFilter;

#[derive(Parser)]
#[command(
    name = "taskgenie",
    version,
    about = "Interactive in-memory task list manager",
    after_help = "\
NOTE:
  Commands are read one per line from stdin (or --script). Tasks live only
  for the length of the session; nothing is written to disk.
  Type `help` inside the session for the command list.

REFERENCES:
  <ref> is either a row number from the last `list` (1-based, counting only
  visible rows) or a prefix of the task ID shown in the ID column.
  A reference made only of digits is always a row number; write `id:01J`
  to look up an ID prefix that starts with digits.
  Only visible tasks can be selected, and a selection is dropped as soon as
  its row is filtered out.

EXIT CODES:
  0  Session ended normally (rejected commands do not change this)
  1  Startup error (configuration) or unreadable input"
)]
pub struct Cli {
    /// Output as JSON, one document per command
    #[arg(long)]
    pub json: bool,

    /// JSON config file with categories and add-form defaults
    #[arg(long, env = "TASKGENIE_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Pin today's date (YYYY-MM-DD) instead of reading the system clock
    #[arg(long, value_name = "DATE", value_parser = parse_date)]
    pub today: Option<NaiveDate>,

    /// Read commands from a file instead of stdin
    #[arg(long, value_name = "PATH")]
    pub script: Option<PathBuf>,
}

/// One line typed into the session.
#[derive(Parser)]
#[command(
    name = "taskgenie",
    no_binary_name = true,
    disable_version_flag = true,
    help_template = "{subcommands}"
)]
pub struct SessionLine {
    #[command(subcommand)]
    pub command: SessionCommand,
}

#[derive(Subcommand)]
pub enum SessionCommand {
    /// Add a task (starts not completed)
    #[command(after_help = "\
NOTE:
  Omitted fields use the add-form defaults: priority from config (medium),
  the default category (Work), and today's date as deadline.
  A past deadline is accepted with a warning.")]
    Add {
        /// Task name (must not be empty)
        name: String,
        #[arg(long, short)]
        description: Option<String>,
        #[arg(long, short)]
        priority: Option<Priority>,
        #[arg(long, short)]
        category: Option<String>,
        /// Deadline as YYYY-MM-DD
        #[arg(long, value_parser = parse_date)]
        deadline: Option<NaiveDate>,
    },
    /// Show visible tasks and statistics
    #[command(alias = "ls")]
    List,
    /// Show task details
    Show {
        /// Row number, ID prefix or id:<prefix>
        reference: String,
    },
    /// Select the task that `delete` removes
    Select {
        /// Row number, ID prefix or id:<prefix>
        reference: String,
    },
    /// Clear the selection
    Unselect,
    /// Delete the selected task
    #[command(alias = "rm")]
    Delete,
    /// Change one field of a task
    Edit {
        /// Row number, ID prefix or id:<prefix>
        reference: String,
        #[arg(value_enum)]
        field: TaskField,
        /// New value (empty names are rejected)
        value: String,
    },
    /// Flip a task's completion
    Toggle {
        /// Row number, ID prefix or id:<prefix>
        reference: String,
    },
    /// Change filters; options left out keep their current value
    Filter {
        /// high, medium, low or all
        #[arg(long)]
        priority: Option<PriorityFilter>,
        /// Category name or all
        #[arg(long)]
        category: Option<String>,
        #[arg(long, value_name = "BOOL", value_parser = parse_bool)]
        show_completed: Option<bool>,
        #[arg(long, value_name = "BOOL", value_parser = parse_bool)]
        overdue_only: Option<bool>,
        /// Restore the default filter before applying other options
        #[arg(long)]
        reset: bool,
    },
    /// Show statistics over all tasks
    Stats,
    /// List categories
    Categories,
    /// End the session
    #[command(alias = "exit")]
    Quit,
}
