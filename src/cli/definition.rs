//! CLI argument definitions

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use super::add::AddArgs;
use super::clear::ClearArgs;
use super::export::ExportArgs;
use super::list::ListArgs;
use super::mv::{AdvanceArgs, MoveArgs};
use super::profile::ProfileCommands;
use super::remove::RemoveArgs;
use super::stats::StatsArgs;

#[derive(Parser)]
#[command(name = "taskflow")]
#[command(about = "Terminal Kanban board: pending, in progress, done")]
#[command(version)]
#[command(
    long_about = "TaskFlow keeps a three-column task board per profile. Run without a \
                  subcommand to open the interactive board."
)]
pub struct Cli {
    /// Profile to use (each profile keeps its own boards)
    #[arg(short, long, global = true, env = "TASKFLOW_PROFILE")]
    pub profile: Option<String>,

    /// Use this identity for the storage key instead of the cached one
    #[arg(long, global = true, env = "TASKFLOW_IDENTITY")]
    pub identity: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a task to the pending column
    Add(AddArgs),

    /// List tasks by column
    #[command(alias = "ls")]
    List(ListArgs),

    /// Move a task to a column
    #[command(name = "move", alias = "mv")]
    Move(MoveArgs),

    /// Move a task to the next column (done wraps back to pending)
    Advance(AdvanceArgs),

    /// Delete a task
    #[command(alias = "rm")]
    Remove(RemoveArgs),

    /// Delete every task on the board
    Clear(ClearArgs),

    /// Write a dated JSON backup of the board
    Export(ExportArgs),

    /// Show board statistics
    Stats(StatsArgs),

    /// Look up and cache this client's identity, moving anonymous tasks to it
    Identify,

    /// Manage profiles
    #[command(alias = "p")]
    Profile {
        #[command(subcommand)]
        command: Option<ProfileCommands>,
    },

    /// Generate shell completions
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
