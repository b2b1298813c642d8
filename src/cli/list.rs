//! `taskflow list` command implementation

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use super::{open_board, truncate};
use crate::board::{FilteredView, Task, TaskStatus};

const TABLE_COL_ID: usize = 10;
const TABLE_COL_TEXT: usize = 60;

#[derive(Args)]
pub struct ListArgs {
    /// Only show tasks whose text contains this (case-insensitive)
    #[arg(short, long, default_value = "")]
    search: String,

    /// Only show one column
    #[arg(long)]
    status: Option<TaskStatus>,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct BoardJson<'a> {
    key: &'a str,
    todo: &'a [Task],
    #[serde(rename = "in-progress")]
    in_progress: &'a [Task],
    done: &'a [Task],
}

fn print_column(status: TaskStatus, tasks: &[Task]) {
    println!("{} ({})", status.title(), tasks.len());
    if tasks.is_empty() {
        println!("  No tasks");
    }
    for task in tasks {
        println!(
            "  {:<width_id$} {}",
            task.id.short(),
            truncate(&task.text, TABLE_COL_TEXT),
            width_id = TABLE_COL_ID
        );
    }
}

pub async fn run(profile: &str, identity: Option<&str>, args: ListArgs) -> Result<()> {
    let board = open_board(profile, identity)?;
    let view: FilteredView = board.filtered_view(&args.search);

    if args.json {
        let empty: &[Task] = &[];
        let pick = |status: TaskStatus| match args.status {
            Some(only) if only != status => empty,
            _ => view.column(status),
        };
        let json = BoardJson {
            key: board.key().as_str(),
            todo: pick(TaskStatus::Todo),
            in_progress: pick(TaskStatus::InProgress),
            done: pick(TaskStatus::Done),
        };
        println!("{}", serde_json::to_string_pretty(&json)?);
        return Ok(());
    }

    if board.tasks().is_empty() {
        println!("No tasks yet. Add one with: taskflow add <text>");
        return Ok(());
    }

    let columns: Vec<TaskStatus> = match args.status {
        Some(status) => vec![status],
        None => TaskStatus::ALL.to_vec(),
    };

    for (idx, status) in columns.iter().enumerate() {
        if idx > 0 {
            println!();
        }
        print_column(*status, view.column(*status));
    }

    if !args.search.is_empty() {
        println!(
            "\n{} of {} tasks match '{}'",
            view.len(),
            board.tasks().len(),
            args.search
        );
    }

    Ok(())
}
