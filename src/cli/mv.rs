//! `taskflow move` and `taskflow advance` command implementations

use anyhow::Result;
use clap::Args;

use super::{open_board, resolve_task};
use crate::board::TaskStatus;

#[derive(Args)]
pub struct MoveArgs {
    /// Task id, id prefix, or exact text
    task: String,

    /// Target column (todo, in-progress, done)
    status: TaskStatus,
}

#[derive(Args)]
pub struct AdvanceArgs {
    /// Task id, id prefix, or exact text
    task: String,
}

pub async fn run_move(profile: &str, identity: Option<&str>, args: MoveArgs) -> Result<()> {
    let mut board = open_board(profile, identity)?;
    let task = resolve_task(&args.task, board.tasks())?.clone();

    if task.status == args.status {
        println!("Already in {}: {}", args.status.title(), task.text);
        return Ok(());
    }

    board.move_to(&task.id, args.status);
    println!("✓ {} → {}: {}", task.status.title(), args.status.title(), task.text);

    Ok(())
}

pub async fn run_advance(profile: &str, identity: Option<&str>, args: AdvanceArgs) -> Result<()> {
    let mut board = open_board(profile, identity)?;
    let task = resolve_task(&args.task, board.tasks())?.clone();

    if let Some(status) = board.advance(&task.id) {
        println!("✓ {} → {}: {}", task.status.title(), status.title(), task.text);
    }

    Ok(())
}
