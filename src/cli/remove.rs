//! `taskflow remove` command implementation

use anyhow::Result;
use clap::Args;

use super::{open_board, resolve_task};

#[derive(Args)]
pub struct RemoveArgs {
    /// Task id, id prefix, or exact text
    task: String,
}

pub async fn run(profile: &str, identity: Option<&str>, args: RemoveArgs) -> Result<()> {
    let mut board = open_board(profile, identity)?;
    let task = resolve_task(&args.task, board.tasks())?.clone();

    board.remove(&task.id);
    println!("✓ Removed: {}", task.text);

    Ok(())
}
