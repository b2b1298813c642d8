//! `taskflow add` command implementation

use anyhow::{bail, Result};
use clap::Args;

use super::open_board;

#[derive(Args)]
pub struct AddArgs {
    /// Task text (multiple words are joined with spaces)
    #[arg(required = true, num_args = 1..)]
    text: Vec<String>,
}

pub async fn run(profile: &str, identity: Option<&str>, args: AddArgs) -> Result<()> {
    let text = args.text.join(" ");
    let mut board = open_board(profile, identity)?;

    let Some(task) = board.add(&text) else {
        bail!("Task text cannot be empty");
    };

    println!("✓ Added to {}: {}", task.status.title(), task.text);
    println!("  ID: {}", task.id.short());

    Ok(())
}
