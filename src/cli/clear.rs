//! `taskflow clear` command implementation

use anyhow::Result;
use clap::Args;
use std::io::{self, BufRead, Write};

use super::open_board;
use crate::board::Confirm;

#[derive(Args)]
pub struct ClearArgs {
    /// Skip the confirmation prompt
    #[arg(short, long)]
    yes: bool,
}

/// Asks on stdout and reads the answer from `input`. Anything but y/yes is a no.
pub struct PromptConfirm<R> {
    input: R,
}

impl<R: BufRead> PromptConfirm<R> {
    pub fn new(input: R) -> Self {
        Self { input }
    }
}

impl<R: BufRead> Confirm for PromptConfirm<R> {
    fn confirm(&mut self, prompt: &str) -> bool {
        print!("{} (y/N): ", prompt);
        if io::stdout().flush().is_err() {
            return false;
        }

        let mut response = String::new();
        if self.input.read_line(&mut response).is_err() {
            return false;
        }
        matches!(response.trim().to_lowercase().as_str(), "y" | "yes")
    }
}

pub async fn run(profile: &str, identity: Option<&str>, args: ClearArgs) -> Result<()> {
    let mut board = open_board(profile, identity)?;

    if board.tasks().is_empty() {
        println!("Board is already empty.");
        return Ok(());
    }

    let count = board.tasks().len();
    let cleared = if args.yes {
        board.clear(&mut true)
    } else {
        board.clear(&mut PromptConfirm::new(io::stdin().lock()))
    };

    if cleared {
        println!("✓ Cleared {} tasks", count);
    } else {
        println!("Cancelled.");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_prompt_accepts_yes() {
        assert!(PromptConfirm::new(Cursor::new("y\n")).confirm("Clear?"));
        assert!(PromptConfirm::new(Cursor::new("YES\n")).confirm("Clear?"));
    }

    #[test]
    fn test_prompt_defaults_to_no() {
        assert!(!PromptConfirm::new(Cursor::new("\n")).confirm("Clear?"));
        assert!(!PromptConfirm::new(Cursor::new("")).confirm("Clear?"));
        assert!(!PromptConfirm::new(Cursor::new("nah\n")).confirm("Clear?"));
    }
}
