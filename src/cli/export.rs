//! `taskflow export` command implementation

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use super::open_board;
use crate::config::Config;

#[derive(Args)]
pub struct ExportArgs {
    /// Directory to write the backup to (defaults to the configured export dir)
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// Print the JSON to stdout instead of writing a file
    #[arg(long)]
    stdout: bool,
}

pub async fn run(profile: &str, identity: Option<&str>, args: ExportArgs) -> Result<()> {
    let board = open_board(profile, identity)?;

    if args.stdout {
        println!("{}", board.export_json()?);
        return Ok(());
    }

    let dir = match args.dir {
        Some(dir) => dir,
        None => Config::load()?.export.resolve_dir(),
    };
    let today = chrono::Local::now().date_naive();
    let path = board.export(&dir, today)?;

    println!("✓ Exported {} tasks to {}", board.tasks().len(), path.display());

    Ok(())
}
