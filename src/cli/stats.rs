//! `taskflow stats` command implementation

use anyhow::Result;
use clap::Args;

use super::open_board;

#[derive(Args)]
pub struct StatsArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

pub async fn run(profile: &str, identity: Option<&str>, args: StatsArgs) -> Result<()> {
    let board = open_board(profile, identity)?;
    let stats = board.stats();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("Board: {}\n", board.key());
    println!("  Total        {}", stats.total);
    println!("  Pending      {}", stats.pending);
    println!("  In Progress  {}", stats.in_progress);
    println!("  Done         {}", stats.done);
    println!("  Completed    {}%", stats.completion_rate);

    Ok(())
}
