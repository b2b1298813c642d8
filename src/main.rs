//! TaskFlow - terminal Kanban board

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use std::fs::OpenOptions;
use std::sync::Mutex;
use taskflow::cli::{self, Cli, Commands};
use taskflow::config::{get_app_dir, Config};
use taskflow::tui;

const DEBUG_FILTER: &str = "taskflow=debug";

/// Logs go to stderr for CLI commands. The TUI owns the terminal, so there
/// they go to `debug.log` in the app dir instead.
fn init_logging(tui_mode: bool) -> Result<()> {
    if std::env::var("TASKFLOW_DEBUG").is_err() {
        return Ok(());
    }

    if tui_mode {
        let path = get_app_dir()?.join("debug.log");
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        tracing_subscriber::fmt()
            .with_env_filter(DEBUG_FILTER)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(DEBUG_FILTER)
            .with_writer(std::io::stderr)
            .init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Completions need no app data
    if let Some(Commands::Completion { shell }) = cli.command {
        generate(shell, &mut Cli::command(), "taskflow", &mut std::io::stdout());
        return Ok(());
    }

    init_logging(cli.command.is_none())?;

    if let Some(Commands::Profile { command }) = cli.command {
        return cli::profile::run(command).await;
    }

    let profile = match cli.profile {
        Some(profile) => profile,
        None => Config::load()?.default_profile,
    };
    let identity = cli.identity.as_deref();

    match cli.command {
        Some(Commands::Add(args)) => cli::add::run(&profile, identity, args).await,
        Some(Commands::List(args)) => cli::list::run(&profile, identity, args).await,
        Some(Commands::Move(args)) => cli::mv::run_move(&profile, identity, args).await,
        Some(Commands::Advance(args)) => cli::mv::run_advance(&profile, identity, args).await,
        Some(Commands::Remove(args)) => cli::remove::run(&profile, identity, args).await,
        Some(Commands::Clear(args)) => cli::clear::run(&profile, identity, args).await,
        Some(Commands::Export(args)) => cli::export::run(&profile, identity, args).await,
        Some(Commands::Stats(args)) => cli::stats::run(&profile, identity, args).await,
        Some(Commands::Identify) => cli::identify::run(&profile).await,
        Some(Commands::Completion { .. }) | Some(Commands::Profile { .. }) => Ok(()),
        None => tui::run(&profile, identity).await,
    }
}
