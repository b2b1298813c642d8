//! `taskflow profile` subcommands implementation

use anyhow::{bail, Result};
use clap::Subcommand;

use crate::config::{list_profiles, load_config, save_config, Config, DEFAULT_PROFILE};

#[derive(Subcommand)]
pub enum ProfileCommands {
    /// List profiles that have a board
    #[command(alias = "ls")]
    List,

    /// Show or set the default profile
    Default {
        /// Profile name (shows the current default if omitted)
        name: Option<String>,
    },
}

pub async fn run(command: Option<ProfileCommands>) -> Result<()> {
    match command {
        Some(ProfileCommands::List) | None => list(),
        Some(ProfileCommands::Default { name: None }) => {
            println!("Default profile: {}", default_profile()?);
            Ok(())
        }
        Some(ProfileCommands::Default { name: Some(name) }) => set_default(&name),
    }
}

fn default_profile() -> Result<String> {
    Ok(load_config()?
        .map(|c| c.default_profile)
        .unwrap_or_else(|| DEFAULT_PROFILE.to_string()))
}

fn list() -> Result<()> {
    let profiles = list_profiles()?;
    let default = default_profile()?;

    if profiles.is_empty() {
        println!("No profiles found.");
        println!("Add a task with 'taskflow add' to create the default profile.");
        return Ok(());
    }

    println!("Profiles:");
    for p in &profiles {
        if *p == default {
            println!("  * {} (default)", p);
        } else {
            println!("    {}", p);
        }
    }

    Ok(())
}

fn set_default(name: &str) -> Result<()> {
    if !list_profiles()?.iter().any(|p| p == name) {
        bail!("Profile '{}' does not exist", name);
    }

    let mut config = load_config()?.unwrap_or_default();
    config.default_profile = name.to_string();
    save_config(&config)?;

    println!("✓ Default profile set to: {}", name);
    Ok(())
}
