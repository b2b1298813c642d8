//! Application directories, profiles and user configuration

mod settings;

pub use settings::{
    get_identity_settings, load_config, save_config, Config, ExportConfig, IdentityConfig,
    ThemeConfig,
};

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

pub const DEFAULT_PROFILE: &str = "default";

const APP_DIR_NAME: &str = ".taskflow";

/// Root directory for config, logs and profiles (`~/.taskflow`).
pub fn get_app_dir() -> Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Cannot find home directory"))?;
    let dir = home.join(APP_DIR_NAME);
    if !dir.exists() {
        fs::create_dir_all(&dir)?;
    }
    Ok(dir)
}

pub fn get_profile_dir(profile: &str) -> Result<PathBuf> {
    let name = if profile.is_empty() {
        DEFAULT_PROFILE
    } else {
        profile
    };
    if name.contains(['/', '\\']) || name == "." || name == ".." {
        anyhow::bail!("Invalid profile name: {}", name);
    }

    let dir = get_app_dir()?.join("profiles").join(name);
    if !dir.exists() {
        fs::create_dir_all(&dir)?;
    }
    Ok(dir)
}

pub fn list_profiles() -> Result<Vec<String>> {
    let profiles_dir = get_app_dir()?.join("profiles");
    if !profiles_dir.exists() {
        return Ok(Vec::new());
    }

    let mut profiles: Vec<String> = fs::read_dir(&profiles_dir)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .collect();
    profiles.sort();
    Ok(profiles)
}
