//! TaskFlow library - three-column task board with per-client persistence

pub mod board;
pub mod cli;
pub mod config;
pub mod identity;
pub mod storage;
pub mod tui;
