//! Board backup export

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};

use super::list::TaskList;

pub fn export_file_name(date: NaiveDate) -> String {
    format!("taskflow-backup-{}.json", date.format("%Y-%m-%d"))
}

/// Writes the pretty-printed list to `dir`, replacing a backup from the same day.
pub fn write_export(list: &TaskList, dir: &Path, date: NaiveDate) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create export directory {}", dir.display()))?;

    let path = dir.join(export_file_name(date));
    let content = list.to_json_pretty()?;
    fs::write(&path, content)
        .with_context(|| format!("Failed to write backup {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::TaskStatus;
    use tempfile::tempdir;

    #[test]
    fn test_file_name_uses_iso_date() {
        let date = NaiveDate::from_ymd_opt(2026, 2, 5).unwrap();
        assert_eq!(export_file_name(date), "taskflow-backup-2026-02-05.json");
    }

    #[test]
    fn test_write_export_pretty_json() -> Result<()> {
        let temp = tempdir()?;
        let mut list = TaskList::new();
        list.add("ship it");
        let id = list.tasks()[0].id.clone();
        list.move_to(&id, TaskStatus::Done);

        let date = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let path = write_export(&list, &temp.path().join("backups"), date)?;

        assert!(path.ends_with("taskflow-backup-2026-10-16.json"));
        let content = fs::read_to_string(&path)?;
        assert!(content.contains('\n'));
        assert!(content.contains("\"status\": \"done\""));
        assert_eq!(TaskList::from_json(&content)?.0, list);
        Ok(())
    }

    #[test]
    fn test_write_export_empty_list() -> Result<()> {
        let temp = tempdir()?;
        let date = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let path = write_export(&TaskList::new(), temp.path(), date)?;
        assert_eq!(fs::read_to_string(path)?.trim(), "[]");
        Ok(())
    }
}
