//! Whole-file store backups.
//!
//! ```text
//! session.checkpoint()  ──►  copy stock_control.db  ──►  backups/backup_20261019_1430.db
//! ```
//!
//! Two backups in the same minute share a name; the later one wins.

use chrono::NaiveDateTime;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use estoque_db::Session;

use crate::error::{AppError, AppResult};

const BACKUP_PREFIX: &str = "backup_";
const BACKUP_EXTENSION: &str = "db";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M";

/// File name of a backup taken at `now`.
pub fn backup_file_name(now: NaiveDateTime) -> String {
    format!(
        "{}{}.{}",
        BACKUP_PREFIX,
        now.format(BACKUP_TIMESTAMP_FORMAT),
        BACKUP_EXTENSION
    )
}

/// Copies the store file into `backups_dir`.
///
/// The WAL is checkpointed first so the copied file holds every committed
/// write.
pub async fn create_backup(
    session: &Session,
    db_path: &Path,
    backups_dir: &Path,
    now: NaiveDateTime,
) -> AppResult<PathBuf> {
    if !db_path.is_file() {
        return Err(AppError::file(format!(
            "Database file not found: {}",
            db_path.display()
        )));
    }

    session.checkpoint().await?;

    fs::create_dir_all(backups_dir)?;
    let target = backups_dir.join(backup_file_name(now));
    fs::copy(db_path, &target)?;

    info!(backup = %target.display(), "Backup created");
    Ok(target)
}

/// Lists backup file names, newest first.
pub fn list_backups(backups_dir: &Path) -> AppResult<Vec<String>> {
    if !backups_dir.exists() {
        return Ok(Vec::new());
    }

    let mut entries = Vec::new();
    for entry in fs::read_dir(backups_dir)? {
        let path = entry?.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some(BACKUP_EXTENSION) {
            continue;
        }
        if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
            if parse_timestamp(name).is_some() {
                entries.push(name.to_string());
            }
        }
    }

    entries.sort_by(|a, b| parse_timestamp(b).cmp(&parse_timestamp(a)));
    Ok(entries)
}

fn parse_timestamp(name: &str) -> Option<NaiveDateTime> {
    let raw = name
        .strip_prefix(BACKUP_PREFIX)?
        .strip_suffix(&format!(".{}", BACKUP_EXTENSION))?;
    NaiveDateTime::parse_from_str(raw, BACKUP_TIMESTAMP_FORMAT).ok()
}
