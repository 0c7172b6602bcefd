//! Backup and export actions, stamped with local time.

use chrono::Local;
use std::path::PathBuf;

use estoque_db::Session;

use crate::backup::create_backup;
use crate::config::AppConfig;
use crate::error::AppResult;
use crate::report::{export_reports, ExportedReports};

/// Copies the store file into the configured backups directory.
pub async fn backup(session: &Session, config: &AppConfig) -> AppResult<PathBuf> {
    create_backup(
        session,
        &config.database_path(),
        &config.backups_path(),
        Local::now().naive_local(),
    )
    .await
}

/// Writes the inventory report and profit chart.
pub async fn export(session: &Session, config: &AppConfig) -> AppResult<ExportedReports> {
    export_reports(
        session.ledger(),
        &config.reports_path(),
        Local::now().naive_local(),
        &config.currency_symbol,
    )
    .await
}
