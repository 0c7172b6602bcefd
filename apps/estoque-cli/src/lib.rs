//! # EstoquePlus Terminal App
//!
//! Interactive inventory manager on top of `estoque-db`.
//!
//! ## Module Organization
//! ```text
//! estoque_cli/
//! ├── lib.rs       ◄─── You are here (startup & run)
//! ├── config.rs    ◄─── TOML + env configuration
//! ├── error.rs     ◄─── User-facing error type
//! ├── prompt.rs    ◄─── Prompt trait over dialoguer
//! ├── login.rs     ◄─── First-user and login flows
//! ├── images.rs    ◄─── Artwork copies
//! ├── backup.rs    ◄─── Store backups
//! ├── report.rs    ◄─── Inventory report and profit chart
//! └── commands/
//!     ├── mod.rs   ◄─── Menu loop and dispatch
//!     ├── goods.rs ◄─── Good handlers and tables
//!     └── store.rs ◄─── Backup/export actions
//! ```

pub mod backup;
pub mod commands;
pub mod config;
pub mod error;
pub mod images;
pub mod login;
pub mod prompt;
pub mod report;

use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use estoque_db::{Database, DbConfig, SessionGate};

use config::AppConfig;
use error::AppResult;
use prompt::{Prompt, TerminalPrompt};

/// Runs the terminal app and maps the outcome to a process exit code.
///
/// ## Startup Sequence
/// ```text
/// 1. Initialize logging (stderr, RUST_LOG)
/// 2. Load AppConfig (defaults < estoque.toml < ESTOQUE_* env)
/// 3. Open the store, run migrations
/// 4. First-user flow, then login          ── cancelled ──► exit 1
/// 5. Menu loop until Quit
/// 6. Close the pool
/// ```
pub async fn run() -> ExitCode {
    init_tracing();

    info!("Starting EstoquePlus");

    let mut prompt = TerminalPrompt::new();
    match run_app(&mut prompt).await {
        Ok(code) => code,
        Err(err) => {
            error!(code = ?err.code, "Fatal error");
            prompt.show(&format!("Error: {}", err));
            ExitCode::FAILURE
        }
    }
}

async fn run_app(prompt: &mut impl Prompt) -> AppResult<ExitCode> {
    let config = AppConfig::load(None)?;
    std::fs::create_dir_all(&config.data_dir)?;

    let db_path = config.database_path();
    info!(?db_path, "Database path determined");

    let db = Database::new(DbConfig::new(db_path)).await?;
    let gate = SessionGate::open(db.clone()).await?;

    let code = match login::open_session(&gate, config.sale_total_policy, prompt).await? {
        Some(session) => {
            commands::run_menu(&session, &config, prompt).await?;
            prompt.show("Goodbye.");
            ExitCode::SUCCESS
        }
        None => {
            info!("Login cancelled");
            ExitCode::FAILURE
        }
    };

    db.close().await;
    Ok(code)
}

/// Initializes the tracing subscriber.
///
/// Logs go to stderr so they stay out of the prompts.
/// - `RUST_LOG=debug` - Show debug messages
/// - Default: `warn,estoque=info,sqlx=warn`
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,estoque=info,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
