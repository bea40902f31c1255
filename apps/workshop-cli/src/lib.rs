//! # Workshop CLI Library
//!
//! State, commands and startup for the `workshop` binary.
//!
//! ## Module Organization
//! ```text
//! workshop_cli/
//! ├── lib.rs          ◄─── You are here (startup: logging, db path, state)
//! ├── cli.rs          ◄─── clap definitions and dispatch
//! ├── state/
//! │   ├── db.rs       ◄─── Database + shared order ID generator
//! │   ├── session.rs  ◄─── Current role (admin / mechanic)
//! │   └── config.rs   ◄─── Shop name, country code
//! ├── commands/
//! │   ├── order.rs    ◄─── Reception, photos, delivery
//! │   ├── task.rs     ◄─── Kanban board and costs
//! │   ├── budget.rs   ◄─── Role-dependent budget, client quote, share link
//! │   ├── auth.rs     ◄─── PIN gate
//! │   └── export.rs   ◄─── Daily backup
//! └── error.rs        ◄─── API error type for commands
//! ```
//!
//! ## State Management (Multiple State Types)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ┌──────────────────┐ ┌──────────────────┐ ┌──────────────────────┐    │
//! │  │    DbState       │ │   SessionState   │ │    ConfigState       │    │
//! │  │                  │ │                  │ │                      │    │
//! │  │  • Database pool │ │  • Role          │ │  • Shop name         │    │
//! │  │  • Order IDs     │ │                  │ │  • Country code      │    │
//! │  └──────────────────┘ └──────────────────┘ └──────────────────────┘    │
//! │                                                                         │
//! │  Each command only takes the state it needs.                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod state;

use std::path::PathBuf;

use directories::ProjectDirs;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use error::ApiError;
use state::{ConfigState, DbState, SessionState};
use workshop_db::{Database, DbConfig};

/// Runs one CLI invocation and returns what should be printed.
///
/// ## Startup Sequence
/// ```text
/// 1. Database path     --db / WORKSHOP_DB_PATH, else the platform data dir
/// 2. Connect           SQLite with WAL mode, pending migrations applied
/// 3. State             DbState, SessionState (remembered login), ConfigState
/// 4. Dispatch          one command from commands/
/// ```
pub async fn run(cli: Cli) -> Result<String, ApiError> {
    let db_path = match cli.db {
        Some(path) => path,
        None => default_database_path()?,
    };
    info!(?db_path, "Database path determined");

    let db = Database::new(DbConfig::new(db_path)).await?;
    let session = SessionState::restore(&db.auth()).await;
    let config = ConfigState::from_env();
    let db_state = DbState::new(db);

    let output = cli::execute(cli.command, &db_state, &session, &config).await;
    db_state.inner().close().await;
    output
}

/// Initializes the tracing subscriber for structured logging.
///
/// Logs go to stderr so stdout stays clean for command output.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=workshop=trace` - Show trace for workshop crates only
/// - Default: `warn`, with `info` from the workshop crates
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,workshop=info,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Platform data directory for the database file.
///
/// ## Platform-Specific Paths
/// - **macOS**: `~/Library/Application Support/com.workshop.manager/workshop.db`
/// - **Windows**: `%APPDATA%\workshop\manager\data\workshop.db`
/// - **Linux**: `~/.local/share/manager/workshop.db`
fn default_database_path() -> Result<PathBuf, ApiError> {
    let proj_dirs = ProjectDirs::from("com", "workshop", "manager")
        .ok_or_else(|| ApiError::internal("Could not determine app data directory"))?;

    let data_dir = proj_dirs.data_dir();

    // Create directory if it doesn't exist
    std::fs::create_dir_all(data_dir).map_err(|e| {
        ApiError::internal(format!(
            "Could not create data directory {}: {}",
            data_dir.display(),
            e
        ))
    })?;

    Ok(data_dir.join("workshop.db"))
}
