//! # Workshop CLI Entry Point
//!
//! ```text
//! workshop new                        → {"id": "250615-01", ...}
//! workshop task add 250615-01 "Frenos"
//! workshop login 1234                 → {"success": true, "role": "admin"}
//! workshop budget 250615-01           → admin view with margins
//! workshop quote whatsapp 250615-01   → whatsapp://send?phone=...
//! ```
//!
//! Output goes to stdout. Errors go to stderr as `{"code", "message"}` JSON
//! with exit code 1.

use std::process::ExitCode;

use clap::Parser;
use workshop_cli::cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    workshop_cli::init_tracing();

    let cli = Cli::parse();
    match workshop_cli::run(cli).await {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(err) => {
            let body = serde_json::to_string(&err).unwrap_or_else(|_| err.to_string());
            eprintln!("{}", body);
            ExitCode::FAILURE
        }
    }
}
