//! # gomarket Entry Point
//!
//! Runs one cart command and prints the resulting cart as JSON.
//!
//! ## Startup Sequence
//! 1. Parse arguments
//! 2. Initialize tracing (logging, to stderr)
//! 3. Run the command (config, storage, provider, dispatch)
//! 4. Print `CartResponse` to stdout, or `ApiError` to stderr
//!
//! ## Exit Codes
//! - `0` success
//! - `1` the command failed (`ApiError` printed)
//! - `2` bad arguments (usage printed by clap)

use std::process::ExitCode;

use clap::Parser;
use tracing::info;

use gomarket_storefront_lib::cli::CliArgs;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();

    gomarket_storefront_lib::init_tracing();
    info!(command = ?args.command, "Starting gomarket");

    match gomarket_storefront_lib::run(args).await {
        Ok(response) => match serde_json::to_string_pretty(&response) {
            Ok(json) => {
                println!("{}", json);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Failed to encode response: {}", e);
                ExitCode::FAILURE
            }
        },
        Err(err) => {
            let body = serde_json::to_string(&err).unwrap_or_else(|_| err.to_string());
            eprintln!("{}", body);
            ExitCode::FAILURE
        }
    }
}
